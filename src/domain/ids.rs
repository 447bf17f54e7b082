//! Domain identifier types
//!
//! Newtype wrappers around the numeric identifiers the GO API uses for
//! reference and response entities. The newtypes prevent mixing id spaces
//! (answering a question with a component id is a compile error) while
//! serializing transparently as plain integers on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates a new id from its raw numeric value
            pub fn new(value: u32) -> Self {
                Self(value)
            }

            /// Returns the raw numeric value
            pub fn value(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a PER assessment area (top nesting level)
    AreaId
);
numeric_id!(
    /// Identifier of a PER component within an area
    ComponentId
);
numeric_id!(
    /// Identifier of a PER question within a component
    QuestionId
);
numeric_id!(
    /// Identifier of an answer option attached to a question
    AnswerId
);
numeric_id!(
    /// Identifier of a rating option
    RatingId
);
numeric_id!(
    /// Identifier of a PER overview record
    OverviewId
);
numeric_id!(
    /// Identifier of a PER assessment record
    AssessmentId
);
numeric_id!(
    /// Identifier of a PER work plan record
    WorkPlanId
);
numeric_id!(
    /// Identifier of a country record
    CountryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = AreaId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(AreaId::from(7), id);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = QuestionId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        let back: QuestionId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_ids_usable_as_json_map_keys() {
        use std::collections::BTreeMap;

        let mut map = BTreeMap::new();
        map.insert(ComponentId::new(14), "x");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"14":"x"}"#);
    }
}
