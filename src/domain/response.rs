//! Response entities
//!
//! The mutable user-entered answer tree: one [`Assessment`] per session,
//! nested area -> component -> question responses, plus the sibling
//! [`Overview`] record and the [`WorkPlan`] variant. Response lists are
//! [`KeyedSeq`]s so every nesting level is a map keyed by the reference
//! entity's id, serialized as the wire arrays the server expects.
//!
//! A response row exists only after a first edit; `None` from a lookup
//! means "never touched", not "empty".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{AnswerId, AreaId, ComponentId, CountryId, OverviewId, QuestionId, RatingId};
use crate::form::keyed::{Keyed, KeyedSeq};

/// User answer for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResponse {
    /// Question this response answers (the key; set once at creation)
    pub question: QuestionId,
    pub answer: Option<AnswerId>,
    pub notes: Option<String>,
}

impl Keyed for QuestionResponse {
    type Key = QuestionId;

    fn key(&self) -> QuestionId {
        self.question
    }

    fn with_key(key: QuestionId) -> Self {
        Self {
            question: key,
            answer: None,
            notes: None,
        }
    }
}

/// User answers and rating for one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentResponse {
    /// Component this response covers (the key; set once at creation)
    pub component: ComponentId,
    pub rating: Option<RatingId>,
    pub notes: Option<String>,
    pub urban_considerations: Option<String>,
    pub epi_considerations: Option<String>,
    pub climate_environmental_considerations: Option<String>,
    #[serde(default)]
    pub question_responses: KeyedSeq<QuestionResponse>,
}

impl Keyed for ComponentResponse {
    type Key = ComponentId;

    fn key(&self) -> ComponentId {
        self.component
    }

    fn with_key(key: ComponentId) -> Self {
        Self {
            component: key,
            rating: None,
            notes: None,
            urban_considerations: None,
            epi_considerations: None,
            climate_environmental_considerations: None,
            question_responses: KeyedSeq::new(),
        }
    }
}

/// User answers for one area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaResponse {
    /// Area this response covers (the key; set once at creation)
    pub area: AreaId,
    #[serde(default)]
    pub component_responses: KeyedSeq<ComponentResponse>,
}

impl Keyed for AreaResponse {
    type Key = AreaId;

    fn key(&self) -> AreaId {
        self.area
    }

    fn with_key(key: AreaId) -> Self {
        Self {
            area: key,
            component_responses: KeyedSeq::new(),
        }
    }
}

/// The root assessment response tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Overview record this assessment belongs to
    pub overview: OverviewId,
    pub is_draft: bool,
    #[serde(default)]
    pub area_responses: KeyedSeq<AreaResponse>,
}

impl Assessment {
    /// Creates an empty draft assessment for an overview
    pub fn new(overview: OverviewId) -> Self {
        Self {
            overview,
            is_draft: true,
            area_responses: KeyedSeq::new(),
        }
    }

    /// Returns the component response at `area`/`component`, creating both
    /// levels on first touch
    pub fn component_mut(&mut self, area: AreaId, component: ComponentId) -> &mut ComponentResponse {
        self.area_responses
            .entry(area)
            .component_responses
            .entry(component)
    }

    /// Returns the question response at the full path, creating every
    /// intermediate level on first touch
    pub fn question_mut(
        &mut self,
        area: AreaId,
        component: ComponentId,
        question: QuestionId,
    ) -> &mut QuestionResponse {
        self.component_mut(area, component)
            .question_responses
            .entry(question)
    }

    /// Read-only lookup of a question response; `None` until first edit
    pub fn question(
        &self,
        area: AreaId,
        component: ComponentId,
        question: QuestionId,
    ) -> Option<&QuestionResponse> {
        self.area_responses
            .get(area)?
            .component_responses
            .get(component)?
            .question_responses
            .get(question)
    }

    /// Number of question responses with an answer selected
    pub fn answered_count(&self) -> usize {
        self.area_responses
            .iter()
            .flat_map(|a| a.component_responses.iter())
            .flat_map(|c| c.question_responses.iter())
            .filter(|q| q.answer.is_some())
            .count()
    }
}

/// The overview record carrying the conditionally-required session fields.
///
/// While the assessment is a draft, exactly one of the two dates must be
/// set and the country is required. Finalizing (`is_draft = false`) locks
/// the record: the schema force-clears the fields the server no longer
/// accepts on PATCH.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub country: Option<CountryId>,
    pub date_of_orientation: Option<NaiveDate>,
    pub date_of_assessment: Option<NaiveDate>,
    pub assessment_method: Option<String>,
    pub branches_involved: Option<String>,
    pub ns_focal_point_email: Option<String>,
    pub is_draft: bool,
}

impl Overview {
    /// Creates an empty draft overview
    pub fn new() -> Self {
        Self {
            country: None,
            date_of_orientation: None,
            date_of_assessment: None,
            assessment_method: None,
            branches_involved: None,
            ns_focal_point_email: None,
            is_draft: true,
        }
    }
}

impl Default for Overview {
    fn default() -> Self {
        Self::new()
    }
}

/// Work plan follow-up status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkPlanStatus {
    Standby,
    Ongoing,
    Cancelled,
    Pending,
    Closed,
}

/// Planned follow-up actions for one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPlanComponent {
    /// Component this plan entry covers (the key; set once at creation)
    pub component: ComponentId,
    pub actions: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub supported_by: Option<CountryId>,
    pub status: Option<WorkPlanStatus>,
}

impl Keyed for WorkPlanComponent {
    type Key = ComponentId;

    fn key(&self) -> ComponentId {
        self.component
    }

    fn with_key(key: ComponentId) -> Self {
        Self {
            component: key,
            actions: None,
            due_date: None,
            supported_by: None,
            status: None,
        }
    }
}

/// The work plan built from a finished assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPlan {
    /// Overview record this plan belongs to
    pub overview: OverviewId,
    #[serde(default)]
    pub component_responses: KeyedSeq<WorkPlanComponent>,
}

impl WorkPlan {
    /// Creates an empty work plan for an overview
    pub fn new(overview: OverviewId) -> Self {
        Self {
            overview,
            component_responses: KeyedSeq::new(),
        }
    }
}
