//! Wire models for the GO API
//!
//! Shapes that exist only on the wire or on disk, as opposed to the domain
//! entities they carry.

use serde::{Deserialize, Serialize};

use crate::domain::{Assessment, Overview, ReferenceData};

/// Paginated list envelope used by every GO list endpoint
///
/// The client follows `next` until it is null, so callers always see the
/// full result set.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Everything one editing session needs, fetched once and saved to disk
///
/// `overview` and `assessment` are absent when starting a fresh form rather
/// than resuming a saved draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBundle {
    pub reference: ReferenceData,
    #[serde(default)]
    pub overview: Option<Overview>,
    #[serde(default)]
    pub assessment: Option<Assessment>,
}

impl SessionBundle {
    pub fn new(
        reference: ReferenceData,
        overview: Option<Overview>,
        assessment: Option<Assessment>,
    ) -> Self {
        Self {
            reference,
            overview,
            assessment,
        }
    }
}
