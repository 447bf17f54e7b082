//! Domain models and types for goform.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`AreaId`], [`ComponentId`],
//!   [`QuestionId`], [`OverviewId`], ...)
//! - **Reference entities** ([`Area`], [`Component`], [`Question`],
//!   [`ReferenceData`]) — the fixed questionnaire, read-only per session
//! - **Response entities** ([`Assessment`], [`Overview`], [`WorkPlan`]) —
//!   the mutable user answer trees
//! - **Error types** ([`GoFormError`], [`ApiError`]) and the [`Result`]
//!   alias
//!
//! # Type safety
//!
//! Identifiers are newtypes, so an answer id cannot be passed where a
//! question id is expected:
//!
//! ```rust
//! use goform::domain::{AreaId, QuestionId};
//!
//! let area = AreaId::new(1);
//! let question = QuestionId::new(9);
//! // let wrong: AreaId = question;  // Compile error
//! ```
//!
//! # Reference vs. response
//!
//! Reference entities describe the questionnaire and never change during a
//! session. Response entities are created lazily, on the first edit that
//! touches their path:
//!
//! ```rust
//! use goform::domain::{AnswerId, AreaId, Assessment, ComponentId, OverviewId, QuestionId};
//!
//! let mut assessment = Assessment::new(OverviewId::new(11));
//! assert!(assessment
//!     .question(AreaId::new(1), ComponentId::new(2), QuestionId::new(3))
//!     .is_none());
//!
//! assessment
//!     .question_mut(AreaId::new(1), ComponentId::new(2), QuestionId::new(3))
//!     .answer = Some(AnswerId::new(5));
//! ```

pub mod errors;
pub mod ids;
pub mod reference;
pub mod response;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ApiError, GoFormError};
pub use ids::{
    AnswerId, AreaId, AssessmentId, ComponentId, CountryId, OverviewId, QuestionId, RatingId,
    WorkPlanId,
};
pub use reference::{Area, AnswerOption, Component, PerOptions, Question, RatingOption, ReferenceData};
pub use response::{
    AreaResponse, Assessment, ComponentResponse, Overview, QuestionResponse, WorkPlan,
    WorkPlanComponent, WorkPlanStatus,
};
pub use result::Result;
