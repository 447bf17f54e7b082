//! The form-session core
//!
//! Everything needed to edit, validate, and diagnose one nested PER
//! response tree, independent of any transport:
//!
//! - [`keyed`] - keyed response sequences ([`KeyedSeq`]): ordered maps
//!   keyed by business id, serialized as the wire arrays
//! - [`schema`] - conditional field rules and validation
//! - [`errors`] - the nested [`FormErrors`] tree keyed by business ids
//! - [`project`] - projection of positional server error paths onto that
//!   tree
//! - [`session`] - the [`FormSession`] state container and phase machine
//!
//! # Flow
//!
//! ```rust
//! use goform::domain::{AnswerId, AreaId, ComponentId, CountryId, OverviewId, QuestionId};
//! use goform::form::FormSession;
//! use chrono::NaiveDate;
//!
//! let mut session = FormSession::new(OverviewId::new(11));
//! session.with_overview(|o| {
//!     o.country = Some(CountryId::new(44));
//!     o.date_of_assessment = NaiveDate::from_ymd_opt(2025, 2, 1);
//! })?;
//! session.answer(
//!     AreaId::new(1),
//!     ComponentId::new(2),
//!     QuestionId::new(3),
//!     AnswerId::new(5),
//! )?;
//!
//! match session.validate(None) {
//!     Ok((overview, assessment)) => { /* serialize and submit */ }
//!     Err(errors) => { /* errors is a tree keyed by business ids */ }
//! }
//! # Ok::<(), goform::domain::GoFormError>(())
//! ```

pub mod errors;
pub mod keyed;
pub mod project;
pub mod schema;
pub mod session;

// Re-export commonly used types for convenience
pub use errors::{AreaErrors, ComponentErrors, FormErrors, QuestionErrors};
pub use keyed::{Keyed, KeyedSeq};
pub use project::{project, project_payload, ApiErrorPayload, FlatError, PathSegment};
pub use schema::{overview_rules, validate_assessment, validate_overview, OverviewRules};
pub use session::{FormPhase, FormSession};
