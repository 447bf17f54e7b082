// goform - IFRC GO PER form session tool
// Licensed under the MIT License

//! # goform - PER form sessions for the IFRC GO platform
//!
//! goform drives a PER (Preparedness for Effective Response) assessment
//! form session against an IFRC GO server: it fetches the questionnaire
//! structure, holds the partially-filled response tree, validates it with
//! the same conditional rules the platform applies, and submits it back,
//! projecting any server rejection onto the tree with business keys.
//!
//! ## Architecture
//!
//! goform follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`form`] - Form session logic (keyed lists, validation, projection)
//! - [`adapters`] - External integrations (GO REST API)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use goform::domain::ids::{AnswerId, AreaId, ComponentId, OverviewId, QuestionId};
//! use goform::form::FormSession;
//!
//! let mut session = FormSession::new(OverviewId::new(9));
//!
//! // Answering a question creates every level of the tree on first touch.
//! session
//!     .answer(AreaId::new(1), ComponentId::new(14), QuestionId::new(9), AnswerId::new(1))
//!     .unwrap();
//!
//! assert_eq!(session.assessment().answered_count(), 1);
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`] with [`domain::GoFormError`].
//! Validation failures are data, not errors: they come back as a
//! [`form::FormErrors`] tree keyed by area, component and question ids,
//! never through the error enum.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod form;
pub mod logging;
