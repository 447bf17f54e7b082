//! Form session state
//!
//! [`FormSession`] is the single owner of one editing session's mutable
//! state: the partial [`Assessment`] tree, the sibling [`Overview`], the
//! current [`FormErrors`], and the phase machine. All mutation goes through
//! it; nothing here performs I/O. Submission itself lives in the API client
//! and the CLI, which feed results back via [`FormSession::complete_submit`]
//! and [`FormSession::fail_submit`].
//!
//! Phase machine: `Editing -> Validating -> (Submitting | Editing with
//! errors) -> (Submitted | SubmitFailed)`. A draft save returns to
//! `Editing`; `Submitted` is terminal only for a finalized record
//! (`is_draft == false`), after which edits are rejected.

use crate::domain::errors::GoFormError;
use crate::domain::ids::{AnswerId, AreaId, ComponentId, OverviewId, QuestionId, RatingId};
use crate::domain::reference::ReferenceData;
use crate::domain::response::{Assessment, ComponentResponse, Overview, QuestionResponse};
use crate::domain::result::Result;

use super::errors::FormErrors;
use super::schema::{validate_assessment, validate_overview};

/// Lifecycle phase of a form session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Validating,
    Submitting,
    Submitted,
    SubmitFailed,
}

/// Owner of one editing session's value tree and error tree
#[derive(Debug, Clone)]
pub struct FormSession {
    assessment: Assessment,
    overview: Overview,
    errors: FormErrors,
    phase: FormPhase,
}

impl FormSession {
    /// Starts a fresh draft session
    pub fn new(overview_id: OverviewId) -> Self {
        Self {
            assessment: Assessment::new(overview_id),
            overview: Overview::new(),
            errors: FormErrors::new(),
            phase: FormPhase::Editing,
        }
    }

    /// Resumes a session from previously saved records
    pub fn from_saved(assessment: Assessment, overview: Overview) -> Self {
        Self {
            assessment,
            overview,
            errors: FormErrors::new(),
            phase: FormPhase::Editing,
        }
    }

    /// Replaces the whole value tree (reloading a saved record)
    pub fn replace(&mut self, assessment: Assessment, overview: Overview) -> Result<()> {
        self.ensure_editable()?;
        self.assessment = assessment;
        self.overview = overview;
        self.errors = FormErrors::new();
        self.phase = FormPhase::Editing;
        Ok(())
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn overview(&self) -> &Overview {
        &self.overview
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    fn ensure_editable(&self) -> Result<()> {
        match self.phase {
            FormPhase::Submitted => Err(GoFormError::State(
                "assessment has been finalized and can no longer be edited".to_string(),
            )),
            FormPhase::Submitting => Err(GoFormError::State(
                "a submission is in flight; wait for it to complete".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Edit hook: any accepted edit moves a failed session back to Editing.
    fn mark_edited(&mut self) {
        self.phase = FormPhase::Editing;
    }

    /// Applies a partial update to one question response, creating the
    /// area/component/question path on first touch
    pub fn with_question(
        &mut self,
        area: AreaId,
        component: ComponentId,
        question: QuestionId,
        patch: impl FnOnce(&mut QuestionResponse),
    ) -> Result<()> {
        self.ensure_editable()?;
        patch(self.assessment.question_mut(area, component, question));
        self.mark_edited();
        Ok(())
    }

    /// Applies a partial update to one component response
    pub fn with_component(
        &mut self,
        area: AreaId,
        component: ComponentId,
        patch: impl FnOnce(&mut ComponentResponse),
    ) -> Result<()> {
        self.ensure_editable()?;
        patch(self.assessment.component_mut(area, component));
        self.mark_edited();
        Ok(())
    }

    /// Applies a partial update to the overview record
    pub fn with_overview(&mut self, patch: impl FnOnce(&mut Overview)) -> Result<()> {
        self.ensure_editable()?;
        patch(&mut self.overview);
        // is_draft only travels true -> false; the response tree mirrors it.
        self.assessment.is_draft = self.overview.is_draft;
        self.mark_edited();
        Ok(())
    }

    /// Records an answer for one question
    pub fn answer(
        &mut self,
        area: AreaId,
        component: ComponentId,
        question: QuestionId,
        answer: AnswerId,
    ) -> Result<()> {
        self.with_question(area, component, question, |q| q.answer = Some(answer))
    }

    /// Records a rating for one component
    pub fn rate(&mut self, area: AreaId, component: ComponentId, rating: RatingId) -> Result<()> {
        self.with_component(area, component, |c| c.rating = Some(rating))
    }

    /// Runs schema validation over the overview and the assessment tree.
    ///
    /// Failures are data: the error tree is stored on the session and also
    /// returned, and the phase goes back to `Editing`. On success the
    /// cleaned records (force-cleared fields removed) are returned without
    /// mutating the session.
    pub fn validate(
        &mut self,
        reference: Option<&ReferenceData>,
    ) -> std::result::Result<(Overview, Assessment), FormErrors> {
        self.phase = FormPhase::Validating;

        let mut errors = FormErrors::new();
        let overview = match validate_overview(&self.overview) {
            Ok(cleaned) => Some(cleaned),
            Err(tree) => {
                errors.merge(tree);
                None
            }
        };
        let assessment = match validate_assessment(&self.assessment, reference) {
            Ok(cleaned) => Some(cleaned),
            Err(tree) => {
                errors.merge(tree);
                None
            }
        };

        self.phase = FormPhase::Editing;
        if errors.is_empty() {
            self.errors = FormErrors::new();
            // Both are Some when no error tree was merged.
            match (overview, assessment) {
                (Some(o), Some(a)) => Ok((o, a)),
                _ => unreachable!("validation produced neither errors nor values"),
            }
        } else {
            tracing::debug!(messages = errors.message_count(), "local validation failed");
            self.errors = errors.clone();
            Err(errors)
        }
    }

    /// Validates and, on success, moves to `Submitting`, returning the
    /// cleaned snapshot to serialize. The caller must finish with
    /// [`Self::complete_submit`] or [`Self::fail_submit`].
    pub fn begin_submit(
        &mut self,
        reference: Option<&ReferenceData>,
    ) -> std::result::Result<(Overview, Assessment), FormErrors> {
        let snapshot = self.validate(reference)?;
        self.phase = FormPhase::Submitting;
        Ok(snapshot)
    }

    /// Records a successful submission. A finalized record parks the
    /// session in `Submitted`; a draft save returns to `Editing`.
    pub fn complete_submit(&mut self) {
        self.errors = FormErrors::new();
        self.phase = if self.overview.is_draft {
            FormPhase::Editing
        } else {
            FormPhase::Submitted
        };
    }

    /// Records a rejected or failed submission. The value tree is left
    /// untouched so no input is lost; the projected errors are installed
    /// for display.
    pub fn fail_submit(&mut self, errors: FormErrors) {
        self.errors = errors;
        self.phase = FormPhase::SubmitFailed;
    }

    /// Installs an externally produced error tree (projected server errors)
    pub fn set_errors(&mut self, errors: FormErrors) {
        self.errors = errors;
    }

    pub fn clear_errors(&mut self) {
        self.errors = FormErrors::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::CountryId;
    use chrono::NaiveDate;

    fn ready_session() -> FormSession {
        let mut session = FormSession::new(OverviewId::new(1));
        session
            .with_overview(|o| {
                o.country = Some(CountryId::new(44));
                o.date_of_assessment = NaiveDate::from_ymd_opt(2025, 2, 1);
            })
            .unwrap();
        session
    }

    #[test]
    fn test_new_session_starts_editing() {
        let session = FormSession::new(OverviewId::new(1));
        assert_eq!(session.phase(), FormPhase::Editing);
        assert!(session.errors().is_empty());
    }

    #[test]
    fn test_first_answer_materializes_single_path() {
        let mut session = ready_session();
        session
            .answer(
                AreaId::new(1),
                ComponentId::new(2),
                QuestionId::new(3),
                AnswerId::new(5),
            )
            .unwrap();

        let assessment = session.assessment();
        assert_eq!(assessment.area_responses.len(), 1);
        let response = assessment
            .question(AreaId::new(1), ComponentId::new(2), QuestionId::new(3))
            .unwrap();
        assert_eq!(response.answer, Some(AnswerId::new(5)));
    }

    #[test]
    fn test_repeated_writes_to_same_key_stay_one_element() {
        let mut session = ready_session();
        for answer in [1, 2, 3] {
            session
                .answer(
                    AreaId::new(1),
                    ComponentId::new(2),
                    QuestionId::new(3),
                    AnswerId::new(answer),
                )
                .unwrap();
        }

        let component = session
            .assessment()
            .area_responses
            .get(AreaId::new(1))
            .unwrap()
            .component_responses
            .get(ComponentId::new(2))
            .unwrap();
        assert_eq!(component.question_responses.len(), 1);
        assert_eq!(
            component.question_responses.get(QuestionId::new(3)).unwrap().answer,
            Some(AnswerId::new(3))
        );
    }

    #[test]
    fn test_empty_tree_validates_and_serializes_empty_list() {
        let mut session = ready_session();
        let (_, assessment) = session.validate(None).unwrap();
        let body = serde_json::to_value(&assessment).unwrap();
        assert_eq!(body["area_responses"], serde_json::json!([]));
    }

    #[test]
    fn test_validation_failure_stores_errors_and_keeps_editing() {
        let mut session = FormSession::new(OverviewId::new(1));
        // No country, no dates: two problems.
        let errors = session.validate(None).unwrap_err();
        assert!(!errors.is_empty());
        assert_eq!(session.phase(), FormPhase::Editing);
        assert!(!session.errors().is_empty());
    }

    #[test]
    fn test_draft_submit_returns_to_editing() {
        let mut session = ready_session();
        let snapshot = session.begin_submit(None).unwrap();
        assert_eq!(session.phase(), FormPhase::Submitting);
        assert!(snapshot.0.is_draft);

        session.complete_submit();
        assert_eq!(session.phase(), FormPhase::Editing);
    }

    #[test]
    fn test_final_submit_is_terminal() {
        let mut session = ready_session();
        session.with_overview(|o| o.is_draft = false).unwrap();
        assert!(!session.assessment().is_draft);

        session.begin_submit(None).unwrap();
        session.complete_submit();
        assert_eq!(session.phase(), FormPhase::Submitted);

        let err = session
            .answer(
                AreaId::new(1),
                ComponentId::new(2),
                QuestionId::new(3),
                AnswerId::new(1),
            )
            .unwrap_err();
        assert!(matches!(err, GoFormError::State(_)));
    }

    #[test]
    fn test_edits_rejected_while_submitting() {
        let mut session = ready_session();
        session.begin_submit(None).unwrap();
        let err = session.with_overview(|_| {}).unwrap_err();
        assert!(matches!(err, GoFormError::State(_)));
    }

    #[test]
    fn test_failed_submit_preserves_tree_and_installs_errors() {
        let mut session = ready_session();
        session
            .answer(
                AreaId::new(7),
                ComponentId::new(14),
                QuestionId::new(9),
                AnswerId::new(1),
            )
            .unwrap();
        let before = session.assessment().clone();

        session.begin_submit(None).unwrap();
        let mut server_errors = FormErrors::new();
        server_errors.push_non_field("Validation failed");
        session.fail_submit(server_errors);

        assert_eq!(session.phase(), FormPhase::SubmitFailed);
        assert_eq!(session.assessment(), &before);
        assert_eq!(session.errors().non_field, vec!["Validation failed"]);

        // The next edit resumes editing.
        session
            .answer(
                AreaId::new(7),
                ComponentId::new(14),
                QuestionId::new(9),
                AnswerId::new(2),
            )
            .unwrap();
        assert_eq!(session.phase(), FormPhase::Editing);
    }

    #[test]
    fn test_finalizing_clears_locked_fields_in_snapshot() {
        let mut session = ready_session();
        session.with_overview(|o| o.is_draft = false).unwrap();

        let (overview, _) = session.validate(None).unwrap();
        assert_eq!(overview.country, None);
        assert_eq!(overview.date_of_assessment, None);
        // The session's own tree keeps the user input.
        assert_eq!(session.overview().country, Some(CountryId::new(44)));
    }
}
