//! Conditional field rules
//!
//! Declarative requiredness and force-clear rules for the overview record,
//! plus structural checks over the nested assessment tree. Rules are a pure
//! function of the current value: [`overview_rules`] resolves the
//! conditional branches once (`is_draft` first, then everything that
//! depends on it), and [`validate_overview`] applies them.
//!
//! Validation outcomes are data. A failed validation returns the
//! [`FormErrors`] tree; a successful one returns the cleaned value with
//! force-cleared fields already removed. Nothing here performs I/O or
//! panics on user input.

use std::sync::OnceLock;

use regex::Regex;

use super::errors::FormErrors;
use crate::domain::reference::ReferenceData;
use crate::domain::response::{Assessment, Overview};

/// Longest accepted free-text note
pub const MAX_NOTES_LEN: usize = 2000;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

/// A validity check on one field's value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Value must look like an email address
    Email,
    /// Free text must not exceed this length
    MaxLength(usize),
}

/// Resolved rule for one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRule {
    /// Missing value is an error
    pub required: bool,
    /// Value is overwritten with `None` before submission regardless of
    /// user input (server-side lock semantics)
    pub force_clear: bool,
    pub checks: Vec<Check>,
}

impl FieldRule {
    pub fn optional() -> Self {
        Self::default()
    }

    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn force_cleared() -> Self {
        Self {
            force_clear: true,
            ..Self::default()
        }
    }

    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }
}

/// The resolved rule set for an [`Overview`] value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewRules {
    pub country: FieldRule,
    pub date_of_orientation: FieldRule,
    pub date_of_assessment: FieldRule,
    pub assessment_method: FieldRule,
    pub branches_involved: FieldRule,
    pub ns_focal_point_email: FieldRule,
    /// Cross-field rule: exactly one of the two dates must be present
    pub require_one_date: bool,
}

/// Resolves the conditional rule set for the current overview value.
///
/// `is_draft` is the only branching input and is read first; every other
/// rule follows from it. Once the record is finalized the server refuses
/// the locked fields on PATCH, so they switch from required/optional to
/// force-cleared.
pub fn overview_rules(overview: &Overview) -> OverviewRules {
    if overview.is_draft {
        OverviewRules {
            country: FieldRule::required(),
            date_of_orientation: FieldRule::optional(),
            date_of_assessment: FieldRule::optional(),
            assessment_method: FieldRule::optional(),
            branches_involved: FieldRule::optional(),
            ns_focal_point_email: FieldRule::optional().with_check(Check::Email),
            require_one_date: true,
        }
    } else {
        OverviewRules {
            country: FieldRule::force_cleared(),
            date_of_orientation: FieldRule::force_cleared(),
            date_of_assessment: FieldRule::force_cleared(),
            assessment_method: FieldRule::force_cleared(),
            branches_involved: FieldRule::force_cleared(),
            ns_focal_point_email: FieldRule::optional().with_check(Check::Email),
            require_one_date: false,
        }
    }
}

/// Validates an overview against its resolved rules.
///
/// Returns the cleaned value (force-cleared fields set to `None`) or the
/// error tree. The date-exclusivity rule lands as a non-field message
/// because it belongs to no single field.
pub fn validate_overview(overview: &Overview) -> Result<Overview, FormErrors> {
    let rules = overview_rules(overview);
    let mut errors = FormErrors::new();
    let mut cleaned = overview.clone();

    if rules.country.force_clear {
        cleaned.country = None;
    } else if rules.country.required && cleaned.country.is_none() {
        errors.push_field("country", "This field is required");
    }

    if rules.date_of_orientation.force_clear {
        cleaned.date_of_orientation = None;
    }
    if rules.date_of_assessment.force_clear {
        cleaned.date_of_assessment = None;
    }
    if rules.assessment_method.force_clear {
        cleaned.assessment_method = None;
    }
    if rules.branches_involved.force_clear {
        cleaned.branches_involved = None;
    }

    if rules.require_one_date {
        let set = [overview.date_of_orientation, overview.date_of_assessment]
            .iter()
            .filter(|d| d.is_some())
            .count();
        if set != 1 {
            errors.push_non_field(
                "Exactly one of date_of_orientation and date_of_assessment must be set",
            );
        }
    }

    if let Some(ref email) = cleaned.ns_focal_point_email {
        for check in &rules.ns_focal_point_email.checks {
            match check {
                Check::Email if !email_regex().is_match(email) => {
                    errors.push_field("ns_focal_point_email", "Enter a valid email address");
                }
                Check::MaxLength(max) if email.len() > *max => {
                    errors.push_field(
                        "ns_focal_point_email",
                        format!("Must be at most {max} characters"),
                    );
                }
                _ => {}
            }
        }
    }

    if errors.is_empty() {
        Ok(cleaned)
    } else {
        Err(errors)
    }
}

/// Structural validation of the nested assessment tree.
///
/// Checks free-text lengths at every level and, when reference data is
/// available, that answers and ratings name known options. An empty tree
/// is valid: no area, component, or question response is required.
pub fn validate_assessment(
    assessment: &Assessment,
    reference: Option<&ReferenceData>,
) -> Result<Assessment, FormErrors> {
    let mut errors = FormErrors::new();

    for area_response in assessment.area_responses.iter() {
        let area_errors = errors.area_mut(area_response.area);

        for component_response in area_response.component_responses.iter() {
            let component_errors = area_errors.component_mut(component_response.component);

            let texts = [
                ("notes", &component_response.notes),
                ("urban_considerations", &component_response.urban_considerations),
                ("epi_considerations", &component_response.epi_considerations),
                (
                    "climate_environmental_considerations",
                    &component_response.climate_environmental_considerations,
                ),
            ];
            for (field, text) in texts {
                if let Some(text) = text {
                    if text.len() > MAX_NOTES_LEN {
                        component_errors.push_field(
                            field,
                            format!("Must be at most {MAX_NOTES_LEN} characters"),
                        );
                    }
                }
            }

            if let (Some(rating), Some(reference)) = (component_response.rating, reference) {
                if !reference.is_valid_rating(rating) {
                    component_errors.push_field("rating", format!("Unknown rating option {rating}"));
                }
            }

            for question_response in component_response.question_responses.iter() {
                let question_errors = component_errors.question_mut(question_response.question);

                if let Some(ref notes) = question_response.notes {
                    if notes.len() > MAX_NOTES_LEN {
                        question_errors.push_field(
                            "notes",
                            format!("Must be at most {MAX_NOTES_LEN} characters"),
                        );
                    }
                }

                if let (Some(answer), Some(reference)) = (question_response.answer, reference) {
                    if !reference.is_valid_answer(question_response.question, answer) {
                        question_errors
                            .push_field("answer", format!("Unknown answer option {answer}"));
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(assessment.clone())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{AnswerId, AreaId, ComponentId, CountryId, OverviewId, QuestionId};
    use chrono::NaiveDate;

    fn date(day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 1, day)
    }

    fn draft_overview() -> Overview {
        Overview {
            country: Some(CountryId::new(44)),
            date_of_orientation: date(5),
            date_of_assessment: None,
            assessment_method: Some("per".to_string()),
            branches_involved: Some("HQ".to_string()),
            ns_focal_point_email: None,
            is_draft: true,
        }
    }

    #[test]
    fn test_draft_rules_require_country_and_one_date() {
        let rules = overview_rules(&draft_overview());
        assert!(rules.country.required);
        assert!(rules.require_one_date);
        assert!(!rules.country.force_clear);
    }

    #[test]
    fn test_both_dates_missing_fails_cross_field_rule() {
        let mut overview = draft_overview();
        overview.date_of_orientation = None;

        let errors = validate_overview(&overview).unwrap_err();
        assert!(errors.non_field[0].contains("Exactly one"));
    }

    #[test]
    fn test_both_dates_set_fails_cross_field_rule() {
        let mut overview = draft_overview();
        overview.date_of_assessment = date(9);

        assert!(validate_overview(&overview).is_err());
    }

    #[test]
    fn test_exactly_one_date_passes() {
        assert!(validate_overview(&draft_overview()).is_ok());

        let mut overview = draft_overview();
        overview.date_of_orientation = None;
        overview.date_of_assessment = date(9);
        assert!(validate_overview(&overview).is_ok());
    }

    #[test]
    fn test_finalized_overview_skips_date_rule_and_force_clears() {
        // Finalized record with no dates at all: the exclusivity rule must
        // not block, and locked fields disappear from the output.
        let mut overview = draft_overview();
        overview.is_draft = false;
        overview.date_of_orientation = None;

        let cleaned = validate_overview(&overview).unwrap();
        assert_eq!(cleaned.country, None);
        assert_eq!(cleaned.date_of_orientation, None);
        assert_eq!(cleaned.date_of_assessment, None);
        assert_eq!(cleaned.assessment_method, None);
        assert_eq!(cleaned.branches_involved, None);
    }

    #[test]
    fn test_force_clear_overrides_user_input() {
        let mut overview = draft_overview();
        overview.is_draft = false;
        overview.date_of_assessment = date(20);

        let cleaned = validate_overview(&overview).unwrap();
        assert_eq!(cleaned.date_of_assessment, None);
        assert_eq!(cleaned.branches_involved, None);
    }

    #[test]
    fn test_missing_country_on_draft() {
        let mut overview = draft_overview();
        overview.country = None;

        let errors = validate_overview(&overview).unwrap_err();
        assert_eq!(errors.fields["country"], vec!["This field is required"]);
    }

    #[test]
    fn test_email_check() {
        let mut overview = draft_overview();
        overview.ns_focal_point_email = Some("not-an-email".to_string());
        let errors = validate_overview(&overview).unwrap_err();
        assert!(errors.fields.contains_key("ns_focal_point_email"));

        overview.ns_focal_point_email = Some("focal.point@example.org".to_string());
        assert!(validate_overview(&overview).is_ok());
    }

    #[test]
    fn test_empty_assessment_is_valid() {
        let assessment = Assessment::new(OverviewId::new(1));
        assert!(validate_assessment(&assessment, None).is_ok());
    }

    #[test]
    fn test_overlong_notes_rejected() {
        let mut assessment = Assessment::new(OverviewId::new(1));
        assessment
            .question_mut(AreaId::new(1), ComponentId::new(2), QuestionId::new(3))
            .notes = Some("x".repeat(MAX_NOTES_LEN + 1));

        let errors = validate_assessment(&assessment, None).unwrap_err();
        let question = errors
            .question(AreaId::new(1), ComponentId::new(2), QuestionId::new(3))
            .unwrap();
        assert!(question.fields.contains_key("notes"));
    }

    #[test]
    fn test_unknown_answer_rejected_with_reference() {
        use crate::domain::reference::{
            Area, AnswerOption, Component, PerOptions, Question, ReferenceData,
        };

        let reference = ReferenceData::new(
            vec![Area {
                id: AreaId::new(1),
                area_num: 1,
                title: "Area".to_string(),
            }],
            vec![Component {
                id: ComponentId::new(2),
                area: AreaId::new(1),
                component_num: 1,
                component_letter: None,
                title: "Component".to_string(),
                description: None,
            }],
            vec![Question {
                id: QuestionId::new(3),
                component: ComponentId::new(2),
                question_num: 1,
                question_text: "Q".to_string(),
                description: None,
                answers: vec![AnswerOption {
                    id: AnswerId::new(1),
                    text: "Yes".to_string(),
                }],
            }],
            PerOptions::default(),
        );

        let mut assessment = Assessment::new(OverviewId::new(1));
        assessment
            .question_mut(AreaId::new(1), ComponentId::new(2), QuestionId::new(3))
            .answer = Some(AnswerId::new(99));

        let errors = validate_assessment(&assessment, Some(&reference)).unwrap_err();
        let question = errors
            .question(AreaId::new(1), ComponentId::new(2), QuestionId::new(3))
            .unwrap();
        assert!(question.fields["answer"][0].contains("99"));
    }
}
