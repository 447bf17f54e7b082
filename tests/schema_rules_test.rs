//! Conditional overview rule behavior: draft/final branching, date
//! exclusivity, and force-clear semantics.

use chrono::NaiveDate;
use goform::domain::ids::CountryId;
use goform::domain::Overview;
use goform::form::{overview_rules, validate_overview};
use test_case::test_case;

fn overview(is_draft: bool, orientation: Option<u32>, assessment: Option<u32>) -> Overview {
    Overview {
        country: Some(CountryId::new(44)),
        date_of_orientation: orientation.and_then(|d| NaiveDate::from_ymd_opt(2025, 3, d)),
        date_of_assessment: assessment.and_then(|d| NaiveDate::from_ymd_opt(2025, 3, d)),
        assessment_method: Some("per".to_string()),
        branches_involved: None,
        ns_focal_point_email: None,
        is_draft,
    }
}

#[test_case(Some(1), None, true ; "orientation only is valid")]
#[test_case(None, Some(2), true ; "assessment only is valid")]
#[test_case(None, None, false ; "no date is invalid")]
#[test_case(Some(1), Some(2), false ; "both dates is invalid")]
fn draft_date_exclusivity(orientation: Option<u32>, assessment: Option<u32>, valid: bool) {
    let result = validate_overview(&overview(true, orientation, assessment));
    assert_eq!(result.is_ok(), valid);
}

#[test_case(None, None ; "no date")]
#[test_case(Some(1), Some(2) ; "both dates")]
fn finalized_overview_ignores_date_exclusivity(orientation: Option<u32>, assessment: Option<u32>) {
    let result = validate_overview(&overview(false, orientation, assessment));
    assert!(result.is_ok());
}

#[test]
fn rules_are_a_pure_function_of_the_value() {
    let value = overview(true, Some(1), None);
    assert_eq!(overview_rules(&value), overview_rules(&value.clone()));

    // Flipping the branching input changes the resolved rules
    let finalized = overview(false, Some(1), None);
    assert_ne!(overview_rules(&value), overview_rules(&finalized));
}

#[test]
fn draft_branch_requires_country() {
    let rules = overview_rules(&overview(true, Some(1), None));
    assert!(rules.country.required);
    assert!(!rules.country.force_clear);
    assert!(rules.require_one_date);
}

#[test]
fn final_branch_force_clears_locked_fields() {
    let rules = overview_rules(&overview(false, Some(1), None));
    assert!(rules.country.force_clear);
    assert!(rules.date_of_orientation.force_clear);
    assert!(rules.date_of_assessment.force_clear);
    assert!(rules.assessment_method.force_clear);
    assert!(!rules.require_one_date);
}

#[test]
fn force_clear_wins_over_user_input() {
    // The user typed values into fields the server locks on finalization;
    // the cleaned snapshot drops them instead of failing.
    let mut value = overview(false, Some(1), None);
    value.branches_involved = Some("HQ, North".to_string());

    let cleaned = validate_overview(&value).unwrap();
    assert_eq!(cleaned.country, None);
    assert_eq!(cleaned.date_of_orientation, None);
    assert_eq!(cleaned.assessment_method, None);
    assert_eq!(cleaned.branches_involved, None);
}

#[test]
fn force_clear_does_not_mutate_the_input() {
    let value = overview(false, Some(1), None);
    let _ = validate_overview(&value).unwrap();
    // The session's copy keeps the user's data; only the snapshot is cleaned
    assert!(value.country.is_some());
    assert!(value.date_of_orientation.is_some());
}

#[test]
fn email_survives_finalization_and_is_still_checked() {
    let mut value = overview(false, Some(1), None);
    value.ns_focal_point_email = Some("focal.point@example.org".to_string());
    let cleaned = validate_overview(&value).unwrap();
    assert_eq!(
        cleaned.ns_focal_point_email.as_deref(),
        Some("focal.point@example.org")
    );

    value.ns_focal_point_email = Some("not an email".to_string());
    assert!(validate_overview(&value).is_err());
}
