//! Server rejection projection: positional paths from a 400 payload land
//! on the right business keys of the submitted tree, and a session keeps
//! the user's input after a failed submission.

use chrono::NaiveDate;
use goform::domain::ids::{AnswerId, AreaId, ComponentId, CountryId, OverviewId, QuestionId, RatingId};
use goform::form::{project_payload, ApiErrorPayload, FormPhase, FormSession};

fn rejected_payload(json: &str) -> ApiErrorPayload {
    serde_json::from_str(json).unwrap()
}

/// Builds a session whose submitted tree has area 7 at position 0, its
/// component 14 at position 0, and question 9 at position 2.
fn session_with_tree() -> FormSession {
    let mut session = FormSession::new(OverviewId::new(1));
    session
        .with_overview(|o| {
            o.country = Some(CountryId::new(44));
            o.date_of_assessment = NaiveDate::from_ymd_opt(2025, 4, 10);
        })
        .unwrap();

    for question in [4, 6, 9] {
        session
            .answer(
                AreaId::new(7),
                ComponentId::new(14),
                QuestionId::new(question),
                AnswerId::new(1),
            )
            .unwrap();
    }
    session
        .rate(AreaId::new(7), ComponentId::new(14), RatingId::new(3))
        .unwrap();
    session
}

#[test]
fn rejected_submission_projects_onto_business_keys() {
    let mut session = session_with_tree();
    let (_, submitted) = session.begin_submit(None).unwrap();

    let payload = rejected_payload(
        r#"{
            "message": "Please correct the errors below",
            "form_errors": [
                {"path": ["area_responses", 0, "component_responses", 0,
                          "question_responses", 2, "answer"],
                 "messages": ["Invalid answer for this question."]},
                {"path": ["area_responses", 0, "component_responses", 0, "rating"],
                 "messages": ["Ensure this value is less than or equal to 5."]}
            ]
        }"#,
    );

    let errors = project_payload(&payload, &submitted);
    session.fail_submit(errors);

    assert_eq!(session.phase(), FormPhase::SubmitFailed);

    // Position 2 in the wire body resolves to question 9, not any index
    let question = session
        .errors()
        .question(AreaId::new(7), ComponentId::new(14), QuestionId::new(9))
        .unwrap();
    assert_eq!(
        question.fields["answer"],
        vec!["Invalid answer for this question."]
    );

    let component =
        &session.errors().area(AreaId::new(7)).unwrap().components[&ComponentId::new(14)];
    assert_eq!(
        component.fields["rating"],
        vec!["Ensure this value is less than or equal to 5."]
    );

    // The banner message leads the root non-field list
    assert_eq!(
        session.errors().non_field[0],
        "Please correct the errors below"
    );
}

#[test]
fn failed_submission_preserves_every_answer() {
    let mut session = session_with_tree();
    let (_, submitted) = session.begin_submit(None).unwrap();
    let before = session.assessment().clone();

    let payload = rejected_payload(
        r#"{"message": "Rejected", "form_errors": []}"#,
    );
    session.fail_submit(project_payload(&payload, &submitted));

    assert_eq!(session.assessment(), &before);
    assert_eq!(session.assessment().answered_count(), 3);
}

#[test]
fn unresolvable_paths_surface_at_nearest_ancestor() {
    let mut session = session_with_tree();
    let (_, submitted) = session.begin_submit(None).unwrap();

    let payload = rejected_payload(
        r#"{
            "message": "",
            "form_errors": [
                {"path": ["area_responses", 5, "component_responses", 0, "rating"],
                 "messages": ["Area index beyond the submitted body"]},
                {"path": ["area_responses", 0, "component_responses", 0,
                          "question_responses", 40, "answer"],
                 "messages": ["Question index beyond the submitted body"]}
            ]
        }"#,
    );

    let errors = project_payload(&payload, &submitted);

    // Bad area index falls back to the root, bad question index to its
    // resolvable component; neither message disappears
    assert_eq!(
        errors.non_field,
        vec!["Area index beyond the submitted body"]
    );
    let component = &errors.area(AreaId::new(7)).unwrap().components[&ComponentId::new(14)];
    assert_eq!(
        component.non_field,
        vec!["Question index beyond the submitted body"]
    );
}

#[test]
fn overview_field_errors_stay_at_the_root() {
    let mut session = session_with_tree();
    let (_, submitted) = session.begin_submit(None).unwrap();

    let payload = rejected_payload(
        r#"{
            "message": "Validation failed",
            "form_errors": [
                {"path": ["overview"], "messages": ["Unknown overview id."]}
            ]
        }"#,
    );

    let errors = project_payload(&payload, &submitted);
    assert_eq!(errors.fields["overview"], vec!["Unknown overview id."]);
}

#[test]
fn edit_after_failure_returns_to_editing() {
    let mut session = session_with_tree();
    let (_, submitted) = session.begin_submit(None).unwrap();
    session.fail_submit(project_payload(
        &rejected_payload(r#"{"message": "Rejected", "form_errors": []}"#),
        &submitted,
    ));
    assert_eq!(session.phase(), FormPhase::SubmitFailed);

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
