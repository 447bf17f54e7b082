//! Server error projection
//!
//! The GO server reports submission failures as a flat list of path/message
//! pairs whose paths address array positions in the request body, e.g.
//! `["area_responses", 2, "component_responses", 1, "question_responses",
//! 0, "question"]`. Positions are meaningless to the UI, which looks
//! errors up by business key. [`project`] walks each positional path
//! against the submitted tree, resolves every index back to the element's
//! key, and produces the same [`FormErrors`] shape local validation does.
//!
//! A message whose path cannot be fully resolved (index out of range,
//! missing list, malformed path) attaches as a non-field error at the
//! nearest resolvable ancestor. No message is ever dropped.
//!
//! This is a pure, synchronous transform over an already-parsed payload.

use serde::{Deserialize, Serialize};

use super::errors::FormErrors;
use crate::domain::response::Assessment;

/// One segment of a positional error path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array position in the submitted body
    Index(usize),
    /// Object field name
    Field(String),
}

/// One flat field error as the server reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatError {
    pub path: Vec<PathSegment>,
    pub messages: Vec<String>,
}

/// The structured failure payload the server returns alongside a rejected
/// submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorPayload {
    /// Human-readable summary shown as a banner
    pub message: String,
    #[serde(default)]
    pub form_errors: Vec<FlatError>,
}

/// Projects flat positional server errors onto a business-key error tree.
///
/// `submitted` must be the tree the request body was serialized from;
/// positions are resolved against it, not against whatever the session
/// holds by the time the response arrives.
pub fn project(flat_errors: &[FlatError], submitted: &Assessment) -> FormErrors {
    let mut errors = FormErrors::new();
    for flat in flat_errors {
        project_one(flat, submitted, &mut errors);
    }
    errors
}

/// Projects a whole failure payload: the summary message becomes a root
/// non-field error, the field errors are resolved by path.
pub fn project_payload(payload: &ApiErrorPayload, submitted: &Assessment) -> FormErrors {
    let mut errors = project(&payload.form_errors, submitted);
    if !payload.message.is_empty() {
        errors.non_field.insert(0, payload.message.clone());
    }
    errors
}

fn project_one(flat: &FlatError, submitted: &Assessment, errors: &mut FormErrors) {
    use PathSegment::{Field, Index};

    match flat.path.as_slice() {
        // Root-level errors.
        [] => push_all(&mut errors.non_field, flat),
        [Field(name)] if name != "area_responses" => {
            push_field(&mut errors.fields, name, flat);
        }

        [Field(name), Index(i), rest @ ..] if name == "area_responses" => {
            let Some(area_response) = submitted.area_responses.get_index(*i) else {
                // Index does not resolve; root is the nearest ancestor.
                push_all(&mut errors.non_field, flat);
                return;
            };
            let area_errors = errors.area_mut(area_response.area);

            match rest {
                [] => push_all(&mut area_errors.non_field, flat),
                [Field(name)] if name != "component_responses" => {
                    push_field(&mut area_errors.fields, name, flat);
                }

                [Field(name), Index(j), rest @ ..] if name == "component_responses" => {
                    let Some(component_response) = area_response.component_responses.get_index(*j)
                    else {
                        push_all(&mut area_errors.non_field, flat);
                        return;
                    };
                    let component_errors = area_errors.component_mut(component_response.component);

                    match rest {
                        [] => push_all(&mut component_errors.non_field, flat),
                        [Field(name)] if name != "question_responses" => {
                            push_field(&mut component_errors.fields, name, flat);
                        }

                        [Field(name), Index(k), rest @ ..] if name == "question_responses" => {
                            let Some(question_response) =
                                component_response.question_responses.get_index(*k)
                            else {
                                push_all(&mut component_errors.non_field, flat);
                                return;
                            };
                            let question_errors =
                                component_errors.question_mut(question_response.question);

                            match rest {
                                [] => push_all(&mut question_errors.non_field, flat),
                                [Field(name)] => {
                                    push_field(&mut question_errors.fields, name, flat);
                                }
                                // Deeper or malformed tails stop at the
                                // question level.
                                _ => push_all(&mut question_errors.non_field, flat),
                            }
                        }
                        _ => push_all(&mut component_errors.non_field, flat),
                    }
                }
                _ => push_all(&mut area_errors.non_field, flat),
            }
        }

        // Leading index, bare list name, or any other malformed head.
        _ => push_all(&mut errors.non_field, flat),
    }
}

fn push_all(bucket: &mut Vec<String>, flat: &FlatError) {
    bucket.extend(flat.messages.iter().cloned());
}

fn push_field(
    fields: &mut std::collections::BTreeMap<String, Vec<String>>,
    name: &str,
    flat: &FlatError,
) {
    fields
        .entry(name.to_string())
        .or_default()
        .extend(flat.messages.iter().cloned());
}
