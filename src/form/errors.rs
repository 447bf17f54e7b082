//! Form error trees
//!
//! Validation and submission errors shaped like the response tree and keyed
//! by business ids, so a lookup like `errors.question(area, component,
//! question)` works the same whether the message came from local schema
//! validation or from the server. Each level carries per-field messages and
//! a non-field bucket for messages that could not be pinned to a single
//! field (cross-field rules, unresolvable server paths).

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::ids::{AreaId, ComponentId, QuestionId};

/// Errors attached to one question response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionErrors {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_field: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Vec<String>>,
}

/// Errors attached to one component response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentErrors {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_field: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub questions: IndexMap<QuestionId, QuestionErrors>,
}

/// Errors attached to one area response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaErrors {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_field: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub components: IndexMap<ComponentId, ComponentErrors>,
}

/// The root error tree for a form session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormErrors {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_field: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub areas: IndexMap<AreaId, AreaErrors>,
}

impl QuestionErrors {
    pub fn is_empty(&self) -> bool {
        self.non_field.is_empty() && self.fields.is_empty()
    }

    pub fn push_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }
}

impl ComponentErrors {
    pub fn is_empty(&self) -> bool {
        self.non_field.is_empty()
            && self.fields.is_empty()
            && self.questions.values().all(QuestionErrors::is_empty)
    }

    pub fn push_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// Error bucket for one question, created on first use
    pub fn question_mut(&mut self, question: QuestionId) -> &mut QuestionErrors {
        self.questions.entry(question).or_default()
    }
}

impl AreaErrors {
    pub fn is_empty(&self) -> bool {
        self.non_field.is_empty()
            && self.fields.is_empty()
            && self.components.values().all(ComponentErrors::is_empty)
    }

    pub fn push_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// Error bucket for one component, created on first use
    pub fn component_mut(&mut self, component: ComponentId) -> &mut ComponentErrors {
        self.components.entry(component).or_default()
    }
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tree carries no message at any level
    pub fn is_empty(&self) -> bool {
        self.non_field.is_empty()
            && self.fields.is_empty()
            && self.areas.values().all(AreaErrors::is_empty)
    }

    pub fn push_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn push_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// Error bucket for one area, created on first use
    pub fn area_mut(&mut self, area: AreaId) -> &mut AreaErrors {
        self.areas.entry(area).or_default()
    }

    /// Read-only lookup of one area's errors
    pub fn area(&self, area: AreaId) -> Option<&AreaErrors> {
        self.areas.get(&area)
    }

    /// Read-only lookup of one question's errors by full business-key path
    pub fn question(
        &self,
        area: AreaId,
        component: ComponentId,
        question: QuestionId,
    ) -> Option<&QuestionErrors> {
        self.areas.get(&area)?.components.get(&component)?.questions.get(&question)
    }

    /// Folds another error tree into this one (local validation errors plus
    /// projected server errors end up in a single tree)
    pub fn merge(&mut self, other: FormErrors) {
        self.non_field.extend(other.non_field);
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
        for (area_id, area) in other.areas {
            let target = self.area_mut(area_id);
            target.non_field.extend(area.non_field);
            for (field, messages) in area.fields {
                target.fields.entry(field).or_default().extend(messages);
            }
            for (component_id, component) in area.components {
                let target = target.component_mut(component_id);
                target.non_field.extend(component.non_field);
                for (field, messages) in component.fields {
                    target.fields.entry(field).or_default().extend(messages);
                }
                for (question_id, question) in component.questions {
                    let target = target.question_mut(question_id);
                    target.non_field.extend(question.non_field);
                    for (field, messages) in question.fields {
                        target.fields.entry(field).or_default().extend(messages);
                    }
                }
            }
        }
    }

    /// Total number of messages across the whole tree
    pub fn message_count(&self) -> usize {
        let field_count =
            |fields: &BTreeMap<String, Vec<String>>| fields.values().map(Vec::len).sum::<usize>();
        let mut count = self.non_field.len() + field_count(&self.fields);
        for area in self.areas.values() {
            count += area.non_field.len() + field_count(&area.fields);
            for component in area.components.values() {
                count += component.non_field.len() + field_count(&component.fields);
                for question in component.questions.values() {
                    count += question.non_field.len() + field_count(&question.fields);
                }
            }
        }
        count
    }
}
