//! Reference entities
//!
//! The fixed PER questionnaire structure: areas, components, questions and
//! their answer options, plus the global option lists. Fetched once per
//! session and treated as a read-only lookup table; display order comes
//! from the numeric ordering fields here, never from response array
//! positions.

use serde::{Deserialize, Serialize};

use super::ids::{AnswerId, AreaId, ComponentId, QuestionId, RatingId};

/// Top-level grouping of the questionnaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub area_num: u32,
    pub title: String,
}

/// A component within an area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    /// Area this component belongs to
    pub area: AreaId,
    pub component_num: u32,
    #[serde(default)]
    pub component_letter: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A question within a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// Component this question belongs to
    pub component: ComponentId,
    pub question_num: u32,
    pub question_text: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Static choice set for this question
    #[serde(default)]
    pub answers: Vec<AnswerOption>,
}

/// A selectable answer for a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: AnswerId,
    pub text: String,
}

/// A component rating option (0 "not reviewed" through 5)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingOption {
    pub id: RatingId,
    pub value: u32,
    pub title: String,
}

/// Global option lists served by `/per-options/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerOptions {
    #[serde(default)]
    pub answers: Vec<AnswerOption>,
    #[serde(default)]
    pub component_ratings: Vec<RatingOption>,
}

/// The complete read-only questionnaire structure for one form session.
///
/// Construction sorts every level by its natural ordering field, so
/// iteration order here is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReferenceDataParts")]
pub struct ReferenceData {
    areas: Vec<Area>,
    components: Vec<Component>,
    questions: Vec<Question>,
    options: PerOptions,
}

/// Unordered wire/file shape of [`ReferenceData`]
#[derive(Debug, Deserialize)]
struct ReferenceDataParts {
    areas: Vec<Area>,
    components: Vec<Component>,
    questions: Vec<Question>,
    #[serde(default)]
    options: PerOptions,
}

impl From<ReferenceDataParts> for ReferenceData {
    fn from(parts: ReferenceDataParts) -> Self {
        ReferenceData::new(parts.areas, parts.components, parts.questions, parts.options)
    }
}

impl ReferenceData {
    /// Builds the lookup table, sorting areas by `area_num`, components by
    /// `component_num` then letter, and questions by `question_num`.
    pub fn new(
        mut areas: Vec<Area>,
        mut components: Vec<Component>,
        mut questions: Vec<Question>,
        options: PerOptions,
    ) -> Self {
        areas.sort_by_key(|a| a.area_num);
        components.sort_by(|a, b| {
            (a.component_num, &a.component_letter).cmp(&(b.component_num, &b.component_letter))
        });
        questions.sort_by_key(|q| q.question_num);

        Self {
            areas,
            components,
            questions,
            options,
        }
    }

    /// Areas in display order
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Components of one area, in display order
    pub fn components_of(&self, area: AreaId) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(move |c| c.area == area)
    }

    /// Questions of one component, in display order
    pub fn questions_of(&self, component: ComponentId) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.component == component)
    }

    /// Looks up an area by id
    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    /// Looks up a component by id
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Looks up a question by id
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Whether `answer` is a valid choice for `question`.
    ///
    /// Falls back to the global answer list for questions that carry no
    /// inline choice set.
    pub fn is_valid_answer(&self, question: QuestionId, answer: AnswerId) -> bool {
        match self.question(question) {
            Some(q) if !q.answers.is_empty() => q.answers.iter().any(|a| a.id == answer),
            _ => self.options.answers.iter().any(|a| a.id == answer),
        }
    }

    /// Whether `rating` names a known component rating option
    pub fn is_valid_rating(&self, rating: RatingId) -> bool {
        self.options.component_ratings.iter().any(|r| r.id == rating)
    }

    /// Total number of questions in the questionnaire
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
