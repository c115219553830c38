//! The rendered questionnaire form.
//!
//! A [`Form`] is generated from a [`QuestionSchema`]: one numbered, required
//! field per question, in schema order. Field values start empty; placeholders
//! are only display hints.

use super::schema::{InputKind, Question, QuestionSchema};

/// A single rendered input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// 1-based position in the form
    pub number: usize,
    /// Question id the value is stored under
    pub question_id: String,
    /// Question label as defined by the schema
    pub label: String,
    /// Control kind
    pub kind: InputKind,
    /// Hint shown while the value is empty
    pub placeholder: String,
    /// Whether the control is marked mandatory
    pub required: bool,
    /// Current value as typed
    pub value: String,
}

impl FormField {
    fn from_question(number: usize, question: &Question) -> Self {
        Self {
            number,
            question_id: question.id.clone(),
            label: question.label.clone(),
            kind: question.kind,
            placeholder: question.placeholder.clone(),
            required: true,
            value: String::new(),
        }
    }

    /// Label as displayed, e.g. `"1. Control Name"`.
    pub fn display_label(&self) -> String {
        format!("{}. {}", self.number, self.label)
    }

    /// The value with surrounding whitespace removed, if anything remains.
    pub fn trimmed_value(&self) -> Option<&str> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Replace the value. Line breaks are dropped for single-line controls.
    pub fn set_value(&mut self, value: &str) {
        self.value = if self.kind.is_multi_line() {
            value.to_string()
        } else {
            value.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
        };
    }
}

/// The set of inputs currently rendered for the selected team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    fields: Vec<FormField>,
}

impl Form {
    /// Render a fresh, empty form from the schema.
    pub fn generate(schema: &QuestionSchema) -> Self {
        let fields = schema
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| FormField::from_question(index + 1, question))
            .collect();
        Self { fields }
    }

    /// Fields in display order.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Number of rendered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at a display position (0-based).
    pub fn field(&self, index: usize) -> Option<&FormField> {
        self.fields.get(index)
    }

    /// Mutable field at a display position (0-based).
    pub fn field_mut(&mut self, index: usize) -> Option<&mut FormField> {
        self.fields.get_mut(index)
    }

    /// Current value for a question.
    pub fn value(&self, question_id: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.question_id == question_id).map(|f| f.value.as_str())
    }

    /// Set the value for a question. Returns `false` if no such field exists.
    pub fn set_value(&mut self, question_id: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.question_id == question_id) {
            Some(field) => {
                field.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Whether at least one field has a non-blank value.
    pub fn has_answers(&self) -> bool {
        self.fields.iter().any(|f| f.trimmed_value().is_some())
    }

    /// Clear every value, keeping the rendered structure.
    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
    }
}
