//! Question schema for the compliance questionnaire.
//!
//! The schema is an immutable, ordered list of questions. A built-in set of
//! fifteen questions matches the document generation backend; a TOML file can
//! replace it when the backend is configured for a different template.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Which kind of input control a question renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// A single line of text.
    #[default]
    SingleLineText,
    /// Free-form text that may span several lines.
    MultiLineText,
}

impl InputKind {
    /// Whether the control accepts line breaks.
    pub fn is_multi_line(self) -> bool {
        matches!(self, Self::MultiLineText)
    }
}

/// A single question in the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, used as the answer key on the wire
    pub id: String,

    /// Prompt text shown to the user
    pub label: String,

    /// Control kind
    #[serde(default)]
    pub kind: InputKind,

    /// Example text shown in an empty control; never submitted
    #[serde(default)]
    pub placeholder: String,
}

impl Question {
    /// Create a new question.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: InputKind,
        placeholder: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), label: label.into(), kind, placeholder: placeholder.into() }
    }
}

/// Errors raised while loading a schema from disk.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid schema file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Schema contains no questions")]
    Empty,

    #[error("Question at position {0} has an empty id")]
    BlankId(usize),

    #[error("Duplicate question id: {0}")]
    DuplicateId(String),
}

/// The ordered, immutable list of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSchema {
    questions: Vec<Question>,
}

impl QuestionSchema {
    /// Build a schema from a list of questions, checking ids.
    pub fn new(questions: Vec<Question>) -> Result<Self, SchemaError> {
        if questions.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, question) in questions.iter().enumerate() {
            if question.id.trim().is_empty() {
                return Err(SchemaError::BlankId(index + 1));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(SchemaError::DuplicateId(question.id.clone()));
            }
        }

        Ok(Self { questions })
    }

    /// Load a schema from a TOML file with a `[[questions]]` array.
    pub fn load_from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a schema from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SchemaError> {
        #[derive(Deserialize)]
        struct SchemaFile {
            #[serde(default)]
            questions: Vec<Question>,
        }

        let file: SchemaFile = toml::from_str(content)?;
        Self::new(file.questions)
    }

    /// The built-in compliance control questionnaire.
    pub fn compliance() -> Self {
        use InputKind::{MultiLineText, SingleLineText};

        let questions = vec![
            Question::new(
                "control_name",
                "Control Name",
                SingleLineText,
                "e.g., Monthly CDE Privileged Access Review",
            ),
            Question::new(
                "control_owner",
                "Control Owner / Performer",
                MultiLineText,
                "Role/Team and Backup/Delegate information",
            ),
            Question::new(
                "frequency",
                "Frequency",
                MultiLineText,
                "Cadence and execution window details",
            ),
            Question::new(
                "purpose",
                "Purpose / PCI Risk Mitigation",
                MultiLineText,
                "Explain the PCI-related risk this control addresses and how it reduces risk",
            ),
            Question::new(
                "procedure_steps",
                "Procedure Steps",
                MultiLineText,
                "Detailed step-by-step instructions that a new engineer could follow",
            ),
            Question::new(
                "tools_systems",
                "Tools & Systems",
                MultiLineText,
                "List the platforms, dashboards, or applications used",
            ),
            Question::new(
                "access_requirements",
                "Access Requirements",
                MultiLineText,
                "Define repos, folders, credentials, or elevated privileges needed",
            ),
            Question::new(
                "starting_point",
                "Starting Point",
                MultiLineText,
                "State exactly where the work begins (e.g., dashboard link, console path)",
            ),
            Question::new(
                "checks_criteria",
                "Checks & Criteria",
                MultiLineText,
                "What standards, thresholds, or PCI requirements are verified",
            ),
            Question::new(
                "failure_handling",
                "Failure Handling",
                MultiLineText,
                "Escalation path and remediation actions if the control check fails",
            ),
            Question::new(
                "additional_involvement",
                "Additional Involvement",
                MultiLineText,
                "Note if other teams or individuals are involved pre-approval",
            ),
            Question::new(
                "approval_signoff",
                "Approval / Sign-off",
                MultiLineText,
                "Define who signs off or provides final validation",
            ),
            Question::new(
                "evidence_storage",
                "Evidence Storage",
                MultiLineText,
                "Where control evidence is stored (e.g., SharePoint, Jira, secure folder)",
            ),
            Question::new(
                "work_location",
                "Work Location",
                MultiLineText,
                "Specify if performed by a local team, offshore team, or multiple sites",
            ),
            Question::new(
                "dependencies",
                "Dependencies",
                MultiLineText,
                "Identify upstream/downstream dependencies",
            ),
        ];

        Self { questions }
    }

    /// Questions in display order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the schema has no questions (never true for a built schema).
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by id.
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

impl Default for QuestionSchema {
    fn default() -> Self {
        Self::compliance()
    }
}
