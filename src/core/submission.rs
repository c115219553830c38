//! Submission payloads and generated document results.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::form::Form;
use super::team::{Team, TeamId};

/// One answered question, carrying its label so the backend does not need
/// the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Question label
    pub question: String,
    /// Trimmed answer text
    pub answer: String,
}

/// Answers keyed by question id, in schema order.
///
/// Serializes as a JSON object whose keys keep the insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    entries: Vec<(String, Answer)>,
}

impl Answers {
    /// Number of answers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no question was answered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an answer by question id.
    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.entries.iter().find(|(id, _)| id == question_id).map(|(_, answer)| answer)
    }

    /// Question ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Iterate over `(question_id, answer)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.entries.iter().map(|(id, answer)| (id.as_str(), answer))
    }

    fn push(&mut self, question_id: String, answer: Answer) {
        self.entries.push((question_id, answer));
    }
}

impl Serialize for Answers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, answer) in &self.entries {
            map.serialize_entry(id, answer)?;
        }
        map.end()
    }
}

/// Payload sent to the document generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub team_id: TeamId,
    pub team_name: String,
    pub answers: Answers,
}

impl Submission {
    /// Build a submission from the current form values.
    ///
    /// Only fields with a non-blank trimmed value are included.
    pub fn from_form(team: &Team, form: &Form) -> Self {
        let mut answers = Answers::default();
        for field in form.fields() {
            if let Some(value) = field.trimmed_value() {
                answers.push(
                    field.question_id.clone(),
                    Answer { question: field.label.clone(), answer: value.to_string() },
                );
            }
        }

        Self { team_id: team.id.clone(), team_name: team.name.clone(), answers }
    }
}

/// Result of a successful document generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub document_name: String,
    pub download_url: String,
}

impl GeneratedDocument {
    /// The download link presented to the user.
    pub fn link(&self) -> DownloadLink {
        DownloadLink { download_name: self.document_name.clone(), href: self.download_url.clone() }
    }
}

/// A named, downloadable link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    /// File name the download is saved under
    pub download_name: String,
    /// Link target
    pub href: String,
}
