//! Teams offered in the team selector.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label of the empty dropdown entry.
pub const TEAM_PLACEHOLDER: &str = "Select a team...";

/// Opaque team identifier.
///
/// The directory may return numeric or textual ids. The original JSON type is
/// kept so it round-trips unchanged into the submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamId {
    /// Numeric id, e.g. a database primary key
    Number(i64),
    /// Any other id
    Text(String),
}

impl TeamId {
    /// Compare against a value selected in the UI, which is always text.
    ///
    /// `TeamId::Number(2)` matches `"2"`.
    pub fn matches(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::Number(n) => value.parse::<i64>().is_ok_and(|v| v == *n),
            Self::Text(s) => s == value,
        }
    }

    /// Coerce a JSON scalar from the team directory.
    ///
    /// Integers stay numeric. Other numbers, strings and booleans keep their
    /// text form, so `2.5` becomes `"2.5"`. `null`, arrays and objects give `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(n.as_i64().map_or_else(|| Self::Text(n.to_string()), Self::Number)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Bool(b) => Some(Self::Text(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for TeamId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for TeamId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A team a questionnaire can be filed for.
///
/// Unknown fields in directory responses are dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    /// Create a new team.
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }

    /// Coerce one entry of a team directory response.
    ///
    /// A missing or `null` name becomes empty. Entries that are not objects,
    /// have no usable id, or carry a nested name are rejected.
    pub fn from_directory_entry(entry: &Value) -> Option<Self> {
        let fields = entry.as_object()?;
        let id = TeamId::from_json(fields.get("id")?)?;
        let name = match fields.get("name") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(name)) => name.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Array(_) | Value::Object(_)) => return None,
        };
        Some(Self { id, name })
    }
}

/// Teams used when the team directory cannot be reached.
pub fn fallback_teams() -> Vec<Team> {
    vec![
        Team::new(1, "Engineering"),
        Team::new(2, "Legal"),
        Team::new(3, "HR"),
        Team::new(4, "Finance"),
        Team::new(5, "Operations"),
    ]
}

/// Where the current team list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeamSource {
    /// Not loaded yet
    #[default]
    NotLoaded,
    /// Returned by the team directory
    Directory,
    /// Directory unavailable; fixed fallback set in use
    Fallback,
}

/// One entry of the team dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamOption {
    /// Value reported on selection; empty for the placeholder
    pub value: String,
    /// Text shown to the user
    pub label: String,
}

impl TeamOption {
    /// The empty "select a team" entry.
    pub fn placeholder() -> Self {
        Self { value: String::new(), label: TEAM_PLACEHOLDER.to_string() }
    }

    /// Whether this is the empty entry.
    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<&Team> for TeamOption {
    fn from(team: &Team) -> Self {
        Self { value: team.id.to_string(), label: team.name.clone() }
    }
}

/// Build dropdown options: the placeholder followed by one entry per team.
pub fn team_options(teams: &[Team]) -> Vec<TeamOption> {
    std::iter::once(TeamOption::placeholder()).chain(teams.iter().map(TeamOption::from)).collect()
}

/// Find a team by a selected dropdown value.
pub fn find_team<'a>(teams: &'a [Team], value: &str) -> Option<&'a Team> {
    teams.iter().find(|team| team.id.matches(value))
}
