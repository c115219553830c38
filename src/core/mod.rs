//! Core types and functionality for compliance-form.
//!
//! This module contains the questionnaire data model (schema, teams, form,
//! submission), the workflow controller that ties them together, the
//! UI-independent event types, and configuration.

mod config;
pub mod events;
mod form;
mod schema;
mod submission;
mod team;
pub mod workflow;

pub use config::{ApiConfig, Config, SchemaConfig, UiConfig, API_URL_ENV, LOCAL_CONFIG_FILE};
pub use events::{dispatch, Change, Click, EventHandler, EventSource, ScriptedEvents, UiEvent};
pub use form::{Form, FormField};
pub use schema::{InputKind, Question, QuestionSchema, SchemaError};
pub use submission::{Answer, Answers, DownloadLink, GeneratedDocument, Submission};
pub use team::{
    fallback_teams, find_team, team_options, Team, TeamId, TeamOption, TeamSource,
    TEAM_PLACEHOLDER,
};
pub use workflow::{
    CompletedSubmit, Modal, Notice, PendingSubmit, SessionState, SubmitControl, SubmitGuard,
    SubmitOutcome, ValidationError, View, WorkflowController, RESET_PROMPT, SUBMIT_BUSY_LABEL,
    SUBMIT_LABEL,
};
