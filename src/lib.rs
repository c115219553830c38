//! # compliance-form
//!
//! Terminal client for the compliance procedure generator.
//!
//! A team picks itself from the team directory, answers a fixed questionnaire
//! describing one compliance control, and asks the document service to turn
//! the answers into a downloadable procedure document.
//!
//! ## Features
//!
//! - **Questionnaire**: 15 built-in questions, or your own set from a TOML file
//! - **Offline teams**: falls back to a fixed team list when the directory is unreachable
//! - **Scriptable**: `submit` sends answers from a TOML or JSON file without the TUI
//! - **Themes**: default, dracula and nord
//!
//! ## Quick Start
//!
//! ```bash
//! # Fill in the questionnaire interactively
//! cform
//!
//! # Or submit answers from a file
//! cform submit --team 2 --answers answers.toml
//! ```
//!
//! ## Library use
//!
//! The workflow is UI-independent. Drive a [`WorkflowController`] with
//! [`UiEvent`]s against any [`api::FormApi`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use compliance_form::{api::HttpFormApi, QuestionSchema, UiEvent, WorkflowController};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let api = HttpFormApi::new("http://localhost:9090", std::time::Duration::from_secs(30))?;
//! let mut controller = WorkflowController::new(Arc::new(QuestionSchema::compliance()), Arc::new(api));
//! controller.load_teams().await;
//! controller.handle_event(UiEvent::team("2"));
//! controller.handle_event(UiEvent::field("control_name", "Quarterly Access Review"));
//! let outcome = controller.submit().await;
//! assert!(outcome.is_generated());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::if_not_else)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]

pub mod api;
pub mod app;
pub mod core;
pub mod tui;

// Re-export commonly used types
pub use app::App;
pub use core::{
    Config, Form, GeneratedDocument, QuestionSchema, Submission, Team, TeamId, UiEvent,
    WorkflowController,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "compliance-form";

/// Short alias
pub const APP_ALIAS: &str = "cform";
