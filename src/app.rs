//! Application state for the interactive questionnaire.
//!
//! `App` wraps the [`WorkflowController`] with what only the terminal UI needs:
//! keyboard focus, the open team dropdown, the theme, the in-flight request
//! and status messages.

use std::path::PathBuf;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::core::{
    Change, Click, CompletedSubmit, Config, Modal, TeamOption, UiEvent, WorkflowController,
};
use crate::tui::Theme;

/// Which control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The team dropdown
    #[default]
    Teams,
    /// A questionnaire field (0-based display position)
    Field(usize),
    /// The submit button
    Submit,
    /// The reset button
    Reset,
}

/// Main application state.
pub struct App {
    /// The questionnaire workflow
    pub controller: WorkflowController,

    /// Current UI theme
    pub theme: Theme,

    /// Control with keyboard focus
    pub focus: Focus,

    /// Whether the team dropdown list is open
    pub team_picker_open: bool,

    /// Highlighted entry in the team dropdown (0 is the placeholder)
    pub team_picker_index: usize,

    /// Highlighted button in the reset confirmation (0 = yes, 1 = no)
    pub confirm_selected: usize,

    /// Status message to display (if any)
    pub status_message: Option<String>,

    /// Whether the application should quit
    pub should_quit: bool,

    /// Where documents are downloaded to
    pub download_dir: PathBuf,

    runtime: Handle,
    in_flight: Option<JoinHandle<CompletedSubmit>>,
}

impl App {
    /// Create the app around a controller whose teams are already loaded.
    pub fn new(controller: WorkflowController, config: &Config, runtime: Handle) -> Self {
        Self {
            controller,
            theme: Theme::from_config(&config.ui.theme),
            focus: Focus::Teams,
            team_picker_open: false,
            team_picker_index: 0,
            confirm_selected: 1,
            status_message: None,
            should_quit: false,
            download_dir: config.ui.download_dir(),
            runtime,
            in_flight: None,
        }
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Dropdown entries.
    pub fn team_options(&self) -> Vec<TeamOption> {
        self.controller.team_options()
    }

    /// Label shown in the collapsed dropdown.
    pub fn selected_team_label(&self) -> String {
        self.controller
            .selected_team()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| crate::core::TEAM_PLACEHOLDER.to_string())
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Apply a UI event to the workflow, starting the request for a valid submit.
    pub fn dispatch(&mut self, event: UiEvent) {
        let is_team_change = matches!(event, UiEvent::Change(Change::Team(_)));

        if let Some(pending) = self.controller.handle_event(event) {
            let api = self.controller.api();
            self.in_flight =
                Some(self.runtime.spawn(async move { pending.send(api.as_ref()).await }));
        }

        if is_team_change {
            self.sync_after_team_change();
        }
        if matches!(self.controller.modal(), Some(Modal::ConfirmReset)) {
            self.confirm_selected = 1;
        }
    }

    fn sync_after_team_change(&mut self) {
        self.team_picker_open = false;
        self.focus = Focus::Teams;
        self.team_picker_index = self.current_team_index();
    }

    /// Position of the selected team in the dropdown (0 when none).
    fn current_team_index(&self) -> usize {
        let Some(team) = self.controller.selected_team() else {
            return 0;
        };
        self.controller.teams().iter().position(|t| t.id == team.id).map_or(0, |i| i + 1)
    }

    /// Open the team dropdown with the current selection highlighted.
    pub fn open_team_picker(&mut self) {
        self.team_picker_index = self.current_team_index();
        self.team_picker_open = true;
    }

    /// Close the team dropdown without changing the selection.
    pub fn close_team_picker(&mut self) {
        self.team_picker_open = false;
    }

    pub fn team_picker_up(&mut self) {
        self.team_picker_index = self.team_picker_index.saturating_sub(1);
    }

    pub fn team_picker_down(&mut self) {
        let last = self.team_options().len().saturating_sub(1);
        self.team_picker_index = (self.team_picker_index + 1).min(last);
    }

    /// Select the highlighted dropdown entry.
    pub fn choose_team(&mut self) {
        let value = self
            .team_options()
            .get(self.team_picker_index)
            .map(|option| option.value.clone())
            .unwrap_or_default();
        self.dispatch(UiEvent::team(value));
    }

    /// Number of rendered fields (0 on the welcome view).
    fn field_count(&self) -> usize {
        self.controller.form().map_or(0, |f| f.len())
    }

    /// Focus order: dropdown, fields, submit, reset.
    pub fn focus_next(&mut self) {
        let count = self.field_count();
        self.focus = match self.focus {
            _ if count == 0 => Focus::Teams,
            Focus::Teams => Focus::Field(0),
            Focus::Field(i) if i + 1 < count => Focus::Field(i + 1),
            Focus::Field(_) => Focus::Submit,
            Focus::Submit => Focus::Reset,
            Focus::Reset => Focus::Teams,
        };
    }

    pub fn focus_prev(&mut self) {
        let count = self.field_count();
        self.focus = match self.focus {
            _ if count == 0 => Focus::Teams,
            Focus::Teams => Focus::Reset,
            Focus::Field(0) => Focus::Teams,
            Focus::Field(i) => Focus::Field(i - 1),
            Focus::Submit => Focus::Field(count - 1),
            Focus::Reset => Focus::Submit,
        };
    }

    /// Value of the focused field, with its question id.
    fn focused_field(&self) -> Option<(String, String, bool)> {
        let Focus::Field(index) = self.focus else {
            return None;
        };
        let field = self.controller.form()?.field(index)?;
        Some((field.question_id.clone(), field.value.clone(), field.kind.is_multi_line()))
    }

    /// Type a character into the focused field.
    pub fn input_char(&mut self, c: char) {
        if let Some((question_id, mut value, _)) = self.focused_field() {
            value.push(c);
            self.dispatch(UiEvent::field(question_id, value));
        }
    }

    /// Enter in a field: new line for multi-line fields, next field otherwise.
    pub fn input_enter(&mut self) {
        match self.focused_field() {
            Some((question_id, mut value, true)) => {
                value.push('\n');
                self.dispatch(UiEvent::field(question_id, value));
            }
            Some(_) => self.focus_next(),
            None => {}
        }
    }

    /// Delete the last character of the focused field.
    pub fn input_backspace(&mut self) {
        if let Some((question_id, mut value, _)) = self.focused_field() {
            if value.pop().is_some() {
                self.dispatch(UiEvent::field(question_id, value));
            }
        }
    }

    /// Clear the focused field.
    pub fn clear_field(&mut self) {
        if let Some((question_id, value, _)) = self.focused_field() {
            if !value.is_empty() {
                self.dispatch(UiEvent::field(question_id, String::new()));
            }
        }
    }

    pub fn submit(&mut self) {
        self.dispatch(UiEvent::Submit);
    }

    pub fn request_reset(&mut self) {
        self.dispatch(UiEvent::Click(Click::Reset));
    }

    /// Resolve the reset confirmation with the highlighted button.
    pub fn resolve_confirmation(&mut self) {
        let click = if self.confirm_selected == 0 { Click::ConfirmReset } else { Click::CancelReset };
        self.dispatch(UiEvent::Click(click));
    }

    pub fn close_modal(&mut self) {
        self.dispatch(UiEvent::Click(Click::CloseModal));
    }

    /// Check the in-flight request and present its result once finished.
    ///
    /// Called on every tick of the event loop.
    pub fn poll_submission(&mut self) {
        let finished = self.in_flight.as_ref().is_some_and(JoinHandle::is_finished);
        if !finished {
            return;
        }
        let Some(handle) = self.in_flight.take() else {
            return;
        };

        match self.runtime.block_on(handle) {
            Ok(completed) => {
                self.controller.complete_submit(completed);
            }
            Err(e) => {
                // The guard was dropped with the task, so the control is already restored.
                error!("Submission task failed: {}", e);
                self.status_message = Some("Submission aborted unexpectedly".to_string());
            }
        }
    }

    /// Save the document from the success dialog into the download directory.
    pub fn download_document(&mut self) {
        let Some(Modal::Success(document)) = self.controller.modal().cloned() else {
            return;
        };

        let api = self.controller.api();
        let url = document.download_url.clone();
        let bytes = self.runtime.block_on(async move { api.download_document(&url).await });

        self.status_message = Some(match bytes {
            Ok(bytes) => match self.save_download(&document.document_name, &bytes) {
                Ok(path) => {
                    info!("Saved {} ({} bytes)", path.display(), bytes.len());
                    format!("Saved to {}", path.display())
                }
                Err(e) => format!("Could not save document: {}", e),
            },
            Err(e) => format!("Download failed: {}", e),
        });
    }

    fn save_download(&self, name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let file_name = std::path::Path::new(name)
            .file_name()
            .map_or_else(|| "document".into(), |n| n.to_os_string());
        std::fs::create_dir_all(&self.download_dir)?;
        let path = self.download_dir.join(file_name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Periodic update from the event loop.
    pub fn tick(&mut self) {
        self.poll_submission();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::App;
    use crate::api::{ApiError, ApiResult, FormApi};
    use crate::core::{Config, GeneratedDocument, QuestionSchema, Submission, Team, WorkflowController};

    /// Backend that is unreachable for teams and accepts every submission.
    pub(crate) struct EchoApi;

    #[async_trait]
    impl FormApi for EchoApi {
        async fn fetch_teams(&self) -> ApiResult<Vec<Team>> {
            Err(ApiError::Connection("offline".into()))
        }

        async fn submit_answers(&self, submission: &Submission) -> ApiResult<GeneratedDocument> {
            Ok(GeneratedDocument {
                document_name: format!("{}_procedure_document.docx", submission.team_id),
                download_url: "https://x/doc.docx".to_string(),
            })
        }

        async fn download_document(&self, _url: &str) -> ApiResult<Vec<u8>> {
            Ok(b"docx".to_vec())
        }
    }

    /// App with the fallback teams loaded.
    pub(crate) fn app(runtime: &tokio::runtime::Runtime) -> App {
        let mut controller =
            WorkflowController::new(Arc::new(QuestionSchema::compliance()), Arc::new(EchoApi));
        runtime.block_on(controller.load_teams());
        App::new(controller, &Config::default(), runtime.handle().clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::test_support::app;
    use super::*;

    fn wait_for_result(app: &mut App) {
        for _ in 0..200 {
            app.tick();
            if !app.is_submitting() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("submission did not finish");
    }

    #[test]
    fn test_team_picker_selects_team() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&runtime);

        app.open_team_picker();
        app.team_picker_down();
        app.team_picker_down();
        app.choose_team();

        assert_eq!(app.selected_team_label(), "Legal");
        assert!(!app.team_picker_open);
        assert_eq!(app.team_picker_index, 2);
        assert_eq!(app.controller.form().map(|f| f.len()), Some(15));
    }

    #[test]
    fn test_focus_cycle() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&runtime);

        app.focus_next();
        assert_eq!(app.focus, Focus::Teams);

        app.dispatch(UiEvent::team("1"));
        app.focus_next();
        assert_eq!(app.focus, Focus::Field(0));
        app.focus_prev();
        assert_eq!(app.focus, Focus::Teams);
        app.focus_prev();
        assert_eq!(app.focus, Focus::Reset);
        app.focus_prev();
        assert_eq!(app.focus, Focus::Submit);
        app.focus_prev();
        assert_eq!(app.focus, Focus::Field(14));
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&runtime);
        app.dispatch(UiEvent::team("1"));
        app.focus = Focus::Field(0);

        for c in "Reviewx".chars() {
            app.input_char(c);
        }
        app.input_backspace();
        app.input_enter();

        let form = app.controller.form().unwrap();
        assert_eq!(form.value("control_name"), Some("Review"));
        assert_eq!(app.focus, Focus::Field(1));

        app.input_char('A');
        app.input_enter();
        app.input_char('B');
        assert_eq!(app.controller.form().unwrap().value("control_owner"), Some("A\nB"));
    }

    #[test]
    fn test_submit_runs_in_background() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&runtime);
        app.dispatch(UiEvent::team("3"));
        app.dispatch(UiEvent::field("control_name", "Badge Audit"));

        app.submit();
        assert!(app.is_submitting());
        assert!(!app.controller.submit_control().enabled);

        wait_for_result(&mut app);
        assert!(app.controller.submit_control().enabled);
        match app.controller.modal() {
            Some(Modal::Success(doc)) => assert_eq!(doc.document_name, "3_procedure_document.docx"),
            other => panic!("expected success dialog, got {:?}", other),
        }
    }

    #[test]
    fn test_reset_confirmation_defaults_to_cancel() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&runtime);
        app.dispatch(UiEvent::team("2"));
        app.dispatch(UiEvent::field("frequency", "Monthly"));

        app.request_reset();
        assert_eq!(app.confirm_selected, 1);
        app.resolve_confirmation();
        assert_eq!(app.controller.form().unwrap().value("frequency"), Some("Monthly"));

        app.request_reset();
        app.confirm_selected = 0;
        app.resolve_confirmation();
        assert_eq!(app.controller.form().unwrap().value("frequency"), Some(""));
    }

    #[test]
    fn test_download_saves_document() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&runtime);
        app.download_dir = dir.path().to_path_buf();

        app.dispatch(UiEvent::team("4"));
        app.dispatch(UiEvent::field("control_name", "Ledger Close"));
        app.submit();
        wait_for_result(&mut app);
        app.download_document();

        let saved = dir.path().join("4_procedure_document.docx");
        assert_eq!(std::fs::read(saved).unwrap(), b"docx");
        assert!(app.status_message.as_deref().unwrap().starts_with("Saved to"));
    }
}
