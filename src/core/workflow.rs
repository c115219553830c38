//! Questionnaire workflow controller.
//!
//! Owns the session (loaded teams and the selected team), the rendered form,
//! the submit control and whichever modal is open. Front ends feed it
//! [`UiEvent`]s and draw from its state.
//!
//! Submitting is split into three steps so a front end can keep drawing while
//! the request is in flight:
//!
//! 1. [`WorkflowController::begin_submit`] validates, builds the payload and
//!    acquires a [`SubmitGuard`] that disables the submit control.
//! 2. [`PendingSubmit::send`] performs the request.
//! 3. [`WorkflowController::complete_submit`] presents the result and releases
//!    the guard.
//!
//! The guard restores the control when dropped, so the control comes back on
//! every path, including a dropped future or a panic.
//!
//! Switching teams while a submission is in flight is allowed. The in-flight
//! result is still presented when it arrives.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::events::{dispatch, Change, Click, EventHandler, EventSource, UiEvent};
use super::form::Form;
use super::schema::QuestionSchema;
use super::submission::{GeneratedDocument, Submission};
use super::team::{fallback_teams, find_team, team_options, Team, TeamOption, TeamSource};
use crate::api::{ApiError, ApiResult, FormApi};

/// Label of the idle submit control.
pub const SUBMIT_LABEL: &str = "Generate Document";

/// Label of the submit control while a request is in flight.
pub const SUBMIT_BUSY_LABEL: &str = "Generating Document...";

/// Question asked before clearing the form.
pub const RESET_PROMPT: &str =
    "Are you sure you want to reset the form? All entered data will be lost.";

/// State of the submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: String,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self { enabled: true, label: SUBMIT_LABEL.to_string() }
    }
}

/// Holds the submit control disabled for as long as it lives.
#[derive(Debug)]
pub struct SubmitGuard {
    control: Arc<Mutex<SubmitControl>>,
    original_label: String,
}

impl SubmitGuard {
    /// Disable the control. Returns `None` if it is already disabled.
    fn acquire(control: &Arc<Mutex<SubmitControl>>) -> Option<Self> {
        let mut state = control.lock();
        if !state.enabled {
            return None;
        }

        let original_label = std::mem::replace(&mut state.label, SUBMIT_BUSY_LABEL.to_string());
        state.enabled = false;

        Some(Self { control: Arc::clone(control), original_label })
    }
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        let mut state = self.control.lock();
        state.enabled = true;
        state.label = std::mem::take(&mut self.original_label);
    }
}

/// Local validation failures. Nothing is sent when one of these occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a team first.")]
    NoTeamSelected,

    #[error("Please answer at least one question before submitting.")]
    NoAnswers,
}

/// A blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Submit without a selected team
    SelectTeamFirst,
    /// Submit with every field blank
    AnswerAtLeastOne,
    /// The backend rejected the submission with a message
    Rejected(String),
    /// The backend failed without a usable message
    GenerationFailed,
    /// No response from the backend
    ConnectionFailed,
}

impl Notice {
    /// Map a submission failure to what the user sees.
    pub fn from_api_error(error: &ApiError) -> Self {
        if error.is_transport() {
            return Self::ConnectionFailed;
        }
        match error.server_message() {
            Some(message) => Self::Rejected(message.to_string()),
            None => Self::GenerationFailed,
        }
    }

    /// Whether this notice reports a failed request rather than invalid input.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::SelectTeamFirst | Self::AnswerAtLeastOne)
    }
}

impl From<ValidationError> for Notice {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::NoTeamSelected => Self::SelectTeamFirst,
            ValidationError::NoAnswers => Self::AnswerAtLeastOne,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectTeamFirst => write!(f, "{}", ValidationError::NoTeamSelected),
            Self::AnswerAtLeastOne => write!(f, "{}", ValidationError::NoAnswers),
            Self::Rejected(message) => write!(f, "Error: {}", message),
            Self::GenerationFailed => write!(f, "Error: Failed to generate document"),
            Self::ConnectionFailed => write!(f, "Error: Failed to connect to server"),
        }
    }
}

/// Main area of the screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// No team selected
    #[default]
    Welcome,
    /// The questionnaire for the selected team
    Questions {
        /// e.g. "Compliance Questions - Legal"
        title: String,
        /// e.g. "Team: Legal"
        subtitle: String,
    },
}

impl View {
    fn for_team(team: &Team) -> Self {
        Self::Questions {
            title: format!("Compliance Questions - {}", team.name),
            subtitle: format!("Team: {}", team.name),
        }
    }
}

/// Overlay shown above the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Notice(Notice),
    Success(GeneratedDocument),
    ConfirmReset,
}

/// How a submit attempt ended.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The document was generated
    Generated(GeneratedDocument),
    /// Input was invalid; nothing was sent
    Invalid(ValidationError),
    /// A submission is already in flight
    Busy,
    /// The request failed or was rejected
    Failed(ApiError),
}

impl SubmitOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// A validated submission holding the submit control.
#[derive(Debug)]
pub struct PendingSubmit {
    submission: Submission,
    guard: SubmitGuard,
}

impl PendingSubmit {
    /// The payload about to be sent.
    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// Send the submission.
    pub async fn send(self, api: &dyn FormApi) -> CompletedSubmit {
        let result = api.submit_answers(&self.submission).await;
        CompletedSubmit { result, guard: self.guard }
    }
}

/// A finished request, still holding the submit control until presented.
#[derive(Debug)]
pub struct CompletedSubmit {
    result: ApiResult<GeneratedDocument>,
    guard: SubmitGuard,
}

/// Teams and selection for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    teams: Vec<Team>,
    selected_team: Option<Team>,
}

impl SessionState {
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.selected_team.as_ref()
    }
}

/// The questionnaire state machine.
pub struct WorkflowController {
    schema: Arc<QuestionSchema>,
    api: Arc<dyn FormApi>,
    session: SessionState,
    team_source: TeamSource,
    form: Option<Form>,
    view: View,
    modal: Option<Modal>,
    submit_control: Arc<Mutex<SubmitControl>>,
}

impl fmt::Debug for WorkflowController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowController")
            .field("session", &self.session)
            .field("team_source", &self.team_source)
            .field("view", &self.view)
            .field("modal", &self.modal)
            .finish()
    }
}

impl WorkflowController {
    /// Create a controller for a schema and backend.
    pub fn new(schema: Arc<QuestionSchema>, api: Arc<dyn FormApi>) -> Self {
        Self {
            schema,
            api,
            session: SessionState::default(),
            team_source: TeamSource::NotLoaded,
            form: None,
            view: View::Welcome,
            modal: None,
            submit_control: Arc::new(Mutex::new(SubmitControl::default())),
        }
    }

    /// Load teams from the directory, falling back to the fixed set on any failure.
    ///
    /// The fallback is silent: no notice is raised.
    pub async fn load_teams(&mut self) -> TeamSource {
        match self.api.fetch_teams().await {
            Ok(teams) => {
                info!("Loaded {} teams from directory", teams.len());
                self.session.teams = teams;
                self.team_source = TeamSource::Directory;
            }
            Err(e) => {
                warn!("Failed to load teams, using fallback set: {}", e);
                self.session.teams = fallback_teams();
                self.team_source = TeamSource::Fallback;
            }
        }
        self.team_source
    }

    pub fn schema(&self) -> &QuestionSchema {
        &self.schema
    }

    /// Backend handle, for running a [`PendingSubmit`] elsewhere.
    pub fn api(&self) -> Arc<dyn FormApi> {
        Arc::clone(&self.api)
    }

    pub fn teams(&self) -> &[Team] {
        &self.session.teams
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.session.selected_team.as_ref()
    }

    pub fn team_source(&self) -> TeamSource {
        self.team_source
    }

    /// Dropdown entries: placeholder first, then one per team.
    pub fn team_options(&self) -> Vec<TeamOption> {
        team_options(&self.session.teams)
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// The rendered form, if a team is selected.
    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    /// Snapshot of the submit control.
    pub fn submit_control(&self) -> SubmitControl {
        self.submit_control.lock().clone()
    }

    /// Handle a team dropdown change.
    ///
    /// An empty value returns to the welcome view. Any selection, including
    /// re-selecting a team, renders a fresh form and discards prior answers.
    pub fn select_team(&mut self, value: &str) {
        if value.trim().is_empty() {
            debug!("Team selection cleared");
            self.session.selected_team = None;
            self.form = None;
            self.view = View::Welcome;
            return;
        }

        let Some(team) = find_team(&self.session.teams, value).cloned() else {
            debug!("Ignoring selection of unknown team '{}'", value);
            return;
        };

        debug!("Selected team {} ({})", team.name, team.id);
        self.view = View::for_team(&team);
        self.form = Some(Form::generate(&self.schema));
        self.session.selected_team = Some(team);
    }

    /// Set a field value. Returns `false` when no form is shown or the id is unknown.
    pub fn set_field(&mut self, question_id: &str, value: &str) -> bool {
        self.form.as_mut().is_some_and(|form| form.set_value(question_id, value))
    }

    /// Validate the current state and build the payload.
    pub fn prepare_submission(&self) -> Result<Submission, ValidationError> {
        let team = self.session.selected_team.as_ref().ok_or(ValidationError::NoTeamSelected)?;
        let form = self.form.as_ref().ok_or(ValidationError::NoAnswers)?;

        let submission = Submission::from_form(team, form);
        if submission.answers.is_empty() {
            return Err(ValidationError::NoAnswers);
        }
        Ok(submission)
    }

    /// Validate and disable the submit control.
    ///
    /// On a validation error the matching notice is opened and the error is
    /// returned as the outcome.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, SubmitOutcome> {
        if !self.submit_control.lock().enabled {
            debug!("Submit ignored, a submission is already in flight");
            return Err(SubmitOutcome::Busy);
        }

        let submission = match self.prepare_submission() {
            Ok(submission) => submission,
            Err(e) => {
                debug!("Submission blocked: {}", e);
                self.modal = Some(Modal::Notice(e.into()));
                return Err(SubmitOutcome::Invalid(e));
            }
        };

        let guard = SubmitGuard::acquire(&self.submit_control).ok_or(SubmitOutcome::Busy)?;
        info!(
            "Submitting {} answers for team {}",
            submission.answers.len(),
            submission.team_name
        );

        Ok(PendingSubmit { submission, guard })
    }

    /// Present the result of a finished request and release the submit control.
    pub fn complete_submit(&mut self, completed: CompletedSubmit) -> SubmitOutcome {
        let CompletedSubmit { result, guard } = completed;

        let outcome = match result {
            Ok(document) => {
                info!("Generated document {}", document.document_name);
                self.modal = Some(Modal::Success(document.clone()));
                SubmitOutcome::Generated(document)
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                self.modal = Some(Modal::Notice(Notice::from_api_error(&e)));
                SubmitOutcome::Failed(e)
            }
        };

        drop(guard);
        outcome
    }

    /// Validate, send and present a submission in one go.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };

        let api = self.api();
        let completed = pending.send(api.as_ref()).await;
        self.complete_submit(completed)
    }

    /// Open the reset confirmation. No-op without a rendered form.
    pub fn request_reset(&mut self) {
        if self.form.is_some() {
            self.modal = Some(Modal::ConfirmReset);
        }
    }

    /// Clear every field if a reset confirmation is open.
    pub fn confirm_reset(&mut self) {
        if self.modal != Some(Modal::ConfirmReset) {
            return;
        }
        self.modal = None;
        if let Some(form) = self.form.as_mut() {
            debug!("Clearing {} fields", form.len());
            form.clear();
        }
    }

    /// Dismiss a reset confirmation, leaving all values untouched.
    pub fn cancel_reset(&mut self) {
        if self.modal == Some(Modal::ConfirmReset) {
            self.modal = None;
        }
    }

    /// Close the current modal. Closing a reset confirmation cancels it.
    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Apply one event. Returns work to finish when the event was a valid submit.
    pub fn handle_event(&mut self, event: UiEvent) -> Option<PendingSubmit> {
        dispatch(self, event)
    }

    /// Drive the controller from an event source until it closes.
    ///
    /// Submissions are sent inline, one at a time.
    pub async fn run<E: EventSource + ?Sized>(&mut self, events: &mut E) {
        while let Some(event) = events.next_event().await {
            if let Some(pending) = self.handle_event(event) {
                let api = self.api();
                let completed = pending.send(api.as_ref()).await;
                self.complete_submit(completed);
            }
        }
    }
}

impl EventHandler for WorkflowController {
    type Pending = PendingSubmit;

    fn on_change(&mut self, change: Change) {
        match change {
            Change::Team(value) => self.select_team(&value),
            Change::Field { question_id, value } => {
                if !self.set_field(&question_id, &value) {
                    debug!("Ignoring change for unknown field '{}'", question_id);
                }
            }
        }
    }

    fn on_submit(&mut self) -> Option<PendingSubmit> {
        self.begin_submit().ok()
    }

    fn on_click(&mut self, click: Click) {
        match click {
            Click::Reset => self.request_reset(),
            Click::ConfirmReset => self.confirm_reset(),
            Click::CancelReset => self.cancel_reset(),
            Click::CloseModal => self.close_modal(),
        }
    }
}
