//! Workflow integration tests.
//!
//! Drives the controller through scripted UI events against an in-memory backend.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use compliance_form::api::{ApiError, ApiResult, FormApi};
use compliance_form::core::{
    Click, Modal, Notice, ScriptedEvents, View, RESET_PROMPT, SUBMIT_BUSY_LABEL, SUBMIT_LABEL,
};
use compliance_form::{GeneratedDocument, QuestionSchema, Submission, Team, UiEvent, WorkflowController};

/// Backend that records submissions and can hold a request open.
#[derive(Default)]
struct RecordingApi {
    submissions: Mutex<Vec<Submission>>,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl FormApi for RecordingApi {
    async fn fetch_teams(&self) -> ApiResult<Vec<Team>> {
        Ok(vec![Team::new(7, "Treasury"), Team::new("ops", "Ops Center")])
    }

    async fn submit_answers(&self, submission: &Submission) -> ApiResult<GeneratedDocument> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.submissions.lock().push(submission.clone());
        if submission.team_name == "Ops Center" {
            return Err(ApiError::Rejected { status: 422, message: Some("Ops is frozen".into()) });
        }
        Ok(GeneratedDocument {
            document_name: format!("{}_procedure_document.docx", submission.team_id),
            download_url: format!("https://docs.example/{}_procedure_document.docx", submission.team_id),
        })
    }
}

fn controller(api: Arc<RecordingApi>) -> WorkflowController {
    WorkflowController::new(Arc::new(QuestionSchema::compliance()), api)
}

#[tokio::test]
async fn test_scripted_session_generates_document() {
    let api = Arc::new(RecordingApi::default());
    let mut controller = controller(api.clone());
    controller.load_teams().await;

    let mut events = ScriptedEvents::new([
        UiEvent::Submit,
        UiEvent::Click(Click::CloseModal),
        UiEvent::team("7"),
        UiEvent::field("control_name", "Cash Reconciliation"),
        UiEvent::field("approval_signoff", "CFO\nController"),
        UiEvent::Submit,
    ]);
    controller.run(&mut events).await;

    assert_eq!(events.remaining(), 0);
    assert_eq!(
        controller.view(),
        &View::Questions {
            title: "Compliance Questions - Treasury".into(),
            subtitle: "Team: Treasury".into(),
        }
    );

    let submissions = api.submissions.lock();
    assert_eq!(submissions.len(), 1);
    let ids: Vec<_> = submissions[0].answers.ids().collect();
    assert_eq!(ids, vec!["control_name", "approval_signoff"]);

    match controller.modal() {
        Some(Modal::Success(document)) => {
            assert_eq!(document.document_name, "7_procedure_document.docx");
        }
        other => panic!("expected success dialog, got {:?}", other),
    }
}

#[tokio::test]
async fn test_switching_teams_discards_answers() {
    let api = Arc::new(RecordingApi::default());
    let mut controller = controller(api.clone());
    controller.load_teams().await;

    let mut events = ScriptedEvents::new([
        UiEvent::team("7"),
        UiEvent::field("purpose", "Stop fraud"),
        UiEvent::team("ops"),
        UiEvent::Submit,
    ]);
    controller.run(&mut events).await;

    assert!(api.submissions.lock().is_empty());
    assert_eq!(controller.modal(), Some(&Modal::Notice(Notice::AnswerAtLeastOne)));
    assert_eq!(controller.form().unwrap().value("purpose"), Some(""));
}

#[tokio::test]
async fn test_rejection_then_retry_for_other_team() {
    let api = Arc::new(RecordingApi::default());
    let mut controller = controller(api.clone());
    controller.load_teams().await;

    let mut events = ScriptedEvents::new([
        UiEvent::team("ops"),
        UiEvent::field("frequency", "Daily"),
        UiEvent::Submit,
    ]);
    controller.run(&mut events).await;
    assert_eq!(controller.modal(), Some(&Modal::Notice(Notice::Rejected("Ops is frozen".into()))));
    assert_eq!(controller.submit_control().label, SUBMIT_LABEL);

    let mut events = ScriptedEvents::new([
        UiEvent::Click(Click::CloseModal),
        UiEvent::team("7"),
        UiEvent::field("frequency", "Weekly"),
        UiEvent::Submit,
    ]);
    controller.run(&mut events).await;

    assert_eq!(api.submissions.lock().len(), 2);
    assert!(matches!(controller.modal(), Some(Modal::Success(_))));
}

#[tokio::test]
async fn test_reset_flow() {
    let api = Arc::new(RecordingApi::default());
    let mut controller = controller(api);
    controller.load_teams().await;

    let mut events = ScriptedEvents::new([
        UiEvent::team("7"),
        UiEvent::field("tools_systems", "SAP"),
        UiEvent::Click(Click::Reset),
        UiEvent::Click(Click::CancelReset),
    ]);
    controller.run(&mut events).await;
    assert_eq!(controller.form().unwrap().value("tools_systems"), Some("SAP"));
    assert!(controller.modal().is_none());

    let mut events =
        ScriptedEvents::new([UiEvent::Click(Click::Reset), UiEvent::Click(Click::ConfirmReset)]);
    controller.run(&mut events).await;
    assert!(!controller.form().unwrap().has_answers());
    assert_eq!(
        RESET_PROMPT,
        "Are you sure you want to reset the form? All entered data will be lost."
    );
}

#[tokio::test]
async fn test_submit_control_disabled_while_request_in_flight() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(RecordingApi { gate: Some(gate.clone()), ..RecordingApi::default() });
    let mut controller = controller(api.clone());
    controller.load_teams().await;

    controller.handle_event(UiEvent::team("7"));
    controller.handle_event(UiEvent::field("control_name", "Wire Approval"));
    let pending = controller.handle_event(UiEvent::Submit).expect("valid submission");

    let control = controller.submit_control();
    assert!(!control.enabled);
    assert_eq!(control.label, SUBMIT_BUSY_LABEL);

    // A second submit while busy sends nothing
    assert!(controller.handle_event(UiEvent::Submit).is_none());

    let request_api = api.clone();
    let request = tokio::spawn(async move { pending.send(request_api.as_ref()).await });
    tokio::task::yield_now().await;
    assert!(!controller.submit_control().enabled);

    gate.notify_one();
    let completed = request.await.unwrap();
    controller.complete_submit(completed);

    let control = controller.submit_control();
    assert!(control.enabled);
    assert_eq!(control.label, SUBMIT_LABEL);
    assert_eq!(api.submissions.lock().len(), 1);
}
