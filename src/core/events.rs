//! UI events, independent of any particular rendering surface.
//!
//! A front end turns its own input (key presses, clicks) into [`UiEvent`]s.
//! Handlers implement [`EventHandler`], which has one entry point per
//! capability: change, submit and click.

use std::collections::VecDeque;

use async_trait::async_trait;

/// A value changed in one of the inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// The team dropdown changed; empty string is the placeholder
    Team(String),
    /// A questionnaire field changed
    Field { question_id: String, value: String },
}

/// A clickable control was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    /// The reset button
    Reset,
    /// "Yes" in the reset confirmation
    ConfirmReset,
    /// "No" in the reset confirmation
    CancelReset,
    /// Close button of the current modal
    CloseModal,
}

/// Any event the workflow reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Change(Change),
    Submit,
    Click(Click),
}

impl UiEvent {
    /// Shorthand for a team dropdown change.
    pub fn team(value: impl Into<String>) -> Self {
        Self::Change(Change::Team(value.into()))
    }

    /// Shorthand for a field change.
    pub fn field(question_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Change(Change::Field { question_id: question_id.into(), value: value.into() })
    }
}

/// Receives events from a front end.
pub trait EventHandler {
    /// Work produced by a submit that must be finished asynchronously.
    type Pending;

    fn on_change(&mut self, change: Change);

    fn on_submit(&mut self) -> Option<Self::Pending>;

    fn on_click(&mut self, click: Click);
}

/// Route an event to the matching handler capability.
pub fn dispatch<H: EventHandler>(handler: &mut H, event: UiEvent) -> Option<H::Pending> {
    match event {
        UiEvent::Change(change) => {
            handler.on_change(change);
            None
        }
        UiEvent::Submit => handler.on_submit(),
        UiEvent::Click(click) => {
            handler.on_click(click);
            None
        }
    }
}

/// A source of UI events.
#[async_trait]
pub trait EventSource: Send {
    /// Wait for the next event; `None` when the source is closed.
    async fn next_event(&mut self) -> Option<UiEvent>;
}

/// Replays a fixed list of events. Used for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    events: VecDeque<UiEvent>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = UiEvent>) -> Self {
        Self { events: events.into_iter().collect() }
    }

    /// Events not yet delivered.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

#[async_trait]
impl EventSource for ScriptedEvents {
    async fn next_event(&mut self) -> Option<UiEvent> {
        self.events.pop_front()
    }
}
