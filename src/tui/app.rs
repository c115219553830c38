//! Questionnaire session on the real terminal.
//!
//! Owns raw mode and the alternate screen for as long as the form is open.

use std::io::{self, stdout, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, warn};

use super::{draw, handle_events};
use crate::App;

/// How long to wait for a key before checking on an in-flight submission.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Raw mode plus alternate screen, undone on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn start() -> Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        // Leave the questionnaire screen before the panic message prints
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = leave_terminal();
            previous(info);
        }));

        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        debug!("Questionnaire session started");
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = leave_terminal() {
            warn!("Failed to restore terminal: {}", e);
        }
        let _ = self.terminal.show_cursor();
    }
}

fn leave_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)
}

/// Run the interactive questionnaire until the user quits.
///
/// Must not be called from inside the async runtime the app was given.
pub fn run_tui(mut app: App) -> Result<()> {
    let mut session = TerminalSession::start()?;

    while !app.should_quit {
        session.terminal.draw(|frame| draw(frame, &app))?;
        let key = next_key()?;
        step(&mut app, key);
    }

    debug!("Questionnaire session closed");
    Ok(())
}

/// Wait up to one tick for a key press.
fn next_key() -> Result<Option<KeyEvent>> {
    if !event::poll(TICK_RATE)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Apply one key, if any, then collect a finished submission.
fn step(app: &mut App, key: Option<KeyEvent>) {
    if let Some(key) = key {
        handle_events(key, app);
    }
    if !app.should_quit {
        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::app::test_support;
    use crate::core::Modal;
    use crate::UiEvent;

    #[test]
    fn test_ctrl_c_ends_session() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_support::app(&runtime);

        step(&mut app, Some(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(app.should_quit);
    }

    #[test]
    fn test_idle_steps_collect_submission() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_support::app(&runtime);
        app.dispatch(UiEvent::team("2"));
        app.dispatch(UiEvent::field("purpose", "Contract review"));

        step(&mut app, Some(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        for _ in 0..200 {
            if !app.is_submitting() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
            step(&mut app, None);
        }

        assert!(!app.is_submitting());
        assert!(matches!(app.controller.modal(), Some(Modal::Success(_))));
        assert!(!app.should_quit);
    }
}
