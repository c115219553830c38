//! Input handling for the TUI.
//!
//! Processes keyboard events and updates application state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Focus;
use crate::core::Modal;
use crate::App;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.controller.modal() {
        Some(Modal::ConfirmReset) => handle_confirm_mode(key, app),
        Some(Modal::Success(_)) => handle_success_mode(key, app),
        Some(Modal::Notice(_)) => handle_notice_mode(key, app),
        None if app.team_picker_open => handle_team_picker_mode(key, app),
        None => handle_form_mode(key, app),
    }
}

/// Handle input in the reset confirmation dialog.
fn handle_confirm_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        // Navigate between options
        KeyCode::Left | KeyCode::Char('h') => {
            app.confirm_selected = 0;
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.confirm_selected = 1;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.confirm_selected = if app.confirm_selected == 0 { 1 } else { 0 };
        }

        KeyCode::Enter => app.resolve_confirmation(),

        // Quick shortcuts
        KeyCode::Char('y' | 'Y') => {
            app.confirm_selected = 0;
            app.resolve_confirmation();
        }
        KeyCode::Char('n' | 'N') | KeyCode::Esc => {
            app.confirm_selected = 1;
            app.resolve_confirmation();
        }

        _ => {}
    }
}

/// Handle input in the success dialog.
fn handle_success_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('d' | 'D') => app.download_document(),
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => app.close_modal(),
        _ => {}
    }
}

/// Handle input while a notice is shown.
fn handle_notice_mode(key: KeyEvent, app: &mut App) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ' | 'q')) {
        app.close_modal();
    }
}

/// Handle input in the open team dropdown.
fn handle_team_picker_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.team_picker_up(),
        KeyCode::Down | KeyCode::Char('j') => app.team_picker_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_team(),
        KeyCode::Esc => app.close_team_picker(),
        _ => {}
    }
}

/// Handle input on the main screen.
fn handle_form_mode(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Shortcuts that work regardless of focus
    match key.code {
        KeyCode::Char('s') if ctrl => return app.submit(),
        KeyCode::Char('r') if ctrl => return app.request_reset(),
        KeyCode::Tab => return app.focus_next(),
        KeyCode::BackTab => return app.focus_prev(),
        _ => {}
    }

    match app.focus {
        Focus::Field(_) => handle_field_input(key, app),
        Focus::Teams => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => app.open_team_picker(),
            KeyCode::Down => app.focus_next(),
            KeyCode::Up => app.focus_prev(),
            KeyCode::Esc | KeyCode::Char('q') => app.quit(),
            _ => {}
        },
        Focus::Submit | Focus::Reset => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if app.focus == Focus::Submit {
                    app.submit();
                } else {
                    app.request_reset();
                }
            }
            KeyCode::Left | KeyCode::Right => {
                app.focus = if app.focus == Focus::Submit { Focus::Reset } else { Focus::Submit };
            }
            KeyCode::Down => app.focus_next(),
            KeyCode::Up => app.focus_prev(),
            KeyCode::Esc | KeyCode::Char('q') => app.quit(),
            _ => {}
        },
    }
}

/// Handle typing into the focused questionnaire field.
fn handle_field_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_field();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_char(c);
        }
        KeyCode::Enter => app.input_enter(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Down => app.focus_next(),
        KeyCode::Up => app.focus_prev(),
        // Leave the field without quitting
        KeyCode::Esc => app.focus = Focus::Teams,
        _ => {}
    }
}
