//! UI rendering for the TUI.
//!
//! Handles layout and widget rendering using ratatui.
//! Supports customizable themes via the Theme struct.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
    Frame,
};

use crate::app::Focus;
use crate::core::{FormField, GeneratedDocument, Modal, Notice, View, RESET_PROMPT};
use crate::tui::Theme;
use crate::App;

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Main vertical layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with team selector
            Constraint::Min(6),    // Welcome or questions
            Constraint::Length(3), // Buttons
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    match app.controller.view() {
        View::Welcome => draw_welcome(frame, app, chunks[1]),
        View::Questions { title, subtitle } => {
            draw_questions(frame, app, chunks[1], title, subtitle);
        }
    }
    draw_buttons(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    // Overlays
    if app.team_picker_open {
        draw_team_picker(frame, app, chunks[0]);
    }
    match app.controller.modal() {
        Some(Modal::Notice(notice)) => draw_notice(frame, app, notice),
        Some(Modal::Success(document)) => draw_success(frame, app, document),
        Some(Modal::ConfirmReset) => draw_reset_confirmation(frame, app),
        None => {}
    }
}

/// Draw the header with the team selector.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Teams;

    let selector_style = if app.controller.selected_team().is_some() {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let line = Line::from(vec![
        Span::styled(" Team: ", Style::default().fg(theme.label)),
        Span::styled(app.selected_team_label(), selector_style),
        Span::styled(" ▾", Style::default().fg(theme.text_muted)),
    ]);

    let border_color = if focused { theme.primary } else { theme.border };
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Compliance Procedure Generator ")
            .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(theme.background)),
    );

    frame.render_widget(header, area);
}

/// Draw the view shown before a team is selected.
fn draw_welcome(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to the Compliance Procedure Generator",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Select your team to answer the compliance questions",
            Style::default().fg(theme.text),
        )),
        Line::from(Span::styled(
            "and generate a procedure document.",
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter on the team selector to begin",
            Style::default().fg(theme.text_muted),
        )),
    ];

    let welcome = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .style(Style::default().bg(theme.background)),
        );

    frame.render_widget(welcome, area);
}

/// Draw the questionnaire, scrolled so the focused field is visible.
fn draw_questions(frame: &mut Frame, app: &App, area: Rect, title: &str, subtitle: &str) {
    let theme = &app.theme;
    let Some(form) = app.controller.form() else {
        return;
    };

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(subtitle.to_string(), Style::default().fg(theme.text_muted))),
        Line::from(""),
    ];

    // Line range of the focused field, for scrolling
    let mut focus_range = (0, 0);

    for (index, field) in form.fields().iter().enumerate() {
        let focused = app.focus == Focus::Field(index);
        let start = lines.len();
        lines.extend(field_lines(field, focused, theme));
        if focused {
            focus_range = (start, lines.len());
        }
        lines.push(Line::from(""));
    }

    let visible = usize::from(area.height.saturating_sub(2));
    let scroll = scroll_offset(focus_range, visible);

    let questions = Paragraph::new(lines).scroll((scroll, 0)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(format!(" {} ", title))
            .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(theme.background)),
    );

    frame.render_widget(questions, area);
}

/// Lines for one field: the numbered label, then the value or its placeholder.
fn field_lines<'a>(field: &'a FormField, focused: bool, theme: &Theme) -> Vec<Line<'a>> {
    let number = format!("{}. ", field.number);
    let mut label = vec![
        Span::styled(number, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
        Span::styled(field.label.as_str(), Style::default().fg(theme.label)),
    ];
    if field.required {
        label.push(Span::styled(" *", Style::default().fg(theme.error)));
    }
    let mut lines = vec![Line::from(label)];

    let box_style = if focused {
        Style::default().fg(theme.text).bg(theme.focus_bg)
    } else {
        Style::default().fg(theme.text)
    };
    let bar = Span::styled("▌ ", Style::default().fg(if focused { theme.primary } else { theme.border }));
    let cursor = if focused { "█" } else { "" };

    if field.value.is_empty() {
        lines.push(Line::from(vec![
            bar,
            Span::styled(cursor, Style::default().fg(theme.primary)),
            Span::styled(
                field.placeholder.as_str(),
                box_style.fg(theme.text_muted).add_modifier(Modifier::ITALIC),
            ),
        ]));
        return lines;
    }

    let value_lines: Vec<&str> = field.value.split('\n').collect();
    let last = value_lines.len() - 1;
    for (i, text) in value_lines.into_iter().enumerate() {
        let mut spans = vec![bar.clone(), Span::styled(text, box_style)];
        if i == last {
            spans.push(Span::styled(cursor, Style::default().fg(theme.primary)));
        }
        lines.push(Line::from(spans));
    }

    lines
}

/// First line to show so the range `[start, end)` fits in `visible` lines.
fn scroll_offset((start, end): (usize, usize), visible: usize) -> u16 {
    if visible == 0 || end <= visible {
        return 0;
    }
    // Keep the label in view for fields taller than the viewport
    let offset = (end - visible).min(start);
    u16::try_from(offset).unwrap_or(u16::MAX)
}

/// Draw the submit and reset buttons.
fn draw_buttons(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let control = app.controller.submit_control();
    let has_form = app.controller.form().is_some();

    let submit_style = if !control.enabled {
        Style::default().fg(theme.text_muted).add_modifier(Modifier::DIM)
    } else if app.focus == Focus::Submit {
        Style::default().fg(theme.background).bg(theme.primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
    };

    let reset_style = if !has_form {
        Style::default().fg(theme.text_muted)
    } else if app.focus == Focus::Reset {
        Style::default().fg(theme.background).bg(theme.warning).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.warning)
    };

    let line = Line::from(vec![
        Span::styled(format!(" [ {} ] ", control.label), submit_style),
        Span::raw("   "),
        Span::styled(" [ Reset Form ] ", reset_style),
    ]);

    let buttons = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.background)),
    );

    frame.render_widget(buttons, area);
}

/// Draw the status bar: team source and status on the left, key hints on the right.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut left_spans = Vec::new();

    let teams = app.controller.teams().len();
    left_spans.push(Span::styled(format!(" {} teams", teams), Style::default().fg(theme.text_muted)));

    if app.controller.team_source() == crate::core::TeamSource::Fallback {
        left_spans.push(Span::styled(" │ ", Style::default().fg(theme.border)));
        left_spans.push(Span::styled(
            "OFFLINE",
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(ref message) = app.status_message {
        left_spans.push(Span::styled(" │ ", Style::default().fg(theme.border)));
        left_spans.push(Span::styled(message.clone(), Style::default().fg(theme.text)));
    }

    let right_text = match app.focus {
        Focus::Field(_) => "Tab next • Ctrl+S submit • Ctrl+U clear • Esc leave",
        _ => "Tab next • Enter select • Ctrl+S submit • Ctrl+R reset • q quit",
    };

    // Padding between left and right
    let left_width = Line::from(left_spans.clone()).width();
    let total_width = area.width as usize;
    let padding = total_width.saturating_sub(left_width + right_text.len() + 1).max(1);

    left_spans.push(Span::raw(" ".repeat(padding)));
    left_spans.push(Span::styled(right_text, Style::default().fg(theme.text_muted)));

    let status = Paragraph::new(Line::from(left_spans)).style(Style::default().bg(theme.background));

    frame.render_widget(status, area);
}

/// Draw the open team dropdown below the header.
fn draw_team_picker(frame: &mut Frame, app: &App, header: Rect) {
    let theme = &app.theme;
    let area = frame.area();
    let options = app.team_options();

    let height = (options.len() as u16 + 2).min(area.height.saturating_sub(header.bottom()));
    let width = 40.min(area.width.saturating_sub(2));
    let popup = Rect::new(header.x + 1, header.bottom().saturating_sub(1), width, height);

    let items: Vec<ListItem> = options
        .iter()
        .map(|option| {
            let style = if option.is_placeholder() {
                Style::default().fg(theme.text_muted)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(Span::styled(format!(" {}", option.label), style)))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.primary))
                .style(Style::default().bg(theme.background)),
        )
        .highlight_style(Style::default().bg(theme.focus_bg).fg(theme.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.team_picker_index));

    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut state);
}

/// Center a dialog of the given size.
fn dialog_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

fn draw_notice(frame: &mut Frame, app: &App, notice: &Notice) {
    let theme = &app.theme;
    let (title, color) =
        if notice.is_error() { (" Error ", theme.error) } else { (" Notice ", theme.warning) };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", notice), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(Span::styled(" Press Enter to close", Style::default().fg(theme.text_muted))),
    ];

    let area = dialog_area(frame.area(), 60, 7);
    let dialog = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title)
            .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(theme.background)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

fn draw_success(frame: &mut Frame, app: &App, document: &GeneratedDocument) {
    let theme = &app.theme;
    let link = document.link();

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Your compliance procedure document is ready.",
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Document: ", Style::default().fg(theme.label)),
            Span::styled(
                link.download_name,
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Link:     ", Style::default().fg(theme.label)),
            Span::styled(link.href, Style::default().fg(theme.primary).add_modifier(Modifier::UNDERLINED)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " d download • Enter close",
            Style::default().fg(theme.text_muted),
        )),
    ];

    let area = dialog_area(frame.area(), 70, 10);
    let dialog = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.success))
            .title(" Document Generated ")
            .title_style(Style::default().fg(theme.success).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(theme.background)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

fn draw_reset_confirmation(frame: &mut Frame, app: &App) {
    let theme = &app.theme;

    let yes_style = if app.confirm_selected == 0 {
        Style::default().fg(theme.background).bg(theme.warning).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let no_style = if app.confirm_selected == 1 {
        Style::default().fg(theme.background).bg(theme.primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", RESET_PROMPT), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(vec![
            Span::raw("   "),
            Span::styled(if app.confirm_selected == 0 { "> " } else { "  " }, yes_style),
            Span::styled("Yes, clear", yes_style),
            Span::raw("     "),
            Span::styled(if app.confirm_selected == 1 { "> " } else { "  " }, no_style),
            Span::styled("No, keep", no_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Use arrow keys to select, Enter to confirm",
            Style::default().fg(theme.text_muted),
        )),
    ];

    let area = dialog_area(frame.area(), 60, 8);
    let dialog = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.warning))
            .title(" Reset Form? ")
            .title_style(Style::default().fg(theme.warning).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(theme.background)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}
