//! Placeholder panels for queries without data to show

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use recipebox::query::{QueryState, QueryStatus};

/// Renders the panel for `Idle`, `Loading`, `Empty` and `Error` states
///
/// Returns `false` without drawing for `Success`, so the caller renders data.
/// `context` names what was asked for, e.g. the search term.
pub fn render_status(frame: &mut Frame, area: Rect, state: &QueryState, context: &str) -> bool {
    let lines = match status_lines(state, context) {
        Some(lines) => lines,
        None => return false,
    };

    // Center the message vertically
    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Min(height),
        ])
        .split(area);

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, chunks[1]);
    true
}

/// Message lines for a state, `None` for `Success`
fn status_lines(state: &QueryState, context: &str) -> Option<Vec<Line<'static>>> {
    let lines = match state.status {
        QueryStatus::Success => return None,
        QueryStatus::Idle => vec![Line::from("")],
        QueryStatus::Loading => vec![Line::from(Span::styled(
            format!("Loading {}...", context),
            Style::default().fg(Color::Cyan),
        ))],
        QueryStatus::Empty => vec![
            Line::from(Span::styled(
                "No recipes found",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "We couldn't find any recipes for \"{}\". Try searching for something else!",
                    context
                ),
                Style::default().fg(Color::Gray),
            )),
        ],
        QueryStatus::Error => {
            let message = state
                .error
                .as_ref()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "Unknown error".to_string());
            vec![
                Line::from(Span::styled(
                    "Oops! Something went wrong",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r to try again",
                    Style::default().fg(Color::Yellow),
                )),
            ]
        }
    };
    Some(lines)
}
