//! Recipe list screens
//!
//! Renders the home screen (popular and vegetarian lists side by side) and
//! the single-list screens for a cuisine or a search.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::status::render_status;
use crate::app::{list_items, App, HomeSection};
use recipebox::query::QuerySubscription;

/// Renders the home screen with both lists
pub fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let popular_focused = app.focus == HomeSection::Popular;
    render_pane(
        frame,
        columns[0],
        " Popular ",
        &app.popular,
        popular_focused.then_some(app.selected_index),
    );
    render_pane(
        frame,
        columns[1],
        " Vegetarian Picks ",
        &app.vegetarian,
        (!popular_focused).then_some(app.selected_index),
    );
}

/// Renders a cuisine or search result list
pub fn render_listing(frame: &mut Frame, area: Rect, app: &App, title: &str) {
    render_pane(
        frame,
        area,
        &format!(" {} ", title),
        &app.listing,
        Some(app.selected_index),
    );
}

/// Renders one bordered list; `selected` is set when the pane has focus
fn render_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    subscription: &QuerySubscription,
    selected: Option<usize>,
) {
    let border_color = if selected.is_some() {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .title(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let state = subscription.state();
    let context = subscription
        .query()
        .map(|q| q.describe())
        .unwrap_or_default();
    if render_status(frame, inner, &state, &context) {
        return;
    }

    let items = list_items(&state);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    // Keep the selection visible in short panes
    let visible = chunks[0].height as usize;
    let offset = match selected {
        Some(index) if visible > 0 && index >= visible => index + 1 - visible,
        _ => 0,
    };

    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, recipe)| recipe_line(&recipe.title, selected == Some(i)))
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let count = Paragraph::new(format!("{} recipes found", items.len()))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(count, chunks[1]);
}

/// A list row with a cursor marker when selected
fn recipe_line(title: &str, is_selected: bool) -> Line<'static> {
    if is_selected {
        Line::from(vec![
            Span::styled("▶ ", Style::default().fg(Color::Yellow)),
            Span::styled(
                title.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(vec![Span::raw("  "), Span::raw(title.to_string())])
    }
}
