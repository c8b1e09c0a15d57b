//! UI rendering module for recipebox
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod recipe_detail;
pub mod recipe_list;
pub mod status;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, InputMode, Screen};
use recipebox::data::CUISINES;

/// Renders the whole screen for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    match &app.screen {
        Screen::Home => recipe_list::render_home(frame, chunks[1], app),
        Screen::Cuisine(name) => {
            recipe_list::render_listing(frame, chunks[1], app, &format!("{} Cuisine", name))
        }
        Screen::Searched(term) => recipe_list::render_listing(
            frame,
            chunks[1],
            app,
            &format!("Results for \"{}\"", term),
        ),
        Screen::Recipe(_) => recipe_detail::render(frame, chunks[1], app),
    }

    render_footer(frame, chunks[2], app);

    if app.show_help {
        help_overlay::render(frame);
    }
}

/// Title, cuisine bar and search prompt
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let current_cuisine = match &app.screen {
        Screen::Cuisine(name) => Some(name.as_str()),
        _ => None,
    };

    let mut spans = vec![
        Span::styled(
            "recipebox",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];
    for (i, cuisine) in CUISINES.iter().enumerate() {
        let style = if current_cuisine.is_some_and(|c| c.eq_ignore_ascii_case(cuisine)) {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("{} {}", i + 1, cuisine), style));
        spans.push(Span::raw("  "));
    }

    let search = match app.input_mode {
        InputMode::Search => Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Yellow)),
            Span::raw(app.search_input.clone()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]),
        InputMode::Normal => Line::from(Span::styled(
            "Press / to search",
            Style::default().fg(Color::DarkGray),
        )),
    };

    frame.render_widget(Paragraph::new(vec![Line::from(spans), search]), area);
}

/// Key hints for the current screen
fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.screen {
        Screen::Home => "↑↓ select  Enter open  Tab switch list  r reload  ? help  q quit",
        Screen::Recipe(_) => "↑↓ scroll  Tab instructions/ingredients  r reload  Esc back  ? help",
        _ => "↑↓ select  Enter open  r reload  Esc back  h home  ? help",
    };
    let paragraph = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ratatui::{backend::TestBackend, Terminal};
    use recipebox::cache::TieredCache;
    use recipebox::cli::{StartScreen, StartupConfig};
    use recipebox::config::PageSizes;
    use recipebox::data::{ErrorInfo, RecipeFetcher, RecipePayload, RecipeSummary};
    use recipebox::query::{LogicalQuery, QueryOrchestrator};
    use std::sync::Arc;

    struct FixedFetcher(Result<RecipePayload, ErrorInfo>);

    #[async_trait]
    impl RecipeFetcher for FixedFetcher {
        async fn fetch(&self, _query: &LogicalQuery) -> Result<RecipePayload, ErrorInfo> {
            self.0.clone()
        }
    }

    fn app_with(outcome: Result<RecipePayload, ErrorInfo>, start: StartScreen) -> App {
        let orchestrator = QueryOrchestrator::new(
            Arc::new(TieredCache::in_memory()),
            Arc::new(FixedFetcher(outcome)),
        );
        App::new(
            &orchestrator,
            PageSizes::default(),
            StartupConfig {
                start_screen: start,
            },
        )
    }

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_home_renders_loaded_lists() {
        let app = app_with(
            Ok(RecipePayload::List(vec![RecipeSummary {
                id: 1,
                title: "Garlic Noodles".to_string(),
                image: None,
            }])),
            StartScreen::Home,
        );
        app.popular.settled().await;
        app.vegetarian.settled().await;

        let content = draw(&app);
        assert!(content.contains("Popular"));
        assert!(content.contains("Vegetarian Picks"));
        assert!(content.contains("Garlic Noodles"));
        assert!(content.contains("Italian"));
    }

    #[tokio::test]
    async fn test_search_screen_renders_empty_message() {
        let app = app_with(
            Ok(RecipePayload::List(vec![])),
            StartScreen::Search("zzzznotreal".to_string()),
        );
        app.listing.settled().await;

        let content = draw(&app);
        assert!(content.contains("No recipes found"));
    }

    #[tokio::test]
    async fn test_recipe_screen_renders_error_with_retry_hint() {
        let app = app_with(Err(ErrorInfo::http_status(404)), StartScreen::Recipe(12345));
        app.detail.settled().await;

        let content = draw(&app);
        assert!(content.contains("Something went wrong"));
        assert!(content.contains("Press r to try again"));
    }

    #[tokio::test]
    async fn test_loading_state_renders_before_fetch_completes() {
        let app = app_with(Ok(RecipePayload::List(vec![])), StartScreen::Home);

        let content = draw(&app);
        assert!(content.contains("Loading popular recipes"));
    }
}
