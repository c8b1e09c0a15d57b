//! Recipe detail screen UI
//!
//! Renders a single recipe: title, timing and servings, and a tabbed body
//! with the summary and instructions or the ingredient list.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::status::render_status;
use crate::app::{App, DetailTab};
use recipebox::data::RecipeDetail;

/// Renders the recipe detail screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `area` - Area below the header
/// * `app` - The application state
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.detail.state();
    let context = app
        .detail
        .query()
        .map(|q| q.describe())
        .unwrap_or_default();

    let Some(detail) = app.current_detail() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_status(frame, inner, &state, &context);
        return;
    };

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", detail.title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(stats_line(&detail)), chunks[0]);
    frame.render_widget(Paragraph::new(tab_line(app.detail_tab)), chunks[1]);

    let body = match app.detail_tab {
        DetailTab::Instructions => instruction_lines(&detail),
        DetailTab::Ingredients => ingredient_lines(&detail),
    };
    let paragraph = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    frame.render_widget(paragraph, chunks[2]);
}

/// "45 mins · 2 servings", omitting what the API didn't provide
fn stats_line(detail: &RecipeDetail) -> Line<'static> {
    let mut parts = Vec::new();
    if let Some(minutes) = detail.ready_in_minutes {
        parts.push(format!("{} mins", minutes));
    }
    if let Some(servings) = detail.servings {
        parts.push(format!("{} servings", servings));
    }
    Line::from(Span::styled(
        parts.join(" · "),
        Style::default().fg(Color::Gray),
    ))
}

fn tab_line(active: DetailTab) -> Line<'static> {
    let style_for = |tab: DetailTab| {
        if tab == active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    Line::from(vec![
        Span::styled("Instructions", style_for(DetailTab::Instructions)),
        Span::raw("   "),
        Span::styled("Ingredients", style_for(DetailTab::Ingredients)),
    ])
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn instruction_lines(detail: &RecipeDetail) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(summary) = detail.summary.as_deref() {
        lines.push(section_title("About this recipe"));
        lines.extend(html_to_text(summary).lines().map(|l| Line::from(l.to_string())));
        lines.push(Line::from(""));
    }
    if let Some(instructions) = detail.instructions.as_deref() {
        lines.push(section_title("How to make it"));
        lines.extend(
            html_to_text(instructions)
                .lines()
                .map(|l| Line::from(l.to_string())),
        );
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No instructions available",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn ingredient_lines(detail: &RecipeDetail) -> Vec<Line<'static>> {
    let mut lines = vec![section_title("What you'll need")];
    if detail.extended_ingredients.is_empty() {
        lines.push(Line::from(Span::styled(
            "No ingredients listed",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.extend(detail.extended_ingredients.iter().map(|ingredient| {
        Line::from(vec![
            Span::styled("• ", Style::default().fg(Color::Yellow)),
            Span::raw(ingredient.original.clone()),
        ])
    }));
    lines
}

/// Converts the API's HTML fragments to plain text
///
/// Block-level closing tags and `<br>` become line breaks, other tags are
/// dropped, and the common character entities are decoded.
pub fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            // Unterminated tag, keep it as text
            text.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let tag = rest[start + 1..start + end]
            .trim()
            .trim_end_matches('/')
            .to_ascii_lowercase();
        let name = tag.split_whitespace().next().unwrap_or("");
        if matches!(name, "br" | "/p" | "/li" | "/ol" | "/ul" | "/div") {
            text.push('\n');
        }
        rest = &rest[start + end + 1..];
    }
    text.push_str(rest);

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_strips_inline_tags() {
        assert_eq!(
            html_to_text("A <b>tasty</b> <a href=\"x\">dish</a>"),
            "A tasty dish"
        );
    }

    #[test]
    fn test_html_to_text_breaks_lines_on_list_items() {
        let html = "<ol><li>Boil water.</li><li>Add pasta.</li></ol>";
        assert_eq!(html_to_text(html), "Boil water.\nAdd pasta.");
    }

    #[test]
    fn test_html_to_text_handles_br_variants() {
        assert_eq!(html_to_text("one<br>two<br/>three<BR />four"), "one\ntwo\nthree\nfour");
    }

    #[test]
    fn test_html_to_text_decodes_entities() {
        assert_eq!(html_to_text("Salt &amp; pepper &lt;3"), "Salt & pepper <3");
    }

    #[test]
    fn test_html_to_text_keeps_unterminated_tag() {
        assert_eq!(html_to_text("5 < 6"), "5 < 6");
    }

    #[test]
    fn test_stats_line_skips_missing_fields() {
        let detail: RecipeDetail =
            serde_json::from_str(r#"{"id": 1, "title": "Toast", "servings": 2}"#).unwrap();
        let line = stats_line(&detail);
        assert_eq!(line.spans[0].content, "2 servings");
    }

    #[test]
    fn test_ingredient_lines_list_each_ingredient() {
        let detail: RecipeDetail = serde_json::from_str(
            r#"{"id": 1, "title": "Toast", "extendedIngredients": [
                {"id": 1, "original": "2 slices bread"},
                {"id": 2, "original": "butter"}
            ]}"#,
        )
        .unwrap();
        let lines = ingredient_lines(&detail);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].spans[1].content, "butter");
    }
}
