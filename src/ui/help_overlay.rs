//! Key binding overlay, toggled with `?`
//!
//! The bindings are kept in a table so the overlay sizes itself to them.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use recipebox::data::CUISINES;

const KEY_COLUMN: usize = 10;
const OVERLAY_WIDTH: u16 = 54;

/// Sections of (key, action) rows
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Browsing",
        &[
            ("↑ k / ↓ j", "Move selection, scroll a recipe"),
            ("Enter", "Open the selected recipe"),
            ("Tab", "Switch list or recipe tab"),
            ("Esc", "Back to the previous screen"),
            ("h", "Home"),
        ],
    ),
    (
        "Finding recipes",
        &[
            ("/", "Search recipes"),
            ("1-6", "Open a cuisine"),
            ("r", "Reload what is on screen"),
        ],
    ),
    ("", &[("?", "Show or hide this help"), ("q", "Quit")]),
];

/// Draws the overlay centered over whatever is on screen
pub fn render(frame: &mut Frame) {
    let lines = help_lines();
    // Two rows of border
    let height = lines.len() as u16 + 2;
    let area = centered(OVERLAY_WIDTH, height, frame.area());

    let block = Block::default()
        .title(Span::styled(
            " Keys ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" Esc or ? to close ").right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (title, rows) in SECTIONS {
        if !title.is_empty() {
            lines.push(Line::from(Span::styled(
                title.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        lines.extend(rows.iter().map(|(key, action)| binding(key, action)));
        lines.push(Line::from(""));
    }
    // Cuisine keys, three per row: "1 Italian  2 American  3 Thai"
    for (row, names) in CUISINES.chunks(3).enumerate() {
        let entries: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{} {}", row * 3 + i + 1, name))
            .collect();
        lines.push(Line::from(Span::styled(
            format!(" {}", entries.join("  ")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn binding(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {:<width$}", key, width = KEY_COLUMN),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(action.to_string()),
    ])
}

/// A `width` x `height` rect in the middle of `area`, clipped to it
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(render).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_overlay_lists_bindings_and_cuisines() {
        let content = rendered(80, 24);
        assert!(content.contains("Keys"));
        assert!(content.contains("Search recipes"));
        assert!(content.contains("1 Italian"));
        assert!(content.contains("6 African"));
        assert!(content.contains("Esc or ? to close"));
    }

    #[test]
    fn test_overlay_fits_small_terminal() {
        // Must not panic when the terminal is smaller than the overlay
        let content = rendered(30, 10);
        assert!(content.contains("Keys"));
    }

    #[test]
    fn test_centered_is_clipped_to_area() {
        let area = Rect::new(0, 0, 40, 12);
        let rect = centered(OVERLAY_WIDTH, 30, area);
        assert_eq!(rect, Rect::new(0, 0, 40, 12));

        let rect = centered(20, 4, area);
        assert_eq!(rect, Rect::new(10, 4, 20, 4));
    }
}
