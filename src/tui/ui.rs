//! UI rendering for the advisor TUI

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::App;

const QUESTION: &str = "Please enter your primary concern or area of focus for code review:";
const PLACEHOLDER: &str = "e.g., 'Improving code security'";

/// Main draw function - orchestrates all rendering
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Length(2), // Question
        Constraint::Length(3), // Input
        Constraint::Length(1), // Button
        Constraint::Min(5),    // Advice
        Constraint::Length(1), // Footer
    ])
    .split(area);

    draw_header(frame, app, layout[0]);
    frame.render_widget(
        Paragraph::new(format!(" {}", QUESTION)).style(Style::default().bold()),
        layout[1],
    );
    draw_input(frame, app, layout[2]);
    draw_button(frame, app, layout[3]);
    draw_advice(frame, app, layout[4]);
    draw_footer(frame, app, layout[5]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let header_text = format!(
        " Manifesto Advisor │ {} decision rules │ model: {}",
        app.rule_count, app.model_name
    );
    let header =
        Paragraph::new(header_text).style(Style::default().bg(Color::Blue).fg(Color::White).bold());
    frame.render_widget(header, area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.model.input.chars().count();
    let max = app.model.max_concern_chars;
    let count_style = if count > max {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Concern ")
        .title_bottom(Line::styled(format!(" {}/{} ", count, max), count_style).right_aligned())
        .border_style(Style::default().fg(Color::Cyan));

    let inner_width = area.width.saturating_sub(2) as usize;
    let (text, style) = if app.model.input.is_empty() {
        (PLACEHOLDER.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (visible_tail(&app.model.input, inner_width.saturating_sub(1)), Style::default())
    };

    frame.render_widget(Paragraph::new(text).style(style).block(block), area);

    let typed = if app.model.input.is_empty() {
        0
    } else {
        visible_tail(&app.model.input, inner_width.saturating_sub(1))
            .chars()
            .count()
    };
    frame.set_cursor_position((area.x + 1 + typed as u16, area.y + 1));
}

fn draw_button(frame: &mut Frame, app: &App, area: Rect) {
    // Disabled while a request is in flight
    let style = if app.model.is_submitting() {
        Style::default().fg(Color::DarkGray).bg(Color::Black)
    } else {
        Style::default().fg(Color::Black).bg(Color::Green).bold()
    };

    let mut spans = vec![Span::raw(" "), Span::styled(" [ Get Advice ] ", style)];
    if let Some(secs) = app.elapsed_secs() {
        spans.push(Span::styled(
            format!("  waiting {}s (Enter or Esc to cancel)", secs),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_advice(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Advice ");
    let style = if app.model.is_submitting() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let advice = Paragraph::new(app.model.advice.as_str())
        .style(style)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.model.advice_scroll, 0));
    frame.render_widget(advice, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let keybinds = if app.model.is_submitting() {
        "Enter/Esc:cancel  ↑/↓:scroll  Ctrl+C:quit"
    } else {
        "Enter:get advice  Ctrl+U:clear  ↑/↓:scroll  Esc:quit"
    };
    let footer = Paragraph::new(format!(" {}", keybinds))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(footer, area);
}

/// Last `width` characters of `text`, so the end of a long concern stays visible
fn visible_tail(text: &str, width: usize) -> String {
    let len = text.chars().count();
    text.chars().skip(len.saturating_sub(width)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionClient, Result as CompletionResult};
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    struct NoClient;

    impl CompletionClient for NoClient {
        fn complete(&self, _prompt: &str) -> CompletionResult<String> {
            Ok(String::new())
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_question_placeholder_and_rule_count() {
        let app = App::new(Arc::new(NoClient), 7, "gemini-pro", 500);
        let screen = render(&app);
        assert!(screen.contains("Please enter your primary concern"));
        assert!(screen.contains("Improving code security"));
        assert!(screen.contains("7 decision rules"));
        assert!(screen.contains("Get Advice"));
        assert!(screen.contains("0/500"));
    }

    #[test]
    fn renders_advice_text() {
        let mut app = App::new(Arc::new(NoClient), 0, "gemini-pro", 500);
        app.model.advice = "Please enter a concern.".to_string();
        assert!(render(&app).contains("Please enter a concern."));
    }

    #[test]
    fn tail_of_long_input() {
        assert_eq!(visible_tail("abcdef", 3), "def");
        assert_eq!(visible_tail("ab", 3), "ab");
        assert_eq!(visible_tail("ééé", 2), "éé");
    }
}
