use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::app::App;
use crate::core::chat_stream::error_headline;
use crate::core::constants::APP_NAME;
use crate::core::status::ModelStatus;

const MAX_INPUT_ROWS: u16 = 6;
/// Gap between the pulse symbol and the input box's right corner.
const PULSE_MARGIN: &str = "   ";

/// Fixed regions of one frame.
pub struct FrameLayout {
    pub title: Rect,
    pub transcript: Rect,
    pub notice: Option<Rect>,
    pub input: Rect,
}

pub fn input_rows(app: &App) -> u16 {
    let rows = u16::try_from(app.input.lines().len()).unwrap_or(MAX_INPUT_ROWS);
    rows.clamp(1, MAX_INPUT_ROWS)
}

pub fn notice_text(app: &App) -> Option<String> {
    app.notice.clone()
}

pub fn compute_layout(area: Rect, app: &App) -> FrameLayout {
    let notice_rows = notice_text(app)
        .map(|text| u16::try_from(text.lines().count()).unwrap_or(1).max(1))
        .unwrap_or(0);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(notice_rows),
            Constraint::Length(input_rows(app) + 2), // +2 for borders
        ])
        .split(area);

    FrameLayout {
        title: chunks[0],
        transcript: chunks[1],
        notice: (notice_rows > 0).then_some(chunks[2]),
        input: chunks[3],
    }
}

fn title_line(app: &App) -> Line<'static> {
    let status_style = match app.status {
        ModelStatus::Idle => Style::default().fg(Color::Green),
        ModelStatus::Thinking | ModelStatus::Streaming => Style::default().fg(Color::Yellow),
        ModelStatus::Error => Style::default().fg(Color::Red),
    };
    let dim = Style::default().fg(Color::DarkGray);
    let search = if app.session.settings.search {
        "on"
    } else {
        "off"
    };

    Line::from(vec![
        Span::styled(
            format!("{APP_NAME} v{}", env!("CARGO_PKG_VERSION")),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" • ", dim),
        Span::raw(app.session.model.clone()),
        Span::styled(" • ", dim),
        Span::styled(app.status.label(), status_style),
        Span::styled(format!(" • search: {search}"), dim),
        Span::styled(
            format!(" • log: {}", app.logging.get_status_string()),
            dim,
        ),
    ])
}

/// Pulsing symbol shown in the input border while a reply is pending.
pub fn pulse_symbol(app: &App) -> &'static str {
    let elapsed = app.pulse_start.elapsed().as_millis() as f32 / 1000.0;
    let phase = (elapsed * 2.0) % 2.0;
    let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
    if intensity < 0.33 {
        "○"
    } else if intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

fn input_title(app: &App) -> String {
    match app.status {
        ModelStatus::Thinking | ModelStatus::Streaming => {
            format!("Gemini is {}… (Ctrl+C to quit)", app.status.label())
        }
        ModelStatus::Error => match &app.last_error {
            Some(detail) => format!("{} (Ctrl+L to dismiss)", error_headline(detail)),
            None => "Send failed; type to try again (Enter to send, /help for help)".to_string(),
        },
        ModelStatus::Idle => {
            "Type your message (Enter to send, Shift+Enter for new line, /help for help)"
                .to_string()
        }
    }
}

pub fn ui(f: &mut Frame, app: &App) {
    let layout = compute_layout(f.area(), app);

    f.render_widget(Paragraph::new(title_line(app)), layout.title);

    let lines = app.build_display_lines(layout.transcript.width);
    let rows = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_offset = rows.saturating_sub(layout.transcript.height);
    let scroll_offset = app.scroll_offset.min(max_offset);
    let transcript = Paragraph::new(lines).scroll((scroll_offset, 0));
    f.render_widget(transcript, layout.transcript);

    if let (Some(area), Some(text)) = (layout.notice, notice_text(app)) {
        let notice = Paragraph::new(text)
            .style(Style::default().fg(Color::Yellow))
            .wrap(Wrap { trim: false });
        f.render_widget(notice, area);
    }

    let busy = app.status.is_busy();
    let title_style = if app.status == ModelStatus::Error {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Reset))
        .title(Span::styled(input_title(app), title_style));
    if busy {
        let indicator = format!("{}{PULSE_MARGIN}", pulse_symbol(app));
        block = block.title_bottom(Line::from(indicator).right_aligned());
    }
    let inner = block.inner(layout.input);
    f.render_widget(block, layout.input);

    if busy {
        let pending = Paragraph::new(app.input_text())
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false });
        f.render_widget(pending, inner);
    } else {
        f.render_widget(&app.input, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat_stream::StreamMessage;
    use crate::utils::test_utils::{create_test_app, start_test_stream};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| ui(f, app)).expect("draw");
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn title_shows_model_and_status() {
        let app = create_test_app();
        let screen = render(&app);
        let first_line = screen.lines().next().unwrap_or_default();
        assert!(first_line.contains("test-model"));
        assert!(first_line.contains("idle"));
        assert!(first_line.contains("log: disabled"));
    }

    #[test]
    fn busy_input_shows_status_title() {
        let mut app = create_test_app();
        let id = start_test_stream(&mut app, "hello");
        let screen = render(&app);
        assert!(screen.contains("Gemini is thinking"));
        assert!(["○", "◐", "●"].iter().any(|pulse| screen.contains(pulse)));

        app.handle_stream_message(StreamMessage::End, id);
        assert!(render(&app).contains("Type your message"));
    }

    #[test]
    fn error_headline_appears_in_input_title() {
        let mut app = create_test_app();
        let id = start_test_stream(&mut app, "hello");
        app.handle_stream_message(StreamMessage::Error("API Error: quota\n```\n{}\n```".into()), id);
        assert!(render(&app).contains("API Error: quota (Ctrl+L to dismiss)"));

        app.dismiss_notices();
        assert!(render(&app).contains("Send failed; type to try again"));
    }

    #[test]
    fn notice_gets_its_own_row() {
        let mut app = create_test_app();
        let area = Rect::new(0, 0, 80, 20);
        assert!(compute_layout(area, &app).notice.is_none());

        app.set_notice("Conversation cleared.");
        let layout = compute_layout(area, &app);
        assert_eq!(layout.notice.map(|r| r.height), Some(1));
        assert!(render(&app).contains("Conversation cleared."));
    }

    #[test]
    fn auto_scroll_reaches_end_of_word_wrapped_reply() {
        let mut app = create_test_app();
        let id = start_test_stream(&mut app, "hello");
        let word = "w".repeat(41);
        let row = format!("{word} {word} {word}\n");
        app.handle_stream_message(
            StreamMessage::Chunk(format!("{}FINAL-MARKER", row.repeat(20))),
            id,
        );
        app.handle_stream_message(StreamMessage::End, id);

        let layout = compute_layout(Rect::new(0, 0, 80, 20), &app);
        app.update_scroll_position(layout.transcript.height, layout.transcript.width);
        assert!(render(&app).contains("FINAL-MARKER"));
    }

    #[test]
    fn input_rows_are_capped() {
        let mut app = create_test_app();
        assert_eq!(input_rows(&app), 1);
        app.set_input(&"line\n".repeat(20));
        assert_eq!(input_rows(&app), MAX_INPUT_ROWS);
    }
}
