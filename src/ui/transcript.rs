//! Turns the conversation into styled lines for the transcript pane.

use std::collections::VecDeque;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use crate::core::message::{Message, Role, Source};
use crate::core::status::ModelStatus;
use crate::ui::markdown::{segments, Segment};
use crate::utils::syntax::highlight_code_block;

pub const MODEL_LABEL: &str = "Gemini";
const USER_LABEL: &str = "You";
const DEFAULT_CODE_LABEL: &str = "text";
const CODE_BG: Color = Color::Rgb(0x2b, 0x30, 0x3b);
const THINKING_TEXT: &str = "Gemini is thinking…";

fn label_style(role: Role) -> Style {
    let color = match role {
        Role::User => Color::Cyan,
        Role::Model => Color::Magenta,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn body_style(message: &Message) -> Style {
    if message.is_error {
        Style::default().fg(Color::Red)
    } else if message.is_user() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn header_line(message: &Message) -> Line<'static> {
    let label = match message.role {
        Role::User => USER_LABEL,
        Role::Model => MODEL_LABEL,
    };
    Line::from(vec![
        Span::styled(label, label_style(message.role)),
        Span::styled(
            format!(" · {}", message.timestamp.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn push_prose(lines: &mut Vec<Line<'static>>, prose: &str, style: Style) {
    for line in prose.lines() {
        if line.trim().is_empty() {
            lines.push(Line::from(""));
        } else {
            lines.push(Line::from(Span::styled(line.replace('\t', "    "), style)));
        }
    }
}

fn plain_code_lines(code: &str) -> Vec<Line<'static>> {
    let style = Style::default().fg(Color::Gray).bg(CODE_BG);
    code.lines()
        .map(|line| Line::from(Span::styled(line.replace('\t', "    "), style)))
        .collect()
}

fn push_code_block(
    lines: &mut Vec<Line<'static>>,
    language: Option<&str>,
    code: &str,
    syntax_enabled: bool,
) {
    let frame = Style::default().fg(Color::DarkGray);
    let label = language.unwrap_or(DEFAULT_CODE_LABEL);
    lines.push(Line::from(vec![
        Span::styled("┌─ ", frame),
        Span::styled(
            label.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ),
    ]));

    let body = if syntax_enabled {
        highlight_code_block(language.unwrap_or(""), code, Some(CODE_BG))
            .unwrap_or_else(|| plain_code_lines(code))
    } else {
        plain_code_lines(code)
    };
    for mut line in body {
        line.spans.insert(0, Span::styled("│ ", frame));
        lines.push(line);
    }

    lines.push(Line::from(Span::styled("└─", frame)));
}

fn push_sources(lines: &mut Vec<Line<'static>>, sources: &[Source]) {
    if sources.is_empty() {
        return;
    }
    lines.push(Line::from(Span::styled(
        "Sources:",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )));
    for (index, source) in sources.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}. {} ", index + 1, source.title),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                source.uri.clone(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }
}

/// Lines for one message: header, body and sources, followed by a blank line.
///
/// A model message with no text yet renders as nothing; the thinking
/// indicator stands in for it.
pub fn message_lines(message: &Message, syntax_enabled: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if message.is_model() && message.text.is_empty() && !message.is_error {
        return lines;
    }

    lines.push(header_line(message));
    let style = body_style(message);

    if message.is_error {
        push_prose(&mut lines, &message.text, style);
    } else {
        for segment in segments(&message.text) {
            match segment {
                Segment::Prose(prose) => push_prose(&mut lines, prose, style),
                Segment::Code { language, code } => {
                    push_code_block(&mut lines, language.as_deref(), &code, syntax_enabled)
                }
            }
        }
    }

    push_sources(&mut lines, &message.sources);
    lines.push(Line::from(""));
    lines
}

/// Transcript lines for every message, word-wrapped to `width` columns so
/// each returned line occupies exactly one screen row.
pub fn build_display_lines(
    messages: &VecDeque<Message>,
    status: ModelStatus,
    syntax_enabled: bool,
    width: u16,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in messages {
        lines.extend(message_lines(message, syntax_enabled));
    }

    if status == ModelStatus::Thinking {
        lines.push(Line::from(Span::styled(
            THINKING_TEXT,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    prewrap_lines(lines, width)
}

#[derive(Default)]
struct Row {
    spans: Vec<Span<'static>>,
    used: usize,
}

impl Row {
    fn push(&mut self, ch: char, ch_width: usize, style: Style) {
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push(ch),
            _ => self.spans.push(Span::styled(ch.to_string(), style)),
        }
        self.used += ch_width;
    }

    fn finish(&mut self, line_style: Style, out: &mut Vec<Line<'static>>) {
        out.push(Line::from(std::mem::take(&mut self.spans)).style(line_style));
        self.used = 0;
    }
}

fn wrap_line(line: &Line<'static>, width: usize, out: &mut Vec<Line<'static>>) {
    let cells: Vec<(char, usize, Style)> = line
        .spans
        .iter()
        .flat_map(|span| {
            span.content
                .chars()
                .map(move |ch| (ch, UnicodeWidthChar::width(ch).unwrap_or(0), span.style))
        })
        .collect();

    let mut row = Row::default();
    let mut emitted = false;
    let mut rest = cells.as_slice();
    while let Some(&(ch, _, style)) = rest.first() {
        if ch == ' ' {
            // A space that would overflow ends the row and is dropped.
            if row.used < width {
                row.push(ch, 1, style);
            } else {
                row.finish(line.style, out);
                emitted = true;
            }
            rest = &rest[1..];
            continue;
        }

        let word_len = rest
            .iter()
            .position(|(c, _, _)| *c == ' ')
            .unwrap_or(rest.len());
        let (word, tail) = rest.split_at(word_len);
        let word_width: usize = word.iter().map(|(_, w, _)| w).sum();
        if row.used > 0 && row.used + word_width > width {
            row.finish(line.style, out);
            emitted = true;
        }
        for &(ch, ch_width, style) in word {
            if row.used > 0 && row.used + ch_width > width {
                row.finish(line.style, out);
                emitted = true;
            }
            row.push(ch, ch_width, style);
        }
        rest = tail;
    }

    if !row.spans.is_empty() || !emitted {
        row.finish(line.style, out);
    }
}

/// Word-wrap styled lines at `width` columns, breaking words longer than a
/// row. The result is rendered without `Wrap`, so the row count used for
/// scrolling is `lines.len()`.
pub fn prewrap_lines(lines: Vec<Line<'static>>, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width);
    if width == 0 {
        return lines;
    }
    let mut out = Vec::with_capacity(lines.len());
    for line in &lines {
        wrap_line(line, width, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::CONNECTION_ERROR_TEXT;
    use crate::core::message::MessageId;
    use crate::utils::test_utils::SAMPLE_RUST_REPLY;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn user_message_has_header_and_body() {
        let message = Message::user(MessageId::new(1), "What is a trait?");
        let lines = message_lines(&message, false);
        let rendered = texts(&lines);

        assert!(rendered[0].starts_with("You · "));
        assert_eq!(rendered[0].len(), "You · HH:MM".len());
        assert_eq!(rendered[1], "What is a trait?");
        assert_eq!(rendered.last().map(String::as_str), Some(""));
    }

    #[test]
    fn code_blocks_are_framed_with_language_label() {
        let message = Message::model(MessageId::new(2), SAMPLE_RUST_REPLY);
        let rendered = texts(&message_lines(&message, false));

        assert!(rendered[0].starts_with("Gemini · "));
        assert!(rendered.contains(&"┌─ rust".to_string()));
        assert!(rendered.contains(&"│ let total: i32 = xs.iter().sum();".to_string()));
        assert!(rendered.contains(&"└─".to_string()));
        assert!(rendered.contains(&"That avoids the manual loop.".to_string()));
    }

    #[test]
    fn unlabeled_code_defaults_to_text() {
        let message = Message::model(MessageId::new(2), "```\nplain\n```");
        let rendered = texts(&message_lines(&message, true));
        assert_eq!(rendered[1], "┌─ text");
        assert_eq!(rendered[2], "│ plain");
    }

    #[test]
    fn error_messages_are_red() {
        let mut message = Message::model(MessageId::new(3), CONNECTION_ERROR_TEXT);
        message.is_error = true;
        let lines = message_lines(&message, false);
        let body = &lines[1];
        assert_eq!(body.to_string(), CONNECTION_ERROR_TEXT);
        assert_eq!(body.spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn sources_follow_the_body() {
        let mut message = Message::model(MessageId::new(4), "Answer.");
        message.sources.push(Source {
            title: "Rust Book".into(),
            uri: "https://doc.rust-lang.org/book/".into(),
        });
        let rendered = texts(&message_lines(&message, false));
        assert_eq!(rendered[2], "Sources:");
        assert_eq!(
            rendered[3],
            "  1. Rust Book https://doc.rust-lang.org/book/"
        );
    }

    #[test]
    fn thinking_indicator_only_while_thinking() {
        let mut messages = VecDeque::new();
        messages.push_back(Message::user(MessageId::new(1), "hi"));
        messages.push_back(Message::placeholder(MessageId::new(2)));

        let thinking = texts(&build_display_lines(&messages, ModelStatus::Thinking, false, 80));
        assert_eq!(thinking.last().map(String::as_str), Some(THINKING_TEXT));

        for status in [ModelStatus::Idle, ModelStatus::Streaming, ModelStatus::Error] {
            let rendered = texts(&build_display_lines(&messages, status, false, 80));
            assert!(!rendered.iter().any(|line| line == THINKING_TEXT));
        }
    }

    #[test]
    fn prewrap_breaks_at_word_boundaries() {
        let word = "w".repeat(41);
        let line = Line::from(format!("{word} {word} {word}"));
        let rows = texts(&prewrap_lines(vec![line], 80));
        assert_eq!(rows, vec![format!("{word} "), format!("{word} "), word]);
    }

    #[test]
    fn prewrap_splits_overlong_words_and_wide_chars() {
        let rows = texts(&prewrap_lines(
            vec![Line::from("a".repeat(25)), Line::from(""), Line::from("日本語")],
            10,
        ));
        assert_eq!(
            rows,
            vec!["a".repeat(10), "a".repeat(10), "a".repeat(5), String::new(), "日本語".into()]
        );

        let narrow = texts(&prewrap_lines(vec![Line::from("日本語")], 5));
        assert_eq!(narrow, vec!["日本", "語"]);
    }

    #[test]
    fn prewrap_keeps_span_styles() {
        let line = Line::from(vec![
            Span::styled("alpha ", Style::default().fg(Color::Cyan)),
            Span::styled("beta", Style::default().fg(Color::Red)),
        ]);
        let rows = prewrap_lines(vec![line], 5);
        assert_eq!(texts(&rows), vec!["alpha", "beta"]);
        assert_eq!(rows[0].spans[0].style.fg, Some(Color::Cyan));
        assert_eq!(rows[1].spans[0].style.fg, Some(Color::Red));
    }
}
