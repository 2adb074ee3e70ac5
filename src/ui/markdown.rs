//! Splits message text into prose and code blocks.
//!
//! Only block structure matters here; prose is displayed as typed. Replies are
//! segmented on every redraw while they stream, so a fence that has been
//! opened but not yet closed runs to the end of the text.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Prose(&'a str),
    Code {
        language: Option<String>,
        code: String,
    },
}

fn language_hint(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Indented => None,
        CodeBlockKind::Fenced(info) => info
            .split_ascii_whitespace()
            .next()
            .map(|lang| lang.to_string()),
    }
}

fn push_prose<'a>(out: &mut Vec<Segment<'a>>, prose: &'a str) {
    // Code ranges start after their indentation, which would otherwise
    // trail the preceding prose.
    let prose = prose.trim_start_matches(['\n', '\r']).trim_end();
    if !prose.trim().is_empty() {
        out.push(Segment::Prose(prose));
    }
}

pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut cursor = 0;
    let mut open: Option<Option<String>> = None;
    let mut code = String::new();

    for (event, range) in Parser::new_ext(text, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                if range.start >= cursor {
                    push_prose(&mut out, &text[cursor..range.start]);
                }
                cursor = cursor.max(range.end);
                open = Some(language_hint(&kind));
                code.clear();
            }
            Event::Text(chunk) if open.is_some() => code.push_str(&chunk),
            Event::End(TagEnd::CodeBlock) => {
                if let Some(language) = open.take() {
                    let mut body = std::mem::take(&mut code);
                    if body.ends_with('\n') {
                        body.pop();
                    }
                    out.push(Segment::Code {
                        language,
                        code: body,
                    });
                }
            }
            _ => {}
        }
    }

    if cursor < text.len() {
        push_prose(&mut out, &text[cursor..]);
    }
    out
}
