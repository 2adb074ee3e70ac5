use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tui_textarea::Input as TAInput;

use crate::core::app::App;
use crate::core::chat_stream::StreamParams;
use crate::utils::clipboard::copy_to_clipboard;

pub enum KeyOutcome {
    /// A message was accepted and its stream should start.
    Send(StreamParams),
    Quit,
    Handled,
    Ignored,
}

const WHEEL_LINES: u16 = 3;

/// Mouse wheel scrolls the transcript; other mouse events are ignored.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, transcript: Rect) -> KeyOutcome {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(WHEEL_LINES);
            KeyOutcome::Handled
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(WHEEL_LINES, transcript.height, transcript.width);
            KeyOutcome::Handled
        }
        _ => KeyOutcome::Ignored,
    }
}

/// Apply one key press. `transcript` is the transcript pane, used to size
/// page scrolling.
pub fn handle_key(app: &mut App, key: KeyEvent, transcript: Rect) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let page = transcript.height.saturating_sub(1).max(1);

    match key.code {
        KeyCode::Char('c') if ctrl => KeyOutcome::Quit,
        KeyCode::Char('l') if ctrl => {
            app.dismiss_notices();
            KeyOutcome::Handled
        }
        KeyCode::Char('y') if ctrl => {
            app.copy_latest_code_block(copy_to_clipboard);
            KeyOutcome::Handled
        }
        KeyCode::Up => {
            app.scroll_up(1);
            KeyOutcome::Handled
        }
        KeyCode::Down => {
            app.scroll_down(1, transcript.height, transcript.width);
            KeyOutcome::Handled
        }
        KeyCode::PageUp => {
            app.scroll_up(page);
            KeyOutcome::Handled
        }
        KeyCode::PageDown => {
            app.scroll_down(page, transcript.height, transcript.width);
            KeyOutcome::Handled
        }
        _ if app.status.is_busy() => KeyOutcome::Ignored,
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.input.insert_newline();
            KeyOutcome::Handled
        }
        KeyCode::Enter => match app.submit_input() {
            Some(params) => KeyOutcome::Send(params),
            None => KeyOutcome::Handled,
        },
        _ => {
            if app.input.input(TAInput::from(key)) {
                KeyOutcome::Handled
            } else {
                KeyOutcome::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::ModelStatus;
    use crate::utils::test_utils::{create_test_app, start_test_stream};

    const PANE: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 10,
    };

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
        handle_key(app, KeyEvent::new(code, modifiers), PANE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn enter_sends_typed_text() {
        let mut app = create_test_app();
        type_text(&mut app, "hi there");
        match press(&mut app, KeyCode::Enter, KeyModifiers::NONE) {
            KeyOutcome::Send(params) => assert_eq!(params.request.contents.len(), 1),
            _ => panic!("expected a stream to start"),
        }
        assert_eq!(app.status, ModelStatus::Thinking);
        assert!(app.input_text().is_empty());
    }

    #[test]
    fn modified_enter_inserts_newline() {
        let mut app = create_test_app();
        type_text(&mut app, "a");
        press(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        type_text(&mut app, "b");
        press(&mut app, KeyCode::Enter, KeyModifiers::ALT);
        type_text(&mut app, "c");
        assert_eq!(app.input_text(), "a\nb\nc");
        assert_eq!(app.status, ModelStatus::Idle);
    }

    #[test]
    fn enter_on_blank_input_does_nothing() {
        let mut app = create_test_app();
        type_text(&mut app, "   ");
        assert!(matches!(
            press(&mut app, KeyCode::Enter, KeyModifiers::NONE),
            KeyOutcome::Handled
        ));
        assert_eq!(app.status, ModelStatus::Idle);
    }

    #[test]
    fn typing_is_ignored_while_busy() {
        let mut app = create_test_app();
        start_test_stream(&mut app, "question");
        assert!(matches!(
            press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE),
            KeyOutcome::Ignored
        ));
        assert!(matches!(
            press(&mut app, KeyCode::Enter, KeyModifiers::NONE),
            KeyOutcome::Ignored
        ));
        assert!(app.input_text().is_empty());
    }

    #[test]
    fn ctrl_c_quits_even_while_busy() {
        let mut app = create_test_app();
        start_test_stream(&mut app, "question");
        assert!(matches!(
            press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyOutcome::Quit
        ));
    }

    #[test]
    fn wheel_up_leaves_auto_scroll() {
        let mut app = create_test_app();
        let id = start_test_stream(&mut app, "question");
        app.handle_stream_message(
            crate::core::chat_stream::StreamMessage::Chunk("row\n".repeat(30)),
            id,
        );
        app.update_scroll_position(PANE.height, PANE.width);

        let wheel = |kind| MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut app, wheel(MouseEventKind::ScrollUp), PANE);
        assert!(!app.auto_scroll);
        handle_mouse(&mut app, wheel(MouseEventKind::ScrollDown), PANE);
        assert!(app.auto_scroll);
    }

    #[test]
    fn ctrl_y_without_code_reports_nothing_to_copy() {
        let mut app = create_test_app();
        assert!(matches!(
            press(&mut app, KeyCode::Char('y'), KeyModifiers::CONTROL),
            KeyOutcome::Handled
        ));
        assert_eq!(app.notice.as_deref(), Some("No code block to copy."));
        assert!(app.input_text().is_empty());
    }

    #[test]
    fn ctrl_l_dismisses_notice() {
        let mut app = create_test_app();
        app.set_notice("hello");
        press(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert!(app.notice.is_none());
    }
}
