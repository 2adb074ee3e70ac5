//! Interactive chat loop.
//!
//! Each pass draws a frame, waits briefly for terminal input, then drains
//! every stream event that arrived in the meantime. Stream tasks run on the
//! tokio runtime and only talk to the loop through the channel, so all state
//! changes happen here.

mod keys;
mod lifecycle;

pub use keys::{handle_key, handle_mouse, KeyOutcome};
pub use lifecycle::{restore_terminal, setup_terminal, ChatTerminal};

use std::{error::Error, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::core::app::App;
use crate::core::chat_stream::ChatStreamService;
use crate::ui::renderer::{compute_layout, ui};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub async fn run_chat(mut app: App) -> Result<(), Box<dyn Error>> {
    let mut terminal = setup_terminal()?;
    info!(model = %app.session.model, "chat session started");

    let result = event_loop(&mut terminal, &mut app).await;
    let restored = restore_terminal(&mut terminal);

    info!("chat session ended");
    result.and(restored)
}

fn paste_into_input(app: &mut App, text: &str) {
    if app.status.is_busy() {
        return;
    }
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    app.input.insert_str(normalized);
}

async fn event_loop(terminal: &mut ChatTerminal, app: &mut App) -> Result<(), Box<dyn Error>> {
    let (stream_service, mut rx) = ChatStreamService::new();

    loop {
        let size = terminal.size()?;
        let layout = compute_layout(Rect::new(0, 0, size.width, size.height), app);
        let transcript = layout.transcript;
        app.update_scroll_position(transcript.height, transcript.width);
        terminal.draw(|f| ui(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Mouse(mouse) => {
                    handle_mouse(app, mouse, transcript);
                }
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key(app, key, transcript) {
                        KeyOutcome::Send(params) => {
                            debug!(stream = %params.stream_id, "spawning stream");
                            stream_service.spawn_stream(params);
                        }
                        KeyOutcome::Quit => app.exit_requested = true,
                        KeyOutcome::Handled | KeyOutcome::Ignored => {}
                    }
                }
                Event::Paste(text) => paste_into_input(app, &text),
                _ => {}
            }
        }

        while let Ok((message, stream_id)) = rx.try_recv() {
            app.handle_stream_message(message, stream_id);
        }

        if app.exit_requested {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_test_app, start_test_stream};

    #[test]
    fn paste_is_ignored_while_busy() {
        let mut app = create_test_app();
        paste_into_input(&mut app, "one\r\ntwo");
        assert_eq!(app.input_text(), "one\ntwo");

        app.clear_input();
        start_test_stream(&mut app, "question");
        paste_into_input(&mut app, "ignored");
        assert!(app.input_text().is_empty());
    }
}
