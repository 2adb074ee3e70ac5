//! Slash commands typed into the input box. They act on the local session
//! and are never sent to the model.

use crate::core::app::App;

pub const HELP_TEXT: &str = "Enter send • Shift+Enter / Alt+Enter newline • ↑↓ PgUp PgDn scroll • \
Ctrl+Y copy last code block • Ctrl+L dismiss notice • Ctrl+C quit\n\
/clear reset the conversation • /log <file> start a transcript log • /log pause or resume it • /help this text";

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();
    let mut parts = trimmed.split_whitespace();

    match parts.next() {
        Some("/help") => {
            app.set_notice(HELP_TEXT);
            CommandResult::Continue
        }
        Some("/clear") => {
            if app.clear_conversation() {
                app.set_notice("Conversation cleared.");
            } else {
                app.set_notice("Wait for the current reply to finish before clearing.");
            }
            CommandResult::Continue
        }
        Some("/log") => {
            let args: Vec<&str> = parts.collect();
            let outcome = match args.as_slice() {
                [] => app.logging.toggle_logging(),
                [filename] => app.logging.set_log_file(filename.to_string()),
                _ => Ok(
                    "Usage: /log [filename] - Enable logging to file, or /log to toggle pause/resume"
                        .to_string(),
                ),
            };
            match outcome {
                Ok(message) => app.set_notice(message),
                Err(e) => app.set_notice(format!("Error: {e}")),
            }
            CommandResult::Continue
        }
        _ => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_app;
    use tempfile::tempdir;

    #[test]
    fn regular_text_is_processed_as_message() {
        let mut app = create_test_app();
        assert_eq!(
            process_input(&mut app, "how do /paths work?"),
            CommandResult::ProcessAsMessage("how do /paths work?".into())
        );
        assert_eq!(
            process_input(&mut app, "/unknown thing"),
            CommandResult::ProcessAsMessage("/unknown thing".into())
        );
    }

    #[test]
    fn help_sets_notice_without_touching_transcript() {
        let mut app = create_test_app();
        let before = app.conversation.messages().len();
        assert_eq!(process_input(&mut app, "/help"), CommandResult::Continue);
        assert_eq!(app.conversation.messages().len(), before);
        assert_eq!(app.notice.as_deref(), Some(HELP_TEXT));
    }

    #[test]
    fn log_command_enables_and_toggles_logging() {
        let mut app = create_test_app();
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("session.log");

        process_input(&mut app, &format!("/log {}", path.display()));
        assert!(app.logging.is_active());
        assert!(app
            .notice
            .as_deref()
            .is_some_and(|n| n.starts_with("Logging enabled to:")));

        process_input(&mut app, "/log");
        assert!(!app.logging.is_active());
    }

    #[test]
    fn log_toggle_without_file_reports_error() {
        let mut app = create_test_app();
        process_input(&mut app, "/log");
        assert!(app
            .notice
            .as_deref()
            .is_some_and(|n| n.starts_with("Error: No log file specified")));
    }
}
