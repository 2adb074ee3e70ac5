//! Copying text to the system clipboard through the platform's command line
//! tools.

use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// None of the clipboard commands could be started.
    NoTool,
    /// The command started but exited unsuccessfully.
    Failed(&'static str),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::NoTool => write!(
                f,
                "no clipboard command found (install wl-copy, xclip, or xsel)"
            ),
            ClipboardError::Failed(cmd) => write!(f, "clipboard command `{cmd}` failed"),
        }
    }
}

impl std::error::Error for ClipboardError {}

#[cfg(target_os = "macos")]
const TOOLS: &[(&str, &[&str])] = &[("pbcopy", &[])];
#[cfg(target_os = "windows")]
const TOOLS: &[(&str, &[&str])] = &[("cmd", &["/C", "clip"])];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Tries each known tool in turn; a tool that is missing falls through to the
/// next one, a tool that runs and fails stops the search.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    for &(cmd, args) in TOOLS {
        match run_with_stdin(cmd, args, text) {
            Err(ClipboardError::NoTool) => continue,
            result => return result,
        }
    }
    Err(ClipboardError::NoTool)
}

fn run_with_stdin(cmd: &'static str, args: &[&str], input: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|_| ClipboardError::NoTool)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .map_err(|_| ClipboardError::Failed(cmd))?;
    }
    match child.wait() {
        Ok(status) if status.success() => Ok(()),
        _ => Err(ClipboardError::Failed(cmd)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_reported_as_no_tool() {
        let result = run_with_stdin("geminal-no-such-clipboard-tool", &[], "text");
        assert_eq!(result, Err(ClipboardError::NoTool));
        assert!(ClipboardError::NoTool.to_string().contains("xclip"));
    }

    #[test]
    fn failing_tool_names_the_command() {
        assert_eq!(
            ClipboardError::Failed("xsel").to_string(),
            "clipboard command `xsel` failed"
        );
    }
}
