/// Process-wide request status shown in the UI.
///
/// `Idle` and `Error` accept a new message; `Thinking` (request sent, nothing
/// received yet) and `Streaming` (text arriving) keep the input disabled so at
/// most one request is ever outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelStatus {
    #[default]
    Idle,
    Thinking,
    Streaming,
    Error,
}

impl ModelStatus {
    pub fn accepts_input(self) -> bool {
        matches!(self, ModelStatus::Idle | ModelStatus::Error)
    }

    pub fn is_busy(self) -> bool {
        matches!(self, ModelStatus::Thinking | ModelStatus::Streaming)
    }

    pub fn label(self) -> &'static str {
        match self {
            ModelStatus::Idle => "idle",
            ModelStatus::Thinking => "thinking",
            ModelStatus::Streaming => "streaming",
            ModelStatus::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_idle_and_error_accept_input() {
        assert!(ModelStatus::Idle.accepts_input());
        assert!(ModelStatus::Error.accepts_input());
        assert!(!ModelStatus::Thinking.accepts_input());
        assert!(!ModelStatus::Streaming.accepts_input());
    }

    #[test]
    fn busy_is_the_complement_of_accepting_input() {
        for status in [
            ModelStatus::Idle,
            ModelStatus::Thinking,
            ModelStatus::Streaming,
            ModelStatus::Error,
        ] {
            assert_eq!(status.is_busy(), !status.accepts_input());
        }
    }
}
