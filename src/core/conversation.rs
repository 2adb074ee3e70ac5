use std::collections::VecDeque;

use crate::api::{Content, Part};
use crate::core::message::{Message, MessageId, Source};

/// A send that was accepted: the placeholder the stream should fill and the
/// history to transmit.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub placeholder_id: MessageId,
    pub history: Vec<Content>,
}

/// Ordered chat transcript.
///
/// Messages are only ever appended, so transcript order is creation order.
/// At most one model placeholder is pending at a time; only that placeholder
/// may be mutated, and only until it is finished or failed.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: VecDeque<Message>,
    next_id: u64,
    pending: Option<MessageId>,
    greeting: Option<String>,
}

impl Conversation {
    pub fn new(greeting: Option<String>) -> Self {
        let mut conversation = Self {
            messages: VecDeque::new(),
            next_id: 0,
            pending: None,
            greeting: greeting.filter(|text| !text.trim().is_empty()),
        };
        conversation.seed_greeting();
        conversation
    }

    fn seed_greeting(&mut self) {
        if let Some(text) = self.greeting.clone() {
            let id = self.allocate_id();
            self.messages.push_back(Message::model(id, text));
        }
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId::new(self.next_id)
    }

    pub fn messages(&self) -> &VecDeque<Message> {
        &self.messages
    }

    pub fn pending_id(&self) -> Option<MessageId> {
        self.pending
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().rev().find(|msg| msg.id == id)
    }

    fn pending_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        if self.pending != Some(id) {
            return None;
        }
        self.messages.iter_mut().rev().find(|msg| msg.id == id)
    }

    /// Append the user's turn and an empty model placeholder.
    ///
    /// Returns `None` without touching the transcript when the trimmed input
    /// is empty or another placeholder is still pending.
    pub fn submit(&mut self, input: &str) -> Option<PendingTurn> {
        let text = input.trim();
        if text.is_empty() || self.pending.is_some() {
            return None;
        }

        let user_id = self.allocate_id();
        self.messages.push_back(Message::user(user_id, text));
        let history = self.history();

        let placeholder_id = self.allocate_id();
        self.messages.push_back(Message::placeholder(placeholder_id));
        self.pending = Some(placeholder_id);

        Some(PendingTurn {
            placeholder_id,
            history,
        })
    }

    /// Replace the pending placeholder's text with the accumulated response.
    pub fn set_text(&mut self, id: MessageId, text: &str) -> bool {
        match self.pending_mut(id) {
            Some(msg) => {
                msg.text.clear();
                msg.text.push_str(text);
                true
            }
            None => false,
        }
    }

    pub fn attach_sources(&mut self, id: MessageId, sources: Vec<Source>) -> bool {
        let Some(msg) = self.pending_mut(id) else {
            return false;
        };
        for source in sources {
            if !msg.sources.iter().any(|known| known.uri == source.uri) {
                msg.sources.push(source);
            }
        }
        true
    }

    /// Mark the pending placeholder as failed, replacing any partial text.
    pub fn fail(&mut self, id: MessageId, error_text: &str) -> bool {
        let Some(msg) = self.pending_mut(id) else {
            return false;
        };
        msg.text = error_text.to_string();
        msg.is_error = true;
        self.pending = None;
        true
    }

    pub fn finish(&mut self, id: MessageId) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Request history: every usable turn in order.
    ///
    /// Errored messages, empty messages and the pending placeholder are
    /// skipped. Model turns before the first user turn (the greeting) are
    /// display-only. Consecutive turns with the same role are merged into one
    /// content entry so roles alternate on the wire.
    pub fn history(&self) -> Vec<Content> {
        let mut contents: Vec<Content> = Vec::new();
        let usable = self
            .messages
            .iter()
            .filter(|msg| !msg.is_error)
            .filter(|msg| Some(msg.id) != self.pending)
            .filter(|msg| !msg.text.trim().is_empty())
            .skip_while(|msg| !msg.is_user());

        for msg in usable {
            match contents.last_mut() {
                Some(last) if last.role == msg.role.as_str() => last.parts.push(Part {
                    text: msg.text.clone(),
                }),
                _ => contents.push(msg.to_content()),
            }
        }
        contents
    }

    /// Drop every turn and re-seed the greeting. Refused while a stream is pending.
    pub fn clear(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.messages.clear();
        self.seed_greeting();
        true
    }
}
