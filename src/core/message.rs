use chrono::{DateTime, Local};
use std::fmt;

use crate::api::{Content, ROLE_MODEL, ROLE_USER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Model => ROLE_MODEL,
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_model(self) -> bool {
        self == Role::Model
    }
}

/// Conversation-local message identifier. Ids are handed out in creation
/// order, so comparing ids compares creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A web page the search tool grounded a reply on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
    pub is_error: bool,
    pub sources: Vec<Source>,
}

impl Message {
    pub fn new(id: MessageId, role: Role, text: impl Into<String>) -> Self {
        Self {
            id,
            role,
            text: text.into(),
            timestamp: Local::now(),
            is_error: false,
            sources: Vec::new(),
        }
    }

    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, Role::User, text)
    }

    pub fn model(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, Role::Model, text)
    }

    /// Empty model message that a stream fills in.
    pub fn placeholder(id: MessageId) -> Self {
        Self::model(id, String::new())
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_model(&self) -> bool {
        self.role.is_model()
    }

    pub fn to_content(&self) -> Content {
        Content::new(self.role.as_str(), self.text.clone())
    }
}
