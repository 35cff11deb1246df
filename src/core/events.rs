use super::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Start,
    Next,
    AddWord,
    DeleteWord,
    Text,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Next => "next",
            EventKind::AddWord => "addWord",
            EventKind::DeleteWord => "deleteWord",
            EventKind::Text => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub kind: EventKind,
    pub payload: String,
}

impl InboundEvent {
    pub fn new(user_id: UserId, kind: EventKind, payload: impl Into<String>) -> Self {
        Self {
            user_id,
            kind,
            payload: payload.into(),
        }
    }

    pub fn start(user_id: UserId) -> Self {
        Self::new(user_id, EventKind::Start, "")
    }

    pub fn next(user_id: UserId) -> Self {
        Self::new(user_id, EventKind::Next, "")
    }

    pub fn add_word(user_id: UserId) -> Self {
        Self::new(user_id, EventKind::AddWord, "")
    }

    pub fn delete_word(user_id: UserId) -> Self {
        Self::new(user_id, EventKind::DeleteWord, "")
    }

    pub fn text(user_id: UserId, payload: impl Into<String>) -> Self {
        Self::new(user_id, EventKind::Text, payload)
    }
}

/// Outbound request for the transport: a text body plus the answer buttons.
/// The fixed action buttons are appended by the transport itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub user_id: UserId,
    pub message: String,
    pub choices: Vec<String>,
}

impl Presentation {
    pub fn notice(user_id: UserId, message: impl Into<String>) -> Self {
        Self {
            user_id,
            message: message.into(),
            choices: Vec::new(),
        }
    }

    pub fn with_choices(user_id: UserId, message: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            user_id,
            message: message.into(),
            choices,
        }
    }
}
