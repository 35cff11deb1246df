pub mod keyboard;
pub mod queue;
pub mod telegram;

use crate::core::{EventKind, InboundEvent, UserId};

pub use telegram::{TelegramTransport, TransportError};

/// Labels of the fixed action buttons.
pub struct Command;

impl Command {
    pub const NEXT: &'static str = "Дальше ⏭";
    pub const ADD_WORD: &'static str = "Добавить слово ➕";
    pub const DELETE_WORD: &'static str = "Удалить слово🔙";
}

/// Maps raw chat text onto an inbound event. Button labels and slash
/// commands are matched exactly; everything else is free text.
pub fn classify(user_id: UserId, text: &str) -> InboundEvent {
    let kind = match text {
        Command::NEXT => EventKind::Next,
        Command::ADD_WORD => EventKind::AddWord,
        Command::DELETE_WORD => EventKind::DeleteWord,
        other if is_start_command(other) => EventKind::Start,
        _ => EventKind::Text,
    };
    let payload = if kind == EventKind::Text { text } else { "" };
    InboundEvent::new(user_id, kind, payload)
}

/// `/start` and `/cards`, optionally addressed as `/start@bot_name` or
/// followed by arguments.
fn is_start_command(text: &str) -> bool {
    let Some(command) = text.split_whitespace().next() else {
        return false;
    };
    let name = command.split('@').next().unwrap_or(command);
    matches!(name, "/start" | "/cards")
}
