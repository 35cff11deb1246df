pub mod card_selector;
pub mod controller;
pub mod session;
pub mod user_registry;

pub use controller::{ConversationController, ConversationState};
