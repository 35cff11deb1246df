use std::collections::HashSet;

use parking_lot::Mutex;

use crate::core::UserId;

/// Users seen since the process started. Append-only.
#[derive(Debug, Default)]
pub struct UserRegistry {
    known: Mutex<HashSet<UserId>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` on first contact.
    pub fn register(&self, user_id: UserId) -> bool {
        self.known.lock().insert(user_id)
    }
}
