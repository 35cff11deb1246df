use std::collections::{BTreeSet, HashMap};

use parking_lot::Mutex;
use thiserror::Error;

use crate::core::UserId;

const EXHAUSTED_MARK: &str = "❌";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    AwaitingAnswer,
}

/// Snapshot of the card currently shown to a user. Holds plain text, so
/// deleting the underlying row does not invalidate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user_id: UserId,
    pub target_word: String,
    pub translation: String,
    pub distractors: BTreeSet<String>,
    /// Display order of target and distractors, fixed for the round.
    pub choices: Vec<String>,
    /// Distractors already picked this round.
    pub exhausted: BTreeSet<String>,
    pub answer_state: AnswerState,
}

impl SessionState {
    pub fn is_distractor(&self, text: &str) -> bool {
        self.distractors.contains(text)
    }

    /// Choice labels for rendering; exhausted ones carry a cross mark.
    pub fn choice_labels(&self) -> Vec<String> {
        self.choices
            .iter()
            .map(|choice| {
                if self.exhausted.contains(choice) {
                    format!("{choice}{EXHAUSTED_MARK}")
                } else {
                    choice.clone()
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no active session for user {0}")]
pub struct NoActiveSessionError(pub UserId);

#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<UserId, SessionState>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever the user had before.
    pub fn start_session(
        &self,
        user_id: UserId,
        target_word: String,
        translation: String,
        distractors: BTreeSet<String>,
        choices: Vec<String>,
    ) -> SessionState {
        let state = SessionState {
            user_id,
            target_word,
            translation,
            distractors,
            choices,
            exhausted: BTreeSet::new(),
            answer_state: AnswerState::AwaitingAnswer,
        };
        self.sessions.lock().insert(user_id, state.clone());
        state
    }

    pub fn get_session(&self, user_id: UserId) -> Result<SessionState, NoActiveSessionError> {
        self.sessions
            .lock()
            .get(&user_id)
            .cloned()
            .ok_or(NoActiveSessionError(user_id))
    }

    pub fn clear_session(&self, user_id: UserId) {
        self.sessions.lock().remove(&user_id);
    }

    /// Flags `choice` as exhausted when it is one of the current distractors.
    /// Returns whether it was.
    pub fn mark_exhausted(&self, user_id: UserId, choice: &str) -> Result<bool, NoActiveSessionError> {
        let mut sessions = self.sessions.lock();
        let state = sessions.get_mut(&user_id).ok_or(NoActiveSessionError(user_id))?;
        if !state.is_distractor(choice) {
            return Ok(false);
        }
        state.exhausted.insert(choice.to_string());
        Ok(true)
    }
}
