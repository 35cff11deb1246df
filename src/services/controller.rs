use std::collections::HashMap;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::core::{EventKind, InboundEvent, Presentation, UserId};
use crate::db::{StoreError, WordEntry, WordStore};
use crate::messages;
use crate::services::card_selector::{select_card, EmptyPoolError};
use crate::services::session::{SessionManager, SessionState};
use crate::services::user_registry::UserRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingAnswer,
    AwaitingNewWordText,
}

impl ConversationState {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConversationState::Idle => "IDLE",
            ConversationState::AwaitingAnswer => "AWAITING_ANSWER",
            ConversationState::AwaitingNewWordText => "AWAITING_NEW_WORD_TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    DealCard,
    DeleteCurrent,
    PromptNewWord,
    SaveNewWord,
    CheckAnswer,
}

/// Transition table. Commands win over whatever text mode the user is in;
/// free text is interpreted by the current state.
fn route(state: ConversationState, kind: EventKind) -> Action {
    match (state, kind) {
        (_, EventKind::Start | EventKind::Next) => Action::DealCard,
        (_, EventKind::AddWord) => Action::PromptNewWord,
        (_, EventKind::DeleteWord) => Action::DeleteCurrent,
        (ConversationState::AwaitingNewWordText, EventKind::Text) => Action::SaveNewWord,
        (ConversationState::Idle | ConversationState::AwaitingAnswer, EventKind::Text) => {
            Action::CheckAnswer
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected '<word> <translation>'")]
pub struct ParseError;

/// Splits add-word input on the first whitespace run; the translation is the
/// remainder and may itself contain spaces.
pub fn parse_new_word(text: &str) -> Result<(&str, &str), ParseError> {
    let (word, rest) = text.trim().split_once(char::is_whitespace).ok_or(ParseError)?;
    let translation = rest.trim_start();
    if word.is_empty() || translation.is_empty() {
        return Err(ParseError);
    }
    Ok((word, translation))
}

pub struct ConversationController {
    store: WordStore,
    sessions: SessionManager,
    users: UserRegistry,
    states: Mutex<HashMap<UserId, ConversationState>>,
    distractor_count: usize,
}

impl ConversationController {
    pub fn new(store: WordStore, distractor_count: usize) -> Self {
        Self {
            store,
            sessions: SessionManager::new(),
            users: UserRegistry::new(),
            states: Mutex::new(HashMap::new()),
            distractor_count,
        }
    }

    pub fn store(&self) -> &WordStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn state_of(&self, user_id: UserId) -> ConversationState {
        self.states.lock().get(&user_id).copied().unwrap_or_default()
    }

    /// Idle is the default, so it is stored as the absence of an entry.
    fn set_state(&self, user_id: UserId, state: ConversationState) {
        let mut states = self.states.lock();
        let previous = match state {
            ConversationState::Idle => states.remove(&user_id),
            _ => states.insert(user_id, state),
        }
        .unwrap_or_default();
        drop(states);
        if previous != state {
            debug!(user_id = %user_id, from = previous.as_str(), to = state.as_str(), "conversation state changed");
        }
    }

    /// Processes one inbound event to completion. Every path ends with at
    /// least one presentation telling the user what to do next.
    pub async fn handle(&self, event: InboundEvent) -> Vec<Presentation> {
        let user_id = event.user_id;
        let mut out = Vec::new();

        if self.users.register(user_id) {
            info!(user_id = %user_id, "new user");
            out.push(Presentation::notice(user_id, messages::WELCOME));
        }

        let action = route(self.state_of(user_id), event.kind);
        debug!(user_id = %user_id, kind = event.kind.as_str(), ?action, "handling event");

        match action {
            Action::DealCard => self.deal_card(user_id, &mut out).await,
            Action::DeleteCurrent => self.delete_current(user_id, &mut out).await,
            Action::PromptNewWord => {
                self.set_state(user_id, ConversationState::AwaitingNewWordText);
                out.push(Presentation::notice(user_id, messages::ADD_WORD_PROMPT));
            }
            Action::SaveNewWord => self.save_new_word(user_id, &event.payload, &mut out).await,
            Action::CheckAnswer => self.check_answer(user_id, &event.payload, &mut out).await,
        }

        out
    }

    async fn deal_card(&self, user_id: UserId, out: &mut Vec<Presentation>) {
        let pool = match self.store.query_pool(user_id).await {
            Ok(pool) => pool,
            Err(err) => {
                self.report_store_error(user_id, &err, out);
                return;
            }
        };

        match self.new_session(user_id, &pool) {
            Ok(session) => {
                self.set_state(user_id, ConversationState::AwaitingAnswer);
                out.push(Presentation::with_choices(
                    user_id,
                    messages::card_prompt(&session.translation),
                    session.choice_labels(),
                ));
            }
            Err(EmptyPoolError) => {
                self.sessions.clear_session(user_id);
                self.set_state(user_id, ConversationState::Idle);
                out.push(Presentation::notice(user_id, messages::EMPTY_DATABASE));
            }
        }
    }

    fn new_session(&self, user_id: UserId, pool: &[WordEntry]) -> Result<SessionState, EmptyPoolError> {
        let mut rng = rand::rng();
        let card = select_card(pool, self.distractor_count, &mut rng)?;
        let choices = card.shuffled_choices(&mut rng);
        Ok(self.sessions.start_session(
            user_id,
            card.target.word,
            card.target.translation,
            card.distractors,
            choices,
        ))
    }

    async fn delete_current(&self, user_id: UserId, out: &mut Vec<Presentation>) {
        let session = match self.sessions.get_session(user_id) {
            Ok(session) => session,
            Err(err) => {
                debug!(error = %err, "delete without a card, dealing a new one");
                return self.deal_card(user_id, out).await;
            }
        };

        let deleted = match self
            .store
            .delete_by_word_and_owner(&session.target_word, user_id)
            .await
        {
            Ok(deleted) => deleted,
            Err(err) => {
                self.report_store_error(user_id, &err, out);
                return;
            }
        };

        let notice = if deleted > 0 {
            info!(user_id = %user_id, deleted, "user word deleted");
            messages::word_deleted(&session.target_word)
        } else {
            messages::word_not_owned(&session.target_word)
        };
        out.push(Presentation::notice(user_id, notice));

        self.sessions.clear_session(user_id);
        self.set_state(user_id, ConversationState::Idle);
        self.deal_card(user_id, out).await;
    }

    async fn save_new_word(&self, user_id: UserId, text: &str, out: &mut Vec<Presentation>) {
        let (word, translation) = match parse_new_word(text) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(user_id = %user_id, error = %err, "malformed new word");
                out.push(Presentation::notice(user_id, messages::ADD_WORD_FORMAT_ERROR));
                return;
            }
        };

        match self.store.insert(word, translation, Some(user_id)).await {
            Ok(id) => {
                info!(user_id = %user_id, id, "user word added");
                self.set_state(user_id, ConversationState::Idle);
                out.push(Presentation::notice(user_id, messages::word_added(word, translation)));
                self.deal_card(user_id, out).await;
            }
            Err(StoreError::Validation(err)) => {
                debug!(user_id = %user_id, error = %err, "rejected new word");
                out.push(Presentation::notice(user_id, messages::ADD_WORD_FORMAT_ERROR));
            }
            Err(err) => self.report_store_error(user_id, &err, out),
        }
    }

    async fn check_answer(&self, user_id: UserId, text: &str, out: &mut Vec<Presentation>) {
        let session = match self.sessions.get_session(user_id) {
            Ok(session) => session,
            Err(err) => {
                debug!(error = %err, "answer without a card, dealing a new one");
                return self.deal_card(user_id, out).await;
            }
        };

        if text == session.target_word {
            out.push(Presentation::with_choices(
                user_id,
                messages::correct_answer(&session.target_word, &session.translation),
                session.choice_labels(),
            ));
            return;
        }

        let session = match self.sessions.mark_exhausted(user_id, text) {
            Ok(true) => self.sessions.get_session(user_id).unwrap_or(session),
            Ok(false) | Err(_) => session,
        };
        out.push(Presentation::with_choices(
            user_id,
            messages::wrong_answer(&session.translation),
            session.choice_labels(),
        ));
    }

    fn report_store_error(&self, user_id: UserId, err: &StoreError, out: &mut Vec<Presentation>) {
        match err {
            StoreError::Validation(_) => warn!(user_id = %user_id, error = %err, "word store rejected input"),
            _ => error!(user_id = %user_id, error = %err, "word store failure"),
        }
        out.push(Presentation::notice(user_id, messages::STORE_FAILURE));
    }
}
