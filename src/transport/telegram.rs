use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::keyboard::{reply_keyboard, ReplyKeyboardMarkup};
use super::queue::UserQueues;
use super::classify;
use crate::core::{InboundEvent, Presentation, UserId};
use crate::services::ConversationController;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const RETRY_DELAY: Duration = Duration::from_secs(5);
const REQUEST_SLACK: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("telegram api rejected {method}: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    reply_markup: ReplyKeyboardMarkup,
}

/// Text messages become events keyed by chat id; everything else is ignored.
pub fn update_to_event(update: &Update) -> Option<InboundEvent> {
    let message = update.message.as_ref()?;
    let text = message.text.as_deref()?;
    Some(classify(UserId(message.chat.id), text))
}

/// Long-polling Bot API client.
pub struct TelegramTransport {
    bot_token: String,
    api_base: String,
    poll_timeout: Duration,
    client: reqwest::Client,
}

impl TelegramTransport {
    pub fn new(bot_token: String, poll_timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(poll_timeout + REQUEST_SLACK)
            .build()?;
        Ok(Self {
            bot_token,
            api_base: DEFAULT_API_BASE.to_string(),
            poll_timeout,
            client,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base.trim_end_matches('/'), self.bot_token)
    }

    async fn call<B, T>(&self, method: &'static str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response: ApiResponse<T> = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        match response.result {
            Some(result) if response.ok => Ok(result),
            _ => Err(TransportError::Api {
                method,
                description: response
                    .description
                    .unwrap_or_else(|| "missing result".to_string()),
            }),
        }
    }

    async fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>, TransportError> {
        let body = GetUpdates {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: ["message"],
        };
        self.call("getUpdates", &body).await
    }

    pub async fn send(&self, presentation: &Presentation) -> Result<(), TransportError> {
        let body = SendMessage {
            chat_id: presentation.user_id.get(),
            text: &presentation.message,
            reply_markup: reply_keyboard(&presentation.choices),
        };
        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }

    /// Returns the offset just past any updates queued while the bot was down.
    async fn skip_pending(&self) -> i64 {
        match self.get_updates(-1, Duration::ZERO).await {
            Ok(updates) => updates.last().map(|u| u.update_id + 1).unwrap_or(0),
            Err(err) => {
                warn!(error = %err, "failed to skip pending updates");
                0
            }
        }
    }

    /// Polls until a shutdown signal arrives, then waits for every accepted
    /// event to be handled. Events of one user are handled strictly in
    /// arrival order; different users proceed in parallel.
    pub async fn run(
        self: Arc<Self>,
        controller: Arc<ConversationController>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let mut offset = self.skip_pending().await;
        info!(offset, "telegram transport polling");

        let transport = Arc::clone(&self);
        let mut queues = UserQueues::new(move |event: InboundEvent| {
            Arc::clone(&transport).deliver(Arc::clone(&controller), event)
        });

        loop {
            let updates = tokio::select! {
                _ = shutdown.recv() => break,
                result = self.get_updates(offset, self.poll_timeout) => result,
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(err) => {
                    warn!(error = %err, "telegram poll failed");
                    tokio::select! {
                        _ = shutdown.recv() => break,
                        _ = tokio::time::sleep(RETRY_DELAY) => continue,
                    }
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some(event) = update_to_event(&update) else {
                    debug!(update_id = update.update_id, "ignoring non-text update");
                    continue;
                };
                queues.submit(event);
            }
        }

        info!(pending_users = queues.active_users(), "telegram transport draining");
        queues.drain().await;
        info!("telegram transport stopped");
    }

    async fn deliver(self: Arc<Self>, controller: Arc<ConversationController>, event: InboundEvent) {
        let presentations = controller.handle(event).await;
        for presentation in &presentations {
            if let Err(err) = self.send(presentation).await {
                warn!(user_id = %presentation.user_id, error = %err, "failed to deliver message");
            }
        }
    }
}
