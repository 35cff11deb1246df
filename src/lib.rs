pub mod config;
pub mod core;
pub mod db;
pub mod logging;
pub mod messages;
pub mod seed;
pub mod services;
pub mod transport;

use crate::config::Config;
use crate::db::{StoreError, WordStore};
use crate::services::ConversationController;

/// Opens the store, seeds it when configured and wires up the controller.
pub async fn create_controller(config: &Config) -> Result<ConversationController, StoreError> {
    let store = WordStore::open(&config.database_path).await?;
    if config.seed_shared_words {
        seed::seed_shared_words(&store).await?;
    }
    Ok(ConversationController::new(store, config.distractor_count))
}
