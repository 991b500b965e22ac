use teloxide::types::ChatId;

use crate::{errors::BotError, services::store::Store, storages::Balances};

/// Running balance of a chat, recomputed additively on every record
#[derive(Clone)]
pub struct BalanceService {
    store: Store<Balances>,
}

impl BalanceService {
    pub fn new(store: Store<Balances>) -> Self {
        Self { store }
    }

    /// Current balance, zero when nothing was recorded yet
    pub async fn get(&self, chat_id: ChatId) -> Result<f64, BotError> {
        Ok(self.store.get(chat_id).await?.last().copied().unwrap_or(0.0))
    }

    /// Add `delta` (negative for expenses) and return the new balance
    pub async fn add(&self, chat_id: ChatId, delta: f64) -> Result<f64, BotError> {
        let balance = self.get(chat_id).await? + delta;
        self.store.overwrite(chat_id, vec![balance]).await?;
        Ok(balance)
    }

    pub async fn remove(&self, chat_id: ChatId) -> Result<(), BotError> {
        self.store.remove(chat_id).await
    }
}
