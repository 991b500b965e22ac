use chrono::Utc;
use teloxide::types::ChatId;

use crate::{
    errors::BotError,
    services::{balance::BalanceService, store::Store},
    storages::{Income, Incomes},
};

#[derive(Clone)]
pub struct IncomeService {
    store: Store<Incomes>,
    balance: BalanceService,
}

impl IncomeService {
    pub fn new(store: Store<Incomes>, balance: BalanceService) -> Self {
        Self { store, balance }
    }

    pub async fn get(&self, chat_id: ChatId) -> Result<Vec<Income>, BotError> {
        self.store.get(chat_id).await
    }

    /// Record an income dated now and raise the balance
    pub async fn add(
        &self,
        chat_id: ChatId,
        description: &str,
        amount: f64,
    ) -> Result<Income, BotError> {
        let income = Income {
            timestamp: Utc::now(),
            description: description.to_string(),
            amount,
        };
        self.store.add(chat_id, income.clone()).await?;
        self.balance.add(chat_id, amount).await?;
        log::info!("Chat {}: income {} added", chat_id, amount);
        Ok(income)
    }

    /// Append already existing incomes without touching the balance
    pub async fn add_batch(&self, chat_id: ChatId, incomes: Vec<Income>) -> Result<(), BotError> {
        self.store.add_batch(chat_id, incomes).await
    }

    pub async fn remove(&self, chat_id: ChatId) -> Result<(), BotError> {
        self.store.remove(chat_id).await
    }
}
