use std::collections::BTreeMap;

use chrono::Utc;
use teloxide::types::ChatId;

use crate::{
    errors::{BotError, Outcome},
    services::{balance::BalanceService, limit::LimitService, store::Store},
    storages::{Expense, ExpenseCategory, Expenses},
};

#[derive(Clone)]
pub struct ExpenseService {
    store: Store<Expenses>,
    balance: BalanceService,
    limit: LimitService,
}

impl ExpenseService {
    pub fn new(store: Store<Expenses>, balance: BalanceService, limit: LimitService) -> Self {
        Self {
            store,
            balance,
            limit,
        }
    }

    pub async fn get(&self, chat_id: ChatId) -> Result<Vec<Expense>, BotError> {
        self.store.get(chat_id).await
    }

    /// Record an expense dated now in category `Other`, lower the balance and count it
    /// against the daily limit. The expense stays recorded when the limit is exceeded.
    pub async fn add(&self, chat_id: ChatId, description: &str, amount: f64) -> Outcome<Expense> {
        let expense = Expense {
            timestamp: Utc::now(),
            description: description.to_string(),
            amount,
            category: ExpenseCategory::default(),
        };
        self.store.add(chat_id, expense.clone()).await?;
        self.balance.add(chat_id, -amount).await?;
        log::info!("Chat {}: expense {} added", chat_id, amount);
        Ok(self
            .limit
            .record_spending(chat_id, amount)
            .await?
            .map(|_| expense))
    }

    /// Reclassify the most recent expense. Returns it, or None if there is none.
    pub async fn change_last_category(
        &self,
        chat_id: ChatId,
        category: ExpenseCategory,
    ) -> Result<Option<Expense>, BotError> {
        let mut expenses = self.store.get(chat_id).await?;
        let Some(last) = expenses.last_mut() else {
            return Ok(None);
        };
        last.category = category;
        let updated = last.clone();
        self.store.overwrite(chat_id, expenses).await?;
        Ok(Some(updated))
    }

    pub async fn by_category(
        &self,
        chat_id: ChatId,
        category: ExpenseCategory,
    ) -> Result<Vec<Expense>, BotError> {
        let mut expenses = self.store.get(chat_id).await?;
        expenses.retain(|e| e.category == category);
        Ok(expenses)
    }

    /// Sum of expenses per category, only categories that have expenses
    pub async fn category_totals(
        &self,
        chat_id: ChatId,
    ) -> Result<BTreeMap<ExpenseCategory, f64>, BotError> {
        let mut totals = BTreeMap::new();
        for expense in self.store.get(chat_id).await? {
            *totals.entry(expense.category).or_insert(0.0) += expense.amount;
        }
        Ok(totals)
    }

    /// Append already existing expenses without touching balance or limit
    pub async fn add_batch(&self, chat_id: ChatId, expenses: Vec<Expense>) -> Result<(), BotError> {
        self.store.add_batch(chat_id, expenses).await
    }

    pub async fn remove(&self, chat_id: ChatId) -> Result<(), BotError> {
        self.store.remove(chat_id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, Utc};

    use super::*;
    use crate::{
        errors::DomainError,
        services::test_support::services_with_open_chat,
        storages::Limit,
    };

    #[tokio::test]
    async fn test_add_defaults_category_and_timestamp() {
        let chat_id = ChatId(1);
        let (services, _) = services_with_open_chat(chat_id).await;

        let added = services
            .expenses
            .add(chat_id, "coffee", 3.0)
            .await
            .unwrap()
            .unwrap();

        let expenses = services.expenses.get(chat_id).await.unwrap();
        assert_eq!(expenses, vec![added.clone()]);
        assert_eq!(added.category, ExpenseCategory::Other);
        assert_eq!(added.timestamp.date_naive(), Utc::now().date_naive());
        assert_eq!(services.balance.get(chat_id).await.unwrap(), -3.0);
    }

    #[tokio::test]
    async fn test_limit_exceeded_still_records_expense() {
        let chat_id = ChatId(2);
        let (services, _) = services_with_open_chat(chat_id).await;
        services
            .limit
            .restore(
                chat_id,
                Some(Limit {
                    daily_cap: 100.0,
                    daily_spent: 90.0,
                    day: Local::now().date_naive(),
                }),
            )
            .await
            .unwrap();

        let outcome = services.expenses.add(chat_id, "coffee", 50.0).await.unwrap();
        assert_eq!(
            outcome,
            Err(DomainError::LimitExceeded {
                spent: 140.0,
                cap: 100.0
            })
        );
        assert_eq!(services.expenses.get(chat_id).await.unwrap().len(), 1);
        assert_eq!(services.balance.get(chat_id).await.unwrap(), -50.0);
        assert_eq!(
            services.limit.get(chat_id).await.unwrap().unwrap().daily_spent,
            140.0
        );
    }

    #[tokio::test]
    async fn test_change_last_category_touches_only_last() {
        let chat_id = ChatId(3);
        let (services, _) = services_with_open_chat(chat_id).await;

        assert_eq!(
            services
                .expenses
                .change_last_category(chat_id, ExpenseCategory::Food)
                .await
                .unwrap(),
            None
        );

        for (description, amount) in [("bus", 2.0), ("lunch", 12.0)] {
            services
                .expenses
                .add(chat_id, description, amount)
                .await
                .unwrap()
                .unwrap();
        }
        let changed = services
            .expenses
            .change_last_category(chat_id, ExpenseCategory::Food)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(changed.description, "lunch");

        let expenses = services.expenses.get(chat_id).await.unwrap();
        assert_eq!(expenses[0].category, ExpenseCategory::Other);
        assert_eq!(expenses[1].category, ExpenseCategory::Food);
    }

    #[tokio::test]
    async fn test_category_queries() {
        let chat_id = ChatId(4);
        let (services, _) = services_with_open_chat(chat_id).await;
        for (description, amount, category) in [
            ("bus", 2.0, ExpenseCategory::Transport),
            ("lunch", 12.0, ExpenseCategory::Food),
            ("taxi", 8.0, ExpenseCategory::Transport),
        ] {
            services
                .expenses
                .add(chat_id, description, amount)
                .await
                .unwrap()
                .unwrap();
            services
                .expenses
                .change_last_category(chat_id, category)
                .await
                .unwrap();
        }

        let transport = services
            .expenses
            .by_category(chat_id, ExpenseCategory::Transport)
            .await
            .unwrap();
        assert_eq!(transport.len(), 2);

        let totals = services.expenses.category_totals(chat_id).await.unwrap();
        assert_eq!(totals.get(&ExpenseCategory::Transport), Some(&10.0));
        assert_eq!(totals.get(&ExpenseCategory::Food), Some(&12.0));
        assert_eq!(totals.get(&ExpenseCategory::Other), None);
    }

    #[tokio::test]
    async fn test_remove_forgets_records() {
        let chat_id = ChatId(5);
        let (services, _) = services_with_open_chat(chat_id).await;
        services.incomes.add(chat_id, "salary", 50.0).await.unwrap();
        services.expenses.add(chat_id, "taxi", 8.0).await.unwrap().unwrap();

        services.expenses.remove(chat_id).await.unwrap();
        services.incomes.remove(chat_id).await.unwrap();
        services.balance.remove(chat_id).await.unwrap();

        assert!(services.expenses.get(chat_id).await.unwrap().is_empty());
        assert!(services.incomes.get(chat_id).await.unwrap().is_empty());
        assert_eq!(services.balance.get(chat_id).await.unwrap(), 0.0);
    }
}
