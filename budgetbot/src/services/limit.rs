use chrono::{Local, NaiveDate};
use teloxide::types::ChatId;

use crate::{
    errors::{BotError, DomainError, Outcome},
    services::store::Store,
    storages::{Limit, Limits},
};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Optional daily spending cap of a chat
#[derive(Clone)]
pub struct LimitService {
    store: Store<Limits>,
}

impl LimitService {
    pub fn new(store: Store<Limits>) -> Self {
        Self { store }
    }

    /// The configured limit as seen today
    pub async fn get(&self, chat_id: ChatId) -> Result<Option<Limit>, BotError> {
        let stored = self.store.get(chat_id).await?.pop();
        Ok(stored.map(|limit| limit.on(today())))
    }

    /// Configure the daily cap. Spending already counted today is kept.
    /// The cap is stored even when today's spending already exceeds it.
    pub async fn add(&self, chat_id: ChatId, daily_cap: f64) -> Outcome<Limit> {
        if !daily_cap.is_finite() || daily_cap <= 0.0 {
            return Ok(Err(DomainError::NonPositiveLimit));
        }
        let daily_spent = self
            .get(chat_id)
            .await?
            .map(|limit| limit.daily_spent)
            .unwrap_or(0.0);
        let limit = Limit {
            daily_cap,
            daily_spent,
            day: today(),
        };
        self.store.overwrite(chat_id, vec![limit.clone()]).await?;
        Ok(check(limit))
    }

    /// Count an expense against today's spending. `Ok(Ok(None))` when no limit is set.
    pub async fn record_spending(&self, chat_id: ChatId, amount: f64) -> Outcome<Option<Limit>> {
        let Some(mut limit) = self.get(chat_id).await? else {
            return Ok(Ok(None));
        };
        limit.daily_spent += amount;
        self.store.overwrite(chat_id, vec![limit.clone()]).await?;
        Ok(check(limit).map(Some))
    }

    /// Batch form of `add` used by migration: writes the migrated limit as is
    pub async fn restore(&self, chat_id: ChatId, limit: Option<Limit>) -> Result<(), BotError> {
        match limit {
            Some(limit) => self.store.overwrite(chat_id, vec![limit]).await,
            None => self.store.remove(chat_id).await,
        }
    }

    pub async fn remove(&self, chat_id: ChatId) -> Result<(), BotError> {
        self.store.remove(chat_id).await
    }
}

fn check(limit: Limit) -> Result<Limit, DomainError> {
    if limit.is_exceeded() {
        Err(DomainError::LimitExceeded {
            spent: limit.daily_spent,
            cap: limit.daily_cap,
        })
    } else {
        Ok(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::services_with_open_chat;

    #[tokio::test]
    async fn test_non_positive_cap_is_rejected() {
        let chat_id = ChatId(1);
        let (services, _) = services_with_open_chat(chat_id).await;

        for cap in [0.0, -5.0, f64::NAN] {
            assert_eq!(
                services.limit.add(chat_id, cap).await.unwrap(),
                Err(DomainError::NonPositiveLimit)
            );
        }
        assert_eq!(services.limit.get(chat_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_spending_without_limit_is_ignored() {
        let chat_id = ChatId(2);
        let (services, _) = services_with_open_chat(chat_id).await;

        assert_eq!(
            services.limit.record_spending(chat_id, 10.0).await.unwrap(),
            Ok(None)
        );
        assert_eq!(services.limit.get(chat_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_new_cap_keeps_todays_spending() {
        let chat_id = ChatId(3);
        let (services, _) = services_with_open_chat(chat_id).await;

        services.limit.add(chat_id, 100.0).await.unwrap().unwrap();
        services
            .limit
            .record_spending(chat_id, 60.0)
            .await
            .unwrap()
            .unwrap();

        // Lowering the cap below what was spent is stored and reported
        assert_eq!(
            services.limit.add(chat_id, 50.0).await.unwrap(),
            Err(DomainError::LimitExceeded {
                spent: 60.0,
                cap: 50.0
            })
        );
        let limit = services.limit.get(chat_id).await.unwrap().unwrap();
        assert_eq!(limit.daily_cap, 50.0);
        assert_eq!(limit.daily_spent, 60.0);

        services.limit.remove(chat_id).await.unwrap();
        assert_eq!(services.limit.get(chat_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_stale_day_starts_from_zero() {
        let chat_id = ChatId(4);
        let (services, _) = services_with_open_chat(chat_id).await;
        services
            .limit
            .restore(
                chat_id,
                Some(Limit {
                    daily_cap: 100.0,
                    daily_spent: 99.0,
                    day: today().pred_opt().unwrap(),
                }),
            )
            .await
            .unwrap();

        let limit = services
            .limit
            .record_spending(chat_id, 10.0)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(limit.daily_spent, 10.0);
        assert_eq!(limit.day, today());
    }
}
