use std::sync::Arc;

use teloxide::types::ChatId;

use crate::{
    errors::{BotError, RemoteError},
    services::{
        balance::BalanceService, expense::ExpenseService, income::IncomeService,
        limit::LimitService,
    },
    storages::{
        BackendProvider, Balances, ConversationState, Expense, Expenses, Income, Incomes, Limit,
        Limits, REMOTE_SECTIONS, SessionStore, SheetsClient, StorageMode,
    },
};

/// Full financial data of one chat, as read from the source storage
#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    incomes: Vec<Income>,
    expenses: Vec<Expense>,
    balance: f64,
    limit: Option<Limit>,
}

/// What a finished migration moved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MigrationReport {
    pub incomes: usize,
    pub expenses: usize,
}

/// Moves a chat's data between storage modes.
///
/// Migrated records are added to whatever the destination already holds, so a
/// document linked again after a fallback keeps the records written to it before.
///
/// The source is cleared before the destination is written. A remote failure while
/// writing the destination loses the data: the router falls back to local mode and
/// tells the user, no rollback is attempted.
#[derive(Clone)]
pub struct MigrationCoordinator {
    sessions: SessionStore,
    provider: Arc<BackendProvider>,
    sheets: Arc<dyn SheetsClient>,
    incomes: IncomeService,
    expenses: ExpenseService,
    balance: BalanceService,
    limit: LimitService,
}

impl MigrationCoordinator {
    pub fn new(
        sessions: SessionStore,
        provider: Arc<BackendProvider>,
        sheets: Arc<dyn SheetsClient>,
        incomes: IncomeService,
        expenses: ExpenseService,
        balance: BalanceService,
        limit: LimitService,
    ) -> Self {
        Self {
            sessions,
            provider,
            sheets,
            incomes,
            expenses,
            balance,
            limit,
        }
    }

    pub async fn migrate(
        &self,
        chat_id: ChatId,
        from: StorageMode,
        to: StorageMode,
    ) -> Result<MigrationReport, BotError> {
        log::info!("Chat {}: migrating {} -> {}", chat_id, from, to);

        // 1. snapshot through the current adapters
        let snapshot = Snapshot {
            incomes: self.incomes.get(chat_id).await?,
            expenses: self.expenses.get(chat_id).await?,
            balance: self.balance.get(chat_id).await?,
            limit: self.limit.get(chat_id).await?,
        };
        let report = MigrationReport {
            incomes: snapshot.incomes.len(),
            expenses: snapshot.expenses.len(),
        };
        if from == to {
            log::debug!("Chat {}: already in {} mode", chat_id, to);
            return Ok(report);
        }

        // 2. every service resolves to the destination from here on
        self.sessions.set_storage_mode(chat_id, to).await?;

        // 3. a document linked just now gets its missing sections created
        if to == StorageMode::Remote
            && self.sessions.get_state(chat_id).await? == ConversationState::AwaitingRemoteHandle
        {
            let handle = self
                .sessions
                .remote_handle(chat_id)
                .await?
                .ok_or(RemoteError::NotLinked(chat_id))?;
            self.sheets.create_sections(&handle, &REMOTE_SECTIONS).await?;
        }

        // 4. clear the source
        self.provider.for_mode::<Incomes>(from).clear(chat_id).await?;
        self.provider.for_mode::<Expenses>(from).clear(chat_id).await?;
        self.provider.for_mode::<Balances>(from).clear(chat_id).await?;
        self.provider.for_mode::<Limits>(from).clear(chat_id).await?;

        // 5. merge into the destination
        self.incomes.add_batch(chat_id, snapshot.incomes).await?;
        self.expenses.add_batch(chat_id, snapshot.expenses).await?;
        self.balance.add(chat_id, snapshot.balance).await?;
        if snapshot.limit.is_some() {
            self.limit.restore(chat_id, snapshot.limit).await?;
        }

        log::info!(
            "Chat {}: migrated {} incomes and {} expenses to {}",
            chat_id,
            report.incomes,
            report.expenses,
            to
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;
    use crate::services::{Services, test_support::services_with_open_chat};

    async fn fill_local(services: &Services, chat_id: ChatId) {
        services.incomes.add(chat_id, "salary", 500.0).await.unwrap();
        services
            .expenses
            .add(chat_id, "coffee", 4.5)
            .await
            .unwrap()
            .unwrap();
        services
            .limit
            .restore(
                chat_id,
                Some(Limit {
                    daily_cap: 100.0,
                    daily_spent: 4.5,
                    day: Local::now().date_naive(),
                }),
            )
            .await
            .unwrap();
    }

    async fn link_document(services: &Services, chat_id: ChatId, handle: &str) {
        services
            .sessions
            .bind_remote_handle(chat_id, handle.to_string())
            .await
            .unwrap();
        services
            .sessions
            .set_state(chat_id, ConversationState::AwaitingRemoteHandle)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_local_to_remote_moves_everything() {
        let chat_id = ChatId(1);
        let (services, sheets) = services_with_open_chat(chat_id).await;
        fill_local(&services, chat_id).await;
        sheets.share("doc-1").await;
        link_document(&services, chat_id, "doc-1").await;

        let incomes = services.incomes.get(chat_id).await.unwrap();
        let expenses = services.expenses.get(chat_id).await.unwrap();
        let limit = services.limit.get(chat_id).await.unwrap();

        let report = services
            .migration
            .migrate(chat_id, StorageMode::Local, StorageMode::Remote)
            .await
            .unwrap();
        assert_eq!(report.incomes, 1);
        assert_eq!(report.expenses, 1);

        // Reads now go to the spreadsheet
        assert_eq!(
            services.sessions.storage_mode(chat_id).await.unwrap(),
            StorageMode::Remote
        );
        assert_eq!(services.incomes.get(chat_id).await.unwrap(), incomes);
        assert_eq!(services.expenses.get(chat_id).await.unwrap(), expenses);
        assert_eq!(services.balance.get(chat_id).await.unwrap(), 495.5);
        assert_eq!(services.limit.get(chat_id).await.unwrap(), limit);
        assert_eq!(sheets.section("doc-1", "Incomes").await.unwrap().len(), 1);

        // Local data for the chat is gone
        let local = StorageMode::Local;
        let provider = &services.migration.provider;
        assert!(provider.for_mode::<Incomes>(local).read(chat_id).await.unwrap().is_empty());
        assert!(provider.for_mode::<Expenses>(local).read(chat_id).await.unwrap().is_empty());
        assert!(provider.for_mode::<Balances>(local).read(chat_id).await.unwrap().is_empty());
        assert!(provider.for_mode::<Limits>(local).read(chat_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_to_local_moves_back() {
        let chat_id = ChatId(2);
        let (services, sheets) = services_with_open_chat(chat_id).await;
        fill_local(&services, chat_id).await;
        sheets.share("doc-2").await;
        link_document(&services, chat_id, "doc-2").await;
        services
            .migration
            .migrate(chat_id, StorageMode::Local, StorageMode::Remote)
            .await
            .unwrap();
        services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await
            .unwrap();

        services
            .migration
            .migrate(chat_id, StorageMode::Remote, StorageMode::Local)
            .await
            .unwrap();

        assert_eq!(services.incomes.get(chat_id).await.unwrap().len(), 1);
        assert_eq!(services.balance.get(chat_id).await.unwrap(), 495.5);
        assert!(sheets.section("doc-2", "Incomes").await.unwrap().is_empty());
        assert!(sheets.section("doc-2", "Balance").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_destination_failure_after_source_clear_loses_data() {
        let chat_id = ChatId(3);
        let (services, sheets) = services_with_open_chat(chat_id).await;
        fill_local(&services, chat_id).await;
        sheets.share("doc-3").await;
        link_document(&services, chat_id, "doc-3").await;
        // Section creation and the income append succeed, the expense append fails
        sheets.fail_after_writes(2).await;

        let result = services
            .migration
            .migrate(chat_id, StorageMode::Local, StorageMode::Remote)
            .await;
        assert!(matches!(result, Err(BotError::Remote(RemoteError::Io(_)))));

        // Partial destination write, cleared source: the accepted at-most-once window
        assert_eq!(sheets.section("doc-3", "Incomes").await.unwrap().len(), 1);
        assert!(sheets.section("doc-3", "Expenses").await.unwrap().is_empty());
        let local = services.migration.provider.for_mode::<Expenses>(StorageMode::Local);
        assert!(local.read(chat_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unshared_document_fails_before_touching_source() {
        let chat_id = ChatId(4);
        let (services, _sheets) = services_with_open_chat(chat_id).await;
        fill_local(&services, chat_id).await;
        link_document(&services, chat_id, "never-shared").await;

        let result = services
            .migration
            .migrate(chat_id, StorageMode::Local, StorageMode::Remote)
            .await;
        assert_eq!(
            result,
            Err(BotError::Remote(RemoteError::NotAccessible(
                "never-shared".to_string()
            )))
        );

        let local = services.migration.provider.for_mode::<Incomes>(StorageMode::Local);
        assert_eq!(local.read(chat_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_mode_is_a_no_op() {
        let chat_id = ChatId(5);
        let (services, _sheets) = services_with_open_chat(chat_id).await;
        fill_local(&services, chat_id).await;

        let report = services
            .migration
            .migrate(chat_id, StorageMode::Local, StorageMode::Local)
            .await
            .unwrap();
        assert_eq!(report.incomes, 1);
        assert_eq!(services.incomes.get(chat_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_relinked_document_keeps_its_records() {
        let chat_id = ChatId(6);
        let (services, sheets) = services_with_open_chat(chat_id).await;
        sheets.share("doc-6").await;
        link_document(&services, chat_id, "doc-6").await;
        services
            .migration
            .migrate(chat_id, StorageMode::Local, StorageMode::Remote)
            .await
            .unwrap();
        services.incomes.add(chat_id, "salary", 100.0).await.unwrap();

        // Back to local without moving the data, then the same document again
        services
            .sessions
            .set_storage_mode(chat_id, StorageMode::Local)
            .await
            .unwrap();
        services.incomes.add(chat_id, "tip", 5.0).await.unwrap();
        link_document(&services, chat_id, "doc-6").await;
        let report = services
            .migration
            .migrate(chat_id, StorageMode::Local, StorageMode::Remote)
            .await
            .unwrap();
        assert_eq!(report.incomes, 1);

        let incomes = services.incomes.get(chat_id).await.unwrap();
        let descriptions: Vec<_> = incomes.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(descriptions, vec!["salary", "tip"]);
        assert_eq!(services.balance.get(chat_id).await.unwrap(), 105.0);
    }
}
