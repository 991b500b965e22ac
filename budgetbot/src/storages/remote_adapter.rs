use std::{marker::PhantomData, sync::Arc};

use teloxide::types::ChatId;

use crate::{
    errors::{BotError, RemoteError},
    storages::{
        adapter::{EntityAdapter, EntityKind},
        records::SheetRow,
        session_storage::SessionStore,
        sheets_client::{Rows, SheetsClient},
    },
};

/// Stores one entity kind in its section of the chat's linked spreadsheet
pub struct RemoteAdapter<K: EntityKind> {
    client: Arc<dyn SheetsClient>,
    sessions: SessionStore,
    _kind: PhantomData<fn() -> K>,
}

impl<K: EntityKind> RemoteAdapter<K> {
    pub fn new(client: Arc<dyn SheetsClient>, sessions: SessionStore) -> Self {
        Self {
            client,
            sessions,
            _kind: PhantomData,
        }
    }

    /// The document linked to the chat
    async fn handle(&self, chat_id: ChatId) -> Result<String, BotError> {
        self.sessions
            .remote_handle(chat_id)
            .await?
            .ok_or(BotError::Remote(RemoteError::NotLinked(chat_id)))
    }

    fn encode(items: &[K::Item]) -> Rows {
        items.iter().map(SheetRow::to_row).collect()
    }
}

#[async_trait::async_trait]
impl<K: EntityKind> EntityAdapter<K> for RemoteAdapter<K> {
    async fn read(&self, chat_id: ChatId) -> Result<Vec<K::Item>, BotError> {
        let handle = self.handle(chat_id).await?;
        let rows = self.client.read(&handle, K::SECTION).await?;
        rows.iter()
            // Blank rows are left behind by manual edits of the sheet
            .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
            .map(|row| {
                K::Item::from_row(row).map_err(|reason| {
                    BotError::Remote(RemoteError::MalformedRow {
                        section: K::SECTION.to_string(),
                        reason,
                    })
                })
            })
            .collect()
    }

    async fn append(&self, chat_id: ChatId, items: Vec<K::Item>) -> Result<(), BotError> {
        if items.is_empty() {
            return Ok(());
        }
        let handle = self.handle(chat_id).await?;
        self.client
            .append(&handle, K::SECTION, Self::encode(&items))
            .await?;
        Ok(())
    }

    async fn overwrite(&self, chat_id: ChatId, items: Vec<K::Item>) -> Result<(), BotError> {
        let handle = self.handle(chat_id).await?;
        self.client
            .update(&handle, K::SECTION, Self::encode(&items))
            .await?;
        Ok(())
    }

    async fn clear(&self, chat_id: ChatId) -> Result<(), BotError> {
        let handle = self.handle(chat_id).await?;
        self.client.clear(&handle, K::SECTION).await?;
        Ok(())
    }
}
