use std::sync::Arc;

use teloxide::types::ChatId;

use crate::{
    errors::BotError,
    storages::{
        adapter::{AdapterSet, EntityAdapter, EntityKind},
        session_storage::{SessionStore, StorageMode},
    },
};

/// Resolves, per chat and entity kind, the adapter of the chat's current storage mode.
/// Nothing is cached: the mode is read from the session on every call.
pub struct BackendProvider {
    sessions: SessionStore,
    local: AdapterSet,
    remote: AdapterSet,
}

impl BackendProvider {
    pub fn new(sessions: SessionStore, local: AdapterSet, remote: AdapterSet) -> Self {
        Self {
            sessions,
            local,
            remote,
        }
    }

    pub async fn resolve<K: EntityKind>(
        &self,
        chat_id: ChatId,
    ) -> Result<Arc<dyn EntityAdapter<K>>, BotError> {
        let mode = self.sessions.storage_mode(chat_id).await?;
        Ok(self.for_mode::<K>(mode))
    }

    pub fn for_mode<K: EntityKind>(&self, mode: StorageMode) -> Arc<dyn EntityAdapter<K>> {
        match mode {
            StorageMode::Local => K::select(&self.local),
            StorageMode::Remote => K::select(&self.remote),
        }
    }
}
