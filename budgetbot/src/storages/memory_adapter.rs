use std::{collections::HashMap, sync::Arc};

use teloxide::types::ChatId;
use tokio::sync::Mutex;

use crate::{
    errors::BotError,
    storages::adapter::{EntityAdapter, EntityKind},
};

type MemoryAdapterData<T> = Arc<Mutex<HashMap<ChatId, Vec<T>>>>;

/// Per-chat in-memory storage - each chat has its own item list
pub struct MemoryAdapter<K: EntityKind> {
    data: MemoryAdapterData<K::Item>,
}

impl<K: EntityKind> MemoryAdapter<K> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K: EntityKind> Default for MemoryAdapter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKind> Clone for MemoryAdapter<K> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

#[async_trait::async_trait]
impl<K: EntityKind> EntityAdapter<K> for MemoryAdapter<K> {
    async fn read(&self, chat_id: ChatId) -> Result<Vec<K::Item>, BotError> {
        let storage_guard = self.data.lock().await;
        Ok(storage_guard.get(&chat_id).cloned().unwrap_or_default())
    }

    async fn append(&self, chat_id: ChatId, items: Vec<K::Item>) -> Result<(), BotError> {
        let mut storage_guard = self.data.lock().await;
        storage_guard.entry(chat_id).or_default().extend(items);
        Ok(())
    }

    async fn overwrite(&self, chat_id: ChatId, items: Vec<K::Item>) -> Result<(), BotError> {
        let mut storage_guard = self.data.lock().await;
        if items.is_empty() {
            storage_guard.remove(&chat_id);
        } else {
            storage_guard.insert(chat_id, items);
        }
        Ok(())
    }

    async fn clear(&self, chat_id: ChatId) -> Result<(), BotError> {
        let mut storage_guard = self.data.lock().await;
        storage_guard.remove(&chat_id);
        Ok(())
    }
}
