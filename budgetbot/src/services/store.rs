use std::{marker::PhantomData, sync::Arc};

use teloxide::types::ChatId;

use crate::{
    errors::BotError,
    storages::{BackendProvider, EntityKind},
};

/// Generic service over one entity kind. The adapter is resolved on every call,
/// so a storage mode switch is picked up by the very next operation.
pub struct Store<K: EntityKind> {
    provider: Arc<BackendProvider>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: EntityKind> Clone for Store<K> {
    fn clone(&self) -> Self {
        Self::new(self.provider.clone())
    }
}

impl<K: EntityKind> Store<K> {
    pub fn new(provider: Arc<BackendProvider>) -> Self {
        Self {
            provider,
            _kind: PhantomData,
        }
    }

    pub async fn get(&self, chat_id: ChatId) -> Result<Vec<K::Item>, BotError> {
        self.provider.resolve::<K>(chat_id).await?.read(chat_id).await
    }

    pub async fn add(&self, chat_id: ChatId, item: K::Item) -> Result<(), BotError> {
        self.add_batch(chat_id, vec![item]).await
    }

    pub async fn add_batch(&self, chat_id: ChatId, items: Vec<K::Item>) -> Result<(), BotError> {
        self.provider
            .resolve::<K>(chat_id)
            .await?
            .append(chat_id, items)
            .await
    }

    pub async fn overwrite(&self, chat_id: ChatId, items: Vec<K::Item>) -> Result<(), BotError> {
        self.provider
            .resolve::<K>(chat_id)
            .await?
            .overwrite(chat_id, items)
            .await
    }

    pub async fn remove(&self, chat_id: ChatId) -> Result<(), BotError> {
        self.provider.resolve::<K>(chat_id).await?.clear(chat_id).await
    }
}
