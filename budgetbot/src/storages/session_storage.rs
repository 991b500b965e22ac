use std::{collections::HashMap, fmt::Display, str::FromStr, sync::Arc};

use teloxide::types::ChatId;
use tokio::sync::Mutex;

use crate::errors::SessionError;

/// Where a chat keeps its financial records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageMode {
    /// In-process, volatile
    #[default]
    Local,
    /// External spreadsheet document
    Remote,
}

impl Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::Local => write!(f, "LOCAL"),
            StorageMode::Remote => write!(f, "REMOTE"),
        }
    }
}

impl FromStr for StorageMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOCAL" => Ok(StorageMode::Local),
            "REMOTE" => Ok(StorageMode::Remote),
            _ => Err(()),
        }
    }
}

/// Gates which message/callback handler receives the next input of a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationState {
    AwaitingStorageChoice,
    NothingWaiting,
    AwaitingStorageChoiceForChange,
    AwaitingRemoteHandle,
    AwaitingExpenseCategory,
    AwaitingExpenseCategoryFilter,
    AwaitingDailyLimit,
}

/// Per-chat conversation data
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub chat_id: ChatId,
    pub storage_mode: StorageMode,
    pub state: ConversationState,
    pub remote_handle: Option<String>,
}

impl Session {
    /// Fresh session as created by /start
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            storage_mode: StorageMode::Local,
            state: ConversationState::AwaitingStorageChoice,
            remote_handle: None,
        }
    }
}

type SessionUpdate = Box<dyn FnOnce(&mut Session) + Send>;

/// Keyed session container
#[async_trait::async_trait]
pub trait SessionStorageTrait: Send + Sync {
    /// Get the session of a chat
    async fn get(&self, chat_id: ChatId) -> Option<Session>;

    /// Insert or replace a session
    async fn put(&self, session: Session);

    /// Modify an existing session in place, returning the updated copy
    async fn update(&self, chat_id: ChatId, update: SessionUpdate) -> Option<Session>;
}

/// In-memory sessions, one entry per opened chat
#[derive(Clone, Default)]
pub struct SessionStorage {
    data: Arc<Mutex<HashMap<ChatId, Session>>>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStorageTrait for SessionStorage {
    async fn get(&self, chat_id: ChatId) -> Option<Session> {
        let storage_guard = self.data.lock().await;
        storage_guard.get(&chat_id).cloned()
    }

    async fn put(&self, session: Session) {
        let mut storage_guard = self.data.lock().await;
        storage_guard.insert(session.chat_id, session);
    }

    async fn update(&self, chat_id: ChatId, update: SessionUpdate) -> Option<Session> {
        let mut storage_guard = self.data.lock().await;
        let session = storage_guard.get_mut(&chat_id)?;
        update(session);
        Some(session.clone())
    }
}

/// Conversation state machine on top of the session container
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorageTrait>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorageTrait>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(SessionStorage::new()))
    }

    /// Open the chat. Returns false if it was already open.
    pub async fn open(&self, chat_id: ChatId) -> bool {
        if self.storage.get(chat_id).await.is_some() {
            return false;
        }
        log::info!("Opening session for chat {}", chat_id);
        self.storage.put(Session::new(chat_id)).await;
        true
    }

    pub async fn is_open(&self, chat_id: ChatId) -> bool {
        self.storage.get(chat_id).await.is_some()
    }

    pub async fn get(&self, chat_id: ChatId) -> Result<Session, SessionError> {
        self.storage
            .get(chat_id)
            .await
            .ok_or(SessionError::NotFound(chat_id))
    }

    pub async fn get_state(&self, chat_id: ChatId) -> Result<ConversationState, SessionError> {
        Ok(self.get(chat_id).await?.state)
    }

    pub async fn set_state(
        &self,
        chat_id: ChatId,
        state: ConversationState,
    ) -> Result<(), SessionError> {
        self.modify(chat_id, move |s| s.state = state).await?;
        Ok(())
    }

    pub async fn storage_mode(&self, chat_id: ChatId) -> Result<StorageMode, SessionError> {
        Ok(self.get(chat_id).await?.storage_mode)
    }

    pub async fn set_storage_mode(
        &self,
        chat_id: ChatId,
        mode: StorageMode,
    ) -> Result<(), SessionError> {
        log::info!("Chat {} switches storage mode to {}", chat_id, mode);
        self.modify(chat_id, move |s| s.storage_mode = mode).await?;
        Ok(())
    }

    pub async fn remote_handle(&self, chat_id: ChatId) -> Result<Option<String>, SessionError> {
        Ok(self.get(chat_id).await?.remote_handle)
    }

    pub async fn bind_remote_handle(
        &self,
        chat_id: ChatId,
        handle: String,
    ) -> Result<(), SessionError> {
        self.modify(chat_id, move |s| s.remote_handle = Some(handle))
            .await?;
        Ok(())
    }

    async fn modify(
        &self,
        chat_id: ChatId,
        update: impl FnOnce(&mut Session) + Send + 'static,
    ) -> Result<Session, SessionError> {
        self.storage
            .update(chat_id, Box::new(update))
            .await
            .ok_or(SessionError::NotFound(chat_id))
    }
}
