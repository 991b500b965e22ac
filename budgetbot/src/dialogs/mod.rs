//! Handlers selected by the chat's conversation state, one table for plain
//! messages and one for button callbacks

pub mod callback_category_filter;
pub mod callback_expense_category;
pub mod callback_storage_choice;
pub mod message_daily_limit;
pub mod message_records;
pub mod message_remote_handle;

use std::sync::Arc;

use teloxide::types::ChatId;
use yoroolbot::{
    dispatch::{DispatchTable, DuplicateKey, Keyed},
    reply::Reply,
};

use crate::{
    dialogs::{
        callback_category_filter::CallbackCategoryFilter,
        callback_expense_category::CallbackExpenseCategory,
        callback_storage_choice::CallbackStorageChoice, message_daily_limit::MessageDailyLimit,
        message_records::MessageRecords, message_remote_handle::MessageRemoteHandle,
    },
    errors::BotError,
    services::Services,
    storages::ConversationState,
};

#[async_trait::async_trait]
pub trait StateHandler: Keyed<ConversationState> + Send + Sync {
    /// `payload` is the message text or the callback data.
    /// Must leave the chat in its next conversation state before returning.
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        payload: &str,
    ) -> Result<Vec<Reply>, BotError>;
}

pub type StateTable = DispatchTable<ConversationState, dyn StateHandler>;

pub fn message_table() -> Result<StateTable, DuplicateKey> {
    StateTable::builder("messages")
        .register_keyed(Arc::new(MessageRecords))
        .register_keyed(Arc::new(MessageRemoteHandle))
        .register_keyed(Arc::new(MessageDailyLimit))
        .build()
}

pub fn callback_table() -> Result<StateTable, DuplicateKey> {
    StateTable::builder("callbacks")
        .register_keyed(Arc::new(CallbackStorageChoice::initial()))
        .register_keyed(Arc::new(CallbackStorageChoice::for_change()))
        .register_keyed(Arc::new(CallbackExpenseCategory))
        .register_keyed(Arc::new(CallbackCategoryFilter))
        .build()
}
