use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    dialogs::StateHandler,
    errors::BotError,
    replies,
    services::Services,
    storages::{ConversationState, StorageMode},
};

/// Receives the id of the spreadsheet the chat's records move to
#[derive(Default, Debug, Clone, PartialEq)]
pub struct MessageRemoteHandle;

impl Keyed<ConversationState> for MessageRemoteHandle {
    fn key(&self) -> ConversationState {
        ConversationState::AwaitingRemoteHandle
    }
}

#[async_trait::async_trait]
impl StateHandler for MessageRemoteHandle {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        payload: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let handle = payload.trim();
        if handle.is_empty() || handle.contains(char::is_whitespace) {
            services
                .sessions
                .set_state(chat_id, ConversationState::AwaitingRemoteHandle)
                .await?;
            return Ok(vec![Reply::text(chat_id, replies::ASK_REMOTE_HANDLE)]);
        }

        let previous = services.sessions.remote_handle(chat_id).await?;
        if previous.as_deref() == Some(handle) {
            log::info!("Chat {}: linking document {} again", chat_id, handle);
        }
        services
            .sessions
            .bind_remote_handle(chat_id, handle.to_string())
            .await?;
        let current = services.sessions.storage_mode(chat_id).await?;
        // Runs while still in AwaitingRemoteHandle so the document gets its missing sections
        services
            .migration
            .migrate(chat_id, current, StorageMode::Remote)
            .await?;
        services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await?;
        Ok(vec![Reply::text(chat_id, replies::REMOTE_SELECTED)])
    }
}
