use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    commands::{CommandHandler, START},
    errors::BotError,
    menus::storage_choice_menu,
    replies,
    services::Services,
    storages::ConversationState,
};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommandStart;

impl Keyed<String> for CommandStart {
    fn key(&self) -> String {
        START.to_string()
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandStart {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        _args: &str,
    ) -> Result<Vec<Reply>, BotError> {
        if services.sessions.open(chat_id).await {
            log::info!("Chat {}: opened", chat_id);
            services
                .sessions
                .set_state(chat_id, ConversationState::AwaitingStorageChoice)
                .await?;
            return Ok(vec![
                Reply::text(chat_id, replies::WELCOME).with_buttons(storage_choice_menu()),
            ]);
        }
        // An open chat keeps its storage mode and data
        services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await?;
        Ok(vec![Reply::text(chat_id, replies::WELCOME_BACK)])
    }
}
