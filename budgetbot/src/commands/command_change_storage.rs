use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    commands::{CHANGE_STORAGE, CommandHandler},
    errors::BotError,
    menus::storage_choice_menu,
    replies,
    services::Services,
    storages::ConversationState,
};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommandChangeStorage;

impl Keyed<String> for CommandChangeStorage {
    fn key(&self) -> String {
        CHANGE_STORAGE.to_string()
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandChangeStorage {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        _args: &str,
    ) -> Result<Vec<Reply>, BotError> {
        services
            .sessions
            .set_state(chat_id, ConversationState::AwaitingStorageChoiceForChange)
            .await?;
        Ok(vec![
            Reply::text(chat_id, replies::CHOOSE_STORAGE).with_buttons(storage_choice_menu()),
        ])
    }
}
