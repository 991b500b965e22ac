use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    commands::{BALANCE, CommandHandler},
    errors::BotError,
    replies,
    services::Services,
    storages::ConversationState,
};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommandBalance;

impl Keyed<String> for CommandBalance {
    fn key(&self) -> String {
        BALANCE.to_string()
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandBalance {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        _args: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let balance = services.balance.get(chat_id).await?;
        services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await?;
        Ok(vec![Reply::text(chat_id, replies::balance(balance))])
    }
}
