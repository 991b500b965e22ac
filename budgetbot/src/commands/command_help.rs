use teloxide::{types::ChatId, utils::command::BotCommands};
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    commands::{Command, CommandHandler, HELP},
    errors::BotError,
    replies,
    services::Services,
    storages::ConversationState,
};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommandHelp;

impl Keyed<String> for CommandHelp {
    fn key(&self) -> String {
        HELP.to_string()
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandHelp {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        _args: &str,
    ) -> Result<Vec<Reply>, BotError> {
        services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await?;
        let help = format!("{}\n\n{}", Command::descriptions(), replies::RECORDS_HELP);
        Ok(vec![Reply::text(chat_id, help)])
    }
}
