use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    commands::{CommandHandler, DELETE_LIMIT, LIMIT},
    dialogs::message_daily_limit::set_daily_limit,
    errors::BotError,
    replies,
    services::Services,
    storages::ConversationState,
};

/// `/limit` shows the current limit and asks for a new one, `/limit 150` sets it at once
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommandLimit;

impl Keyed<String> for CommandLimit {
    fn key(&self) -> String {
        LIMIT.to_string()
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandLimit {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        args: &str,
    ) -> Result<Vec<Reply>, BotError> {
        if !args.is_empty() {
            return set_daily_limit(services, chat_id, args).await;
        }
        let status = match services.limit.get(chat_id).await? {
            Some(limit) => replies::limit_status(&limit),
            None => replies::NO_LIMIT.to_string(),
        };
        services
            .sessions
            .set_state(chat_id, ConversationState::AwaitingDailyLimit)
            .await?;
        Ok(vec![
            Reply::text(chat_id, status),
            Reply::text(chat_id, replies::ASK_DAILY_LIMIT),
        ])
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommandDeleteLimit;

impl Keyed<String> for CommandDeleteLimit {
    fn key(&self) -> String {
        DELETE_LIMIT.to_string()
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandDeleteLimit {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        _args: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let text = if services.limit.get(chat_id).await?.is_some() {
            services.limit.remove(chat_id).await?;
            replies::LIMIT_DELETED
        } else {
            replies::NO_LIMIT
        };
        services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await?;
        Ok(vec![Reply::text(chat_id, text)])
    }
}
