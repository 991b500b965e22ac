use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    dialogs::StateHandler,
    errors::{BotError, DomainError},
    parser::parse_amount,
    replies,
    services::Services,
    storages::ConversationState,
};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct MessageDailyLimit;

impl Keyed<ConversationState> for MessageDailyLimit {
    fn key(&self) -> ConversationState {
        ConversationState::AwaitingDailyLimit
    }
}

#[async_trait::async_trait]
impl StateHandler for MessageDailyLimit {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        payload: &str,
    ) -> Result<Vec<Reply>, BotError> {
        set_daily_limit(services, chat_id, payload).await
    }
}

/// Set the daily cap from user text. A rejected value keeps the chat waiting for a limit.
pub async fn set_daily_limit(
    services: &Services,
    chat_id: ChatId,
    text: &str,
) -> Result<Vec<Reply>, BotError> {
    let outcome = match parse_amount(text) {
        Ok(cap) => services.limit.add(chat_id, cap).await?,
        Err(error) => Err(error),
    };
    let (text, next) = match outcome {
        Ok(limit) => (
            replies::limit_status(&limit),
            ConversationState::NothingWaiting,
        ),
        // Stored, but today's spending is already over the new cap
        Err(error @ DomainError::LimitExceeded { .. }) => (
            replies::domain_error(&error),
            ConversationState::NothingWaiting,
        ),
        Err(error) => (
            replies::domain_error(&error),
            ConversationState::AwaitingDailyLimit,
        ),
    };
    services.sessions.set_state(chat_id, next).await?;
    Ok(vec![Reply::text(chat_id, text)])
}
