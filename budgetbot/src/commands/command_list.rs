use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    commands::{CommandHandler, LIST_EXPENSES, LIST_INCOMES},
    errors::BotError,
    replies,
    services::Services,
    storages::ConversationState,
};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommandListExpenses;

impl Keyed<String> for CommandListExpenses {
    fn key(&self) -> String {
        LIST_EXPENSES.to_string()
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandListExpenses {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        _args: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let expenses = services.expenses.get(chat_id).await?;
        let text = if expenses.is_empty() {
            replies::NO_EXPENSES.to_string()
        } else {
            replies::format_expenses(&expenses)
        };
        services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await?;
        Ok(vec![Reply::text(chat_id, text)])
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommandListIncomes;

impl Keyed<String> for CommandListIncomes {
    fn key(&self) -> String {
        LIST_INCOMES.to_string()
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandListIncomes {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        _args: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let incomes = services.incomes.get(chat_id).await?;
        let text = if incomes.is_empty() {
            replies::NO_INCOMES.to_string()
        } else {
            replies::format_incomes(&incomes)
        };
        services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await?;
        Ok(vec![Reply::text(chat_id, text)])
    }
}
