use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    dialogs::StateHandler,
    errors::BotError,
    menus::parse_category_data,
    replies,
    services::Services,
    storages::ConversationState,
};

/// Category button shown after an expense was added
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CallbackExpenseCategory;

impl Keyed<ConversationState> for CallbackExpenseCategory {
    fn key(&self) -> ConversationState {
        ConversationState::AwaitingExpenseCategory
    }
}

#[async_trait::async_trait]
impl StateHandler for CallbackExpenseCategory {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        payload: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let Some(category) = parse_category_data(payload) else {
            services
                .sessions
                .set_state(chat_id, ConversationState::AwaitingExpenseCategory)
                .await?;
            return Ok(vec![Reply::text(chat_id, replies::STALE_BUTTON)]);
        };
        let text = match services
            .expenses
            .change_last_category(chat_id, category)
            .await?
        {
            Some(_) => replies::CATEGORY_CHANGED,
            None => replies::NO_EXPENSE_TO_CATEGORIZE,
        };
        services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await?;
        Ok(vec![Reply::text(chat_id, text)])
    }
}
