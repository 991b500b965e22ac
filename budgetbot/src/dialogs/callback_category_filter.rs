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

/// Category button shown by /expenses_by_category
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CallbackCategoryFilter;

impl Keyed<ConversationState> for CallbackCategoryFilter {
    fn key(&self) -> ConversationState {
        ConversationState::AwaitingExpenseCategoryFilter
    }
}

#[async_trait::async_trait]
impl StateHandler for CallbackCategoryFilter {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        payload: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let Some(category) = parse_category_data(payload) else {
            services
                .sessions
                .set_state(chat_id, ConversationState::AwaitingExpenseCategoryFilter)
                .await?;
            return Ok(vec![Reply::text(chat_id, replies::STALE_BUTTON)]);
        };
        let expenses = services.expenses.by_category(chat_id, category).await?;
        let text = if expenses.is_empty() {
            replies::no_expenses_in(&category)
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
