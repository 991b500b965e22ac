use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    commands::{CATEGORY_TOTALS, CommandHandler, EXPENSES_BY_CATEGORY},
    errors::BotError,
    menus::category_menu,
    replies,
    services::Services,
    storages::ConversationState,
};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommandExpensesByCategory;

impl Keyed<String> for CommandExpensesByCategory {
    fn key(&self) -> String {
        EXPENSES_BY_CATEGORY.to_string()
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandExpensesByCategory {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        _args: &str,
    ) -> Result<Vec<Reply>, BotError> {
        services
            .sessions
            .set_state(chat_id, ConversationState::AwaitingExpenseCategoryFilter)
            .await?;
        Ok(vec![
            Reply::text(chat_id, replies::CHOOSE_FILTER_CATEGORY).with_buttons(category_menu()),
        ])
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct CommandCategoryTotals;

impl Keyed<String> for CommandCategoryTotals {
    fn key(&self) -> String {
        CATEGORY_TOTALS.to_string()
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandCategoryTotals {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        _args: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let totals = services.expenses.category_totals(chat_id).await?;
        let text = if totals.is_empty() {
            replies::NO_EXPENSES.to_string()
        } else {
            totals
                .iter()
                .map(|(category, total)| {
                    format!("{}: {}", category.label(), replies::format_amount(*total))
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await?;
        Ok(vec![Reply::text(chat_id, text)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::test_support::services_with_open_chat, storages::ExpenseCategory};

    #[tokio::test]
    async fn test_totals_per_category() {
        let chat_id = ChatId(1);
        let (services, _sheets) = services_with_open_chat(chat_id).await;
        for (description, amount, category) in [
            ("bus", 2.0, ExpenseCategory::Transport),
            ("taxi", 15.0, ExpenseCategory::Transport),
            ("pizza", 9.5, ExpenseCategory::Food),
        ] {
            services
                .expenses
                .add(chat_id, description, amount)
                .await
                .unwrap()
                .unwrap();
            services
                .expenses
                .change_last_category(chat_id, category)
                .await
                .unwrap();
        }

        let replies = CommandCategoryTotals
            .handle(&services, chat_id, "")
            .await
            .unwrap();
        let text = &replies[0].text;
        assert!(text.contains(&format!("{}: 17", ExpenseCategory::Transport.label())));
        assert!(text.contains(&format!("{}: 9.50", ExpenseCategory::Food.label())));
        assert!(!text.contains(ExpenseCategory::Health.label()));
    }
}
