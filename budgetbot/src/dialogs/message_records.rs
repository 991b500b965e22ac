use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    dialogs::StateHandler,
    errors::BotError,
    menus::category_menu,
    parser::{RecordKind, parse_record},
    replies,
    services::Services,
    storages::ConversationState,
};

/// "+ 500 salary" / "- 50 coffee" shorthand. Also receives messages for states
/// without a message handler of their own.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct MessageRecords;

impl Keyed<ConversationState> for MessageRecords {
    fn key(&self) -> ConversationState {
        ConversationState::NothingWaiting
    }
}

#[async_trait::async_trait]
impl StateHandler for MessageRecords {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        payload: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let record = match parse_record(payload) {
            Ok(record) => record,
            Err(error) => {
                services
                    .sessions
                    .set_state(chat_id, ConversationState::NothingWaiting)
                    .await?;
                return Ok(vec![Reply::text(chat_id, replies::domain_error(&error))]);
            }
        };

        match record.kind {
            RecordKind::Income => {
                services
                    .incomes
                    .add(chat_id, &record.description, record.amount)
                    .await?;
                services
                    .sessions
                    .set_state(chat_id, ConversationState::NothingWaiting)
                    .await?;
                Ok(vec![Reply::text(chat_id, replies::INCOME_ADDED)])
            }
            RecordKind::Expense => {
                let mut out = Vec::new();
                // The expense is recorded even when it breaks the daily limit
                if let Err(error) = services
                    .expenses
                    .add(chat_id, &record.description, record.amount)
                    .await?
                {
                    out.push(Reply::text(chat_id, replies::domain_error(&error)));
                }
                out.push(
                    Reply::text(chat_id, replies::CHOOSE_CATEGORY).with_buttons(category_menu()),
                );
                services
                    .sessions
                    .set_state(chat_id, ConversationState::AwaitingExpenseCategory)
                    .await?;
                Ok(out)
            }
        }
    }
}
