use teloxide::types::ChatId;
use yoroolbot::{dispatch::Keyed, reply::Reply};

use crate::{
    dialogs::StateHandler,
    errors::BotError,
    menus::parse_storage_data,
    replies,
    services::Services,
    storages::{ConversationState, StorageMode},
};

/// Storage menu button, pressed right after /start or after /change_storage
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackStorageChoice {
    state: ConversationState,
}

impl CallbackStorageChoice {
    /// First choice of a newly opened chat: nothing to migrate yet
    pub fn initial() -> Self {
        Self {
            state: ConversationState::AwaitingStorageChoice,
        }
    }

    pub fn for_change() -> Self {
        Self {
            state: ConversationState::AwaitingStorageChoiceForChange,
        }
    }

    async fn choose(
        &self,
        services: &Services,
        chat_id: ChatId,
        mode: StorageMode,
    ) -> Result<(&'static str, ConversationState), BotError> {
        let current = services.sessions.storage_mode(chat_id).await?;
        let changing = self.state == ConversationState::AwaitingStorageChoiceForChange;
        Ok(match mode {
            _ if changing && mode == current => {
                (replies::ALREADY_IN_MODE, ConversationState::NothingWaiting)
            }
            // The document id arrives in the next message
            StorageMode::Remote => (
                replies::ASK_REMOTE_HANDLE,
                ConversationState::AwaitingRemoteHandle,
            ),
            StorageMode::Local if current == StorageMode::Remote => {
                services.migration.migrate(chat_id, current, mode).await?;
                (replies::MOVED_TO_LOCAL, ConversationState::NothingWaiting)
            }
            StorageMode::Local => {
                services.sessions.set_storage_mode(chat_id, mode).await?;
                (replies::LOCAL_SELECTED, ConversationState::NothingWaiting)
            }
        })
    }
}

impl Keyed<ConversationState> for CallbackStorageChoice {
    fn key(&self) -> ConversationState {
        self.state
    }
}

#[async_trait::async_trait]
impl StateHandler for CallbackStorageChoice {
    async fn handle(
        &self,
        services: &Services,
        chat_id: ChatId,
        payload: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let (text, next) = match parse_storage_data(payload) {
            Some(mode) => self.choose(services, chat_id, mode).await?,
            None => (replies::STALE_BUTTON, self.state),
        };
        services.sessions.set_state(chat_id, next).await?;
        Ok(vec![Reply::text(chat_id, text)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{menus::storage_data, services::test_support::services_with_open_chat};

    #[tokio::test]
    async fn test_initial_local_choice() {
        let chat_id = ChatId(1);
        let (services, _sheets) = services_with_open_chat(chat_id).await;

        let replies = CallbackStorageChoice::initial()
            .handle(&services, chat_id, &storage_data(StorageMode::Local))
            .await
            .unwrap();
        assert_eq!(replies[0].text, replies::LOCAL_SELECTED);
        assert_eq!(
            services.sessions.get_state(chat_id).await.unwrap(),
            ConversationState::NothingWaiting
        );
    }

    #[tokio::test]
    async fn test_remote_choice_asks_for_document() {
        let chat_id = ChatId(2);
        let (services, _sheets) = services_with_open_chat(chat_id).await;

        let replies = CallbackStorageChoice::initial()
            .handle(&services, chat_id, &storage_data(StorageMode::Remote))
            .await
            .unwrap();
        assert_eq!(replies[0].text, replies::ASK_REMOTE_HANDLE);
        assert_eq!(
            services.sessions.get_state(chat_id).await.unwrap(),
            ConversationState::AwaitingRemoteHandle
        );
        // Mode only flips once the document is linked
        assert_eq!(
            services.sessions.storage_mode(chat_id).await.unwrap(),
            StorageMode::Local
        );
    }

    #[tokio::test]
    async fn test_change_to_current_mode() {
        let chat_id = ChatId(3);
        let (services, _sheets) = services_with_open_chat(chat_id).await;

        let replies = CallbackStorageChoice::for_change()
            .handle(&services, chat_id, &storage_data(StorageMode::Local))
            .await
            .unwrap();
        assert_eq!(replies[0].text, replies::ALREADY_IN_MODE);
    }

    #[tokio::test]
    async fn test_change_back_to_local_migrates() {
        let chat_id = ChatId(4);
        let (services, sheets) = services_with_open_chat(chat_id).await;
        sheets.share("doc").await;
        services.incomes.add(chat_id, "salary", 500.0).await.unwrap();
        services
            .sessions
            .bind_remote_handle(chat_id, "doc".to_string())
            .await
            .unwrap();
        services
            .sessions
            .set_state(chat_id, ConversationState::AwaitingRemoteHandle)
            .await
            .unwrap();
        services
            .migration
            .migrate(chat_id, StorageMode::Local, StorageMode::Remote)
            .await
            .unwrap();

        let replies = CallbackStorageChoice::for_change()
            .handle(&services, chat_id, &storage_data(StorageMode::Local))
            .await
            .unwrap();
        assert_eq!(replies[0].text, replies::MOVED_TO_LOCAL);
        assert_eq!(
            services.sessions.storage_mode(chat_id).await.unwrap(),
            StorageMode::Local
        );
        assert_eq!(services.balance.get(chat_id).await.unwrap(), 500.0);
        assert!(sheets.section("doc", "Incomes").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_button_is_stale() {
        let chat_id = ChatId(5);
        let (services, _sheets) = services_with_open_chat(chat_id).await;

        let replies = CallbackStorageChoice::initial()
            .handle(&services, chat_id, "category:FOOD")
            .await
            .unwrap();
        assert_eq!(replies[0].text, replies::STALE_BUTTON);
        assert_eq!(
            services.sessions.get_state(chat_id).await.unwrap(),
            ConversationState::AwaitingStorageChoice
        );
    }
}
