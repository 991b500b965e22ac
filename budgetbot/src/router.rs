//! Entry point for every inbound event: gating, dispatch and the error boundary

use teloxide::{types::ChatId, utils::command::ParseError};
use yoroolbot::{dispatch::DuplicateKey, reply::Reply};

use crate::{
    commands::{Command, CommandTable, command_table},
    dialogs::{StateTable, callback_table, message_table},
    errors::BotError,
    parser::parse_command,
    replies,
    services::Services,
    storages::{ConversationState, Storage, StorageMode},
};

/// What the transport delivers for one update
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// A text message; commands are told apart by their prefix
    Text { chat_id: ChatId, text: String },
    /// An inline button press with its callback data
    Callback { chat_id: ChatId, data: String },
}

impl InboundEvent {
    pub fn chat_id(&self) -> ChatId {
        match self {
            InboundEvent::Text { chat_id, .. } | InboundEvent::Callback { chat_id, .. } => *chat_id,
        }
    }
}

pub struct Router {
    /// Username of the bot, commands addressed to other bots are ignored
    bot_name: String,
    services: Services,
    commands: CommandTable,
    messages: StateTable,
    callbacks: StateTable,
}

impl Router {
    /// Fails when two handlers claim the same key in one of the tables
    pub fn new(storage: &Storage, bot_name: impl Into<String>) -> Result<Self, DuplicateKey> {
        Ok(Self {
            bot_name: bot_name.into(),
            services: Services::new(storage),
            commands: command_table()?,
            messages: message_table()?,
            callbacks: callback_table()?,
        })
    }

    /// Handle one event to completion. Every event gets at least one reply,
    /// except commands addressed to another bot.
    pub async fn route(&self, event: InboundEvent) -> Vec<Reply> {
        let chat_id = event.chat_id();
        match self.dispatch(&event).await {
            Ok(replies) => replies,
            Err(error) => self.recover(chat_id, error).await,
        }
    }

    async fn dispatch(&self, event: &InboundEvent) -> Result<Vec<Reply>, BotError> {
        let chat_id = event.chat_id();
        let command = match event {
            InboundEvent::Text { text, .. } => parse_command(text, &self.bot_name),
            InboundEvent::Callback { .. } => None,
        };

        if let Some(Err(ParseError::WrongBotName(name))) = &command {
            log::debug!("Chat {}: command for @{} ignored", chat_id, name);
            return Ok(Vec::new());
        }

        let is_start = matches!(&command, Some(Ok(Command::Start)));
        if !is_start && !self.services.sessions.is_open(chat_id).await {
            return Ok(vec![Reply::text(chat_id, replies::PLEASE_START)]);
        }

        if let Some(parsed) = command {
            let command = match parsed {
                Ok(command) => command,
                Err(error) => {
                    log::debug!("Chat {}: {}", chat_id, error);
                    return Ok(vec![Reply::text(chat_id, replies::UNKNOWN_COMMAND)]);
                }
            };
            let Some(handler) = self.commands.resolve(command.name()) else {
                log::warn!("Chat {}: no handler for {}", chat_id, command.name());
                return Ok(vec![Reply::text(chat_id, replies::UNKNOWN_COMMAND)]);
            };
            log::info!("Chat {}: command {}", chat_id, command.name());
            return handler.handle(&self.services, chat_id, command.args()).await;
        }

        let state = self.services.sessions.get_state(chat_id).await?;
        match event {
            InboundEvent::Text { text, .. } => {
                let handler = self
                    .messages
                    .resolve(&state)
                    .or_else(|| self.messages.resolve(&ConversationState::NothingWaiting));
                match handler {
                    Some(handler) => handler.handle(&self.services, chat_id, text).await,
                    None => Ok(vec![Reply::text(chat_id, replies::UNRECOGNIZED_TEXT)]),
                }
            }
            InboundEvent::Callback { data, .. } => match self.callbacks.resolve(&state) {
                Some(handler) => handler.handle(&self.services, chat_id, data).await,
                None => {
                    log::debug!("Chat {}: button {} pressed in state {:?}", chat_id, data, state);
                    Ok(vec![Reply::text(chat_id, replies::STALE_BUTTON)])
                }
            },
        }
    }

    async fn recover(&self, chat_id: ChatId, error: BotError) -> Vec<Reply> {
        match error {
            BotError::Session(error) => {
                log::warn!("Chat {}: {}", chat_id, error);
                vec![Reply::text(chat_id, replies::PLEASE_START)]
            }
            BotError::Remote(error) => {
                log::error!("Chat {}: remote storage failed: {}", chat_id, error);
                if let Err(e) = self.fall_back_to_local(chat_id).await {
                    log::error!("Chat {}: fallback to local storage failed: {}", chat_id, e);
                }
                vec![
                    Reply::text(chat_id, replies::REMOTE_FAILURE_CAUSES),
                    Reply::text(chat_id, replies::REMOTE_DATA_UNREACHABLE),
                ]
            }
        }
    }

    /// Whatever was written to either side before the failure stays as it is
    async fn fall_back_to_local(&self, chat_id: ChatId) -> Result<(), BotError> {
        self.services
            .sessions
            .set_storage_mode(chat_id, StorageMode::Local)
            .await?;
        self.services
            .sessions
            .set_state(chat_id, ConversationState::NothingWaiting)
            .await?;
        Ok(())
    }
}
