use teloxide::{
    Bot,
    payloads::SendMessageSetters,
    prelude::{Requester, ResponseResult},
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup},
};

/// Single inline button: label shown to the user and the callback data sent back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

impl From<(&str, &str)> for Button {
    fn from((label, data): (&str, &str)) -> Self {
        Button::new(label, data)
    }
}

/// Transport-independent button layout attached to a reply
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonGrid {
    rows: Vec<Vec<Button>>,
}

impl ButtonGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of buttons
    pub fn row<B: Into<Button>>(mut self, buttons: impl IntoIterator<Item = B>) -> Self {
        self.rows.push(buttons.into_iter().map(Into::into).collect());
        self
    }

    /// Lay the buttons out in rows of at most `columns` items
    pub fn columns<B: Into<Button>>(buttons: impl IntoIterator<Item = B>, columns: usize) -> Self {
        let buttons: Vec<Button> = buttons.into_iter().map(Into::into).collect();
        let rows = buttons
            .chunks(columns.max(1))
            .map(|chunk| chunk.to_vec())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Button>] {
        &self.rows
    }

    /// Find the button carrying the given callback data
    pub fn find(&self, data: &str) -> Option<&Button> {
        self.rows.iter().flatten().find(|b| b.data == data)
    }

    pub fn to_inline_keyboard(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(self.rows.iter().map(|row| {
            row.iter()
                .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
                .collect::<Vec<_>>()
        }))
    }
}

/// Outbound message descriptor produced by the bot core
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub chat_id: ChatId,
    pub text: String,
    pub buttons: Option<ButtonGrid>,
}

impl Reply {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            buttons: None,
        }
    }

    pub fn with_buttons(mut self, buttons: ButtonGrid) -> Self {
        self.buttons = Some(buttons);
        self
    }
}

/// Deliver replies in order through the bot
pub async fn send_replies(bot: &Bot, replies: Vec<Reply>) -> ResponseResult<()> {
    for reply in replies {
        let request = bot.send_message(reply.chat_id, reply.text);
        match reply.buttons {
            Some(grid) => {
                request.reply_markup(grid.to_inline_keyboard()).await?;
            }
            None => {
                request.await?;
            }
        }
    }
    Ok(())
}
