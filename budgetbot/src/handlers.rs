use std::sync::Arc;

use teloxide::{prelude::*, types::CallbackQuery};
use yoroolbot::reply::send_replies;

use crate::router::{InboundEvent, Router};

/// Handle text messages: commands, record shorthand and dialog answers
pub async fn handle_text_message(bot: Bot, msg: Message, router: Arc<Router>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    log::debug!("Text message in chat {}", msg.chat.id);

    let replies = router
        .route(InboundEvent::Text {
            chat_id: msg.chat.id,
            text: text.to_string(),
        })
        .await;
    send_replies(&bot, replies).await
}

/// Handle callback queries from inline keyboard buttons
pub async fn handle_callback_query(
    bot: Bot,
    q: CallbackQuery,
    router: Arc<Router>,
) -> ResponseResult<()> {
    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(event) = callback_event(&q) else {
        log::debug!("Callback {} from {} has no message to reply to", q.id, q.from.id);
        return Ok(());
    };
    log::info!("Received callback in chat {}", event.chat_id());

    let replies = router.route(event).await;
    send_replies(&bot, replies).await
}

/// Turn a button press into an event for the chat the button was shown in.
/// Old or inaccessible messages still identify the chat; a press without
/// data routes as an empty payload.
pub fn callback_event(q: &CallbackQuery) -> Option<InboundEvent> {
    let chat_id = q.message.as_ref()?.chat().id;
    Some(InboundEvent::Callback {
        chat_id,
        data: q.data.clone().unwrap_or_default(),
    })
}
