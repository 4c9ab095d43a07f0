use std::sync::Arc;

use teloxide::{
    dispatching::dialogue::GetChatId,
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{CallbackQuery, ChatId, Message, User},
    Bot,
};
use tracing::instrument;

use crate::{
    engine::{Prompt, QuizEngine, QuizError, Step},
    keyboard::options_keyboard,
    render, HandlerResult,
};

/// Quiz records belong to the sender, not to the chat they write in.
pub(crate) fn user_key(user: &User) -> i64 {
    // Telegram user ids fit in 52 bits.
    user.id.0 as i64
}

pub(crate) fn message_sender(msg: &Message) -> Option<i64> {
    msg.from.as_ref().map(user_key)
}

/// Send `prompt` with its options as inline buttons.
pub(crate) async fn ask(bot: &Bot, chat_id: ChatId, prompt: &Prompt) -> HandlerResult {
    log::info!(
        "{}: asking question #{}: '{}'",
        chat_id.0,
        prompt.index + 1,
        prompt.text
    );
    bot.send_message(chat_id, render::question(prompt))
        .reply_markup(options_keyboard(&prompt.options))
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, engine))]
pub(crate) async fn take_answer(
    bot: Bot,
    q: CallbackQuery,
    engine: Arc<QuizEngine>,
) -> HandlerResult {
    bot.answer_callback_query(&q.id).await?;

    let (Some(selected), Some(chat_id)) = (q.data.as_deref(), q.chat_id()) else {
        log::warn!("Callback query {} without data or chat", q.id);
        return Ok(());
    };
    let user_id = user_key(&q.from);

    if let Some(message) = &q.message {
        bot.edit_message_reply_markup(chat_id, message.id()).await?;
    }

    let outcome = match engine.submit_answer(user_id, selected).await {
        Ok(outcome) => outcome,
        Err(QuizError::AlreadyComplete) => {
            log::info!("{user_id}: answer '{selected}' after the quiz was over");
            bot.send_message(chat_id, render::ALREADY_COMPLETE).await?;
            return Ok(());
        }
        Err(e) => {
            log::error!("Database error: {:?}", e);
            return Err(e.into());
        }
    };

    bot.send_message(chat_id, render::your_answer(selected))
        .await?;
    bot.send_message(chat_id, render::verdict(&outcome.verdict))
        .await?;

    match outcome.step {
        Step::Next(prompt) => ask(&bot, chat_id, &prompt).await?,
        Step::Complete {
            correct_count,
            total,
        } => {
            bot.send_message(chat_id, render::LAST_QUESTION).await?;
            bot.send_message(chat_id, render::score(correct_count, total))
                .await?;
        }
    }

    Ok(())
}

#[instrument(level = "info", skip(bot))]
pub(crate) async fn invalid_input(bot: Bot, msg: Message) -> HandlerResult {
    log::info!("{}: invalid input '{:?}'", msg.chat.id.0, msg.text());
    bot.send_message(msg.chat.id, render::INVALID_INPUT).await?;
    Ok(())
}
