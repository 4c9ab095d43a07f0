use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters, prelude::Requester, types::Message, utils::command::BotCommands,
    Bot,
};
use tracing::instrument;

use crate::{engine::QuizEngine, keyboard::action_keyboard, render, runner, HandlerResult};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display help.")]
    Help,
    #[command(description = "start the bot.")]
    Start,
    #[command(description = "start a new quiz.")]
    Quiz,
    #[command(description = "show quiz statistics.")]
    Statistics,
}

pub(crate) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

pub(crate) async fn start(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, render::WELCOME)
        .reply_markup(action_keyboard())
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, engine))]
pub(crate) async fn quiz(bot: Bot, msg: Message, engine: Arc<QuizEngine>) -> HandlerResult {
    let Some(user_id) = runner::message_sender(&msg) else {
        log::warn!("{}: quiz requested without a sender", msg.chat.id.0);
        return Ok(());
    };
    bot.send_message(msg.chat.id, render::LETS_BEGIN).await?;
    let prompt = engine.start_quiz(user_id).await?;
    runner::ask(&bot, msg.chat.id, &prompt).await
}

#[instrument(level = "info", skip(bot, engine))]
pub(crate) async fn statistics(bot: Bot, msg: Message, engine: Arc<QuizEngine>) -> HandlerResult {
    let Some(user_id) = runner::message_sender(&msg) else {
        log::warn!("{}: statistics requested without a sender", msg.chat.id.0);
        return Ok(());
    };
    let stats = engine.get_statistics(user_id).await?;
    log::info!("{user_id}: statistics {:?}", stats);
    for line in render::statistics(&stats) {
        bot.send_message(msg.chat.id, line).await?;
    }
    Ok(())
}
