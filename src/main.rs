use std::sync::Arc;

use dotenvy::dotenv;
use quizbot::config::Config;
use quizbot::engine::QuizEngine;
use quizbot::questions::QuestionBank;
use quizbot::schema::schema;
use quizbot::store::SqliteStore;
use teloxide::error_handlers::IgnoringErrorHandlerSafe;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

type MainResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

#[tokio::main]
async fn main() -> MainResult {
    dotenv().ok();
    let config = Config::from_env()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_line_number(true)
        .with_target(false)
        .finish();
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;

    let questions = QuestionBank::load(&config.questions_path)?;

    let store = SqliteStore::connect(&config.database_url).await?;
    store.create_table().await?;

    let engine = Arc::new(QuizEngine::new(Arc::new(store), questions));

    let bot = Bot::new(config.bot_token);
    log::info!("Starting bot...");

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![engine])
        .enable_ctrlc_handler()
        .build();

    match config.webhook {
        Some(webhook) => {
            let listener = webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await?;
            dispatcher
                .dispatch_with_listener(listener, Arc::new(IgnoringErrorHandlerSafe))
                .await
        }
        None => dispatcher.dispatch().await,
    }

    Ok(())
}
