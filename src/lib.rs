pub mod commands;
pub mod config;
pub mod engine;
pub mod keyboard;
pub mod questions;
mod render;
pub mod runner;
pub mod schema;
pub mod store;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
