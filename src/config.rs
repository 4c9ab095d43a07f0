use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_DATABASE_URL: &str = "sqlite://quiz_bot.db";
const DEFAULT_QUESTIONS_PATH: &str = "questions.json";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} should be set")]
    Missing(&'static str),

    #[error("{var} can't be parsed: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: Url,
    pub addr: SocketAddr,
}

/// Runtime settings read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub database_url: String,
    pub questions_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `quizbot=debug,sqlx=warn`.
    pub log_filter: String,
    /// Serve updates through a webhook instead of long polling.
    pub webhook: Option<WebhookConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup("TELOXIDE_TOKEN").ok_or(ConfigError::Missing("TELOXIDE_TOKEN"))?;

        let webhook = match (lookup("WEBHOOK_URL"), lookup("WEBHOOK_ADDR")) {
            (Some(url), Some(addr)) => Some(WebhookConfig {
                url: url.parse().map_err(|e: url::ParseError| ConfigError::Invalid {
                    var: "WEBHOOK_URL",
                    reason: e.to_string(),
                })?,
                addr: addr
                    .parse()
                    .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                        var: "WEBHOOK_ADDR",
                        reason: e.to_string(),
                    })?,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("WEBHOOK_ADDR")),
            (None, Some(_)) => return Err(ConfigError::Missing("WEBHOOK_URL")),
        };

        let log_filter = lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.into());
        EnvFilter::try_new(&log_filter).map_err(|e| ConfigError::Invalid {
            var: "LOG_LEVEL",
            reason: e.to_string(),
        })?;

        Ok(Self {
            bot_token,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            questions_path: lookup("QUESTIONS_PATH")
                .unwrap_or_else(|| DEFAULT_QUESTIONS_PATH.into())
                .into(),
            log_filter,
            webhook,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn token_is_required() {
        assert!(matches!(
            from_vars(&[]),
            Err(ConfigError::Missing("TELOXIDE_TOKEN"))
        ));
    }

    #[test]
    fn defaults_apply() {
        let config = from_vars(&[("TELOXIDE_TOKEN", "123:abc")]).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.questions_path, PathBuf::from("questions.json"));
        assert_eq!(config.log_filter, "info");
        assert!(config.webhook.is_none());
    }

    #[test]
    fn webhook_needs_url_and_addr() {
        let config = from_vars(&[
            ("TELOXIDE_TOKEN", "t"),
            ("WEBHOOK_URL", "https://example.com/bot"),
            ("WEBHOOK_ADDR", "127.0.0.1:8443"),
        ])
        .unwrap();
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.url.as_str(), "https://example.com/bot");
        assert_eq!(webhook.addr.port(), 8443);

        assert!(matches!(
            from_vars(&[("TELOXIDE_TOKEN", "t"), ("WEBHOOK_URL", "https://example.com")]),
            Err(ConfigError::Missing("WEBHOOK_ADDR"))
        ));
    }

    #[test]
    fn log_level_accepts_filter_directives() {
        let config = from_vars(&[
            ("TELOXIDE_TOKEN", "t"),
            ("LOG_LEVEL", "quizbot=debug,sqlx=warn"),
        ])
        .unwrap();
        assert_eq!(config.log_filter, "quizbot=debug,sqlx=warn");

        let err = from_vars(&[("TELOXIDE_TOKEN", "t"), ("LOG_LEVEL", "quizbot=loud")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LOG_LEVEL", .. }));
    }

    #[test]
    fn rejects_bad_webhook_addr() {
        let err = from_vars(&[
            ("TELOXIDE_TOKEN", "t"),
            ("WEBHOOK_URL", "https://example.com"),
            ("WEBHOOK_ADDR", "not an address"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "WEBHOOK_ADDR", .. }));
    }
}
