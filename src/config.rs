use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "pdftext-bot";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Telegram's hard limit on outbound message length, in characters.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Long-poll timeout passed to getUpdates, in seconds.
pub const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause before polling again after a failed getUpdates call.
pub const POLL_RETRY_SECS: u64 = 3;

/// Resolution requested for page images handed to OCR.
pub const OCR_RENDER_DPI: u32 = 300;

/// Environment variable holding the bot credential.
pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";

pub fn default_log_filter() -> &'static str {
    "info"
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN environment variable is not set")]
    MissingToken,
}

/// Runtime configuration. One credential, nothing else.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
}

impl BotConfig {
    /// Read configuration from the environment. A missing or blank token is
    /// fatal at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(BOT_TOKEN_VAR) {
            Ok(token) if !token.trim().is_empty() => Ok(Self { token }),
            _ => Err(ConfigError::MissingToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_limit_matches_platform() {
        assert_eq!(MAX_MESSAGE_LEN, 4096);
    }

    #[test]
    fn poll_timeout_is_long_poll() {
        assert!(POLL_TIMEOUT_SECS >= 10);
    }

    #[test]
    fn default_filter_is_info() {
        assert_eq!(default_log_filter(), "info");
    }

    #[test]
    fn from_env_requires_token() {
        // Set and unset sequentially inside one test: BOT_TOKEN is process
        // state shared with any parallel test that touched it.
        std::env::set_var(BOT_TOKEN_VAR, "123456:test-token");
        let cfg = BotConfig::from_env().unwrap();
        assert_eq!(cfg.token, "123456:test-token");

        std::env::set_var(BOT_TOKEN_VAR, "   ");
        assert!(matches!(
            BotConfig::from_env(),
            Err(ConfigError::MissingToken)
        ));

        std::env::remove_var(BOT_TOKEN_VAR);
        assert!(matches!(
            BotConfig::from_env(),
            Err(ConfigError::MissingToken)
        ));
    }
}
