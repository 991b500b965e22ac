use std::path::PathBuf;

use clap::Parser;

use crate::errors::ConfigError;

pub const PREDEFINED_BOT_TOKEN_RELEASE: Option<&str> = option_env!("PREDEFINED_BOT_TOKEN_RELEASE");
pub const PREDEFINED_BOT_TOKEN_DEBUG: Option<&str> = option_env!("PREDEFINED_BOT_TOKEN_DEBUG");
pub const PREDEFINED_BOT_TOKEN: Option<&str> = if cfg!(debug_assertions) {
    PREDEFINED_BOT_TOKEN_DEBUG
} else {
    PREDEFINED_BOT_TOKEN_RELEASE
};
pub const BOT_TOKEN_HELP: &str = if PREDEFINED_BOT_TOKEN_RELEASE.is_some() {
    "Environment variable name containing the bot token. If not set, uses precompiled token"
} else {
    "Environment variable name containing the bot token (required)"
};

/// A Telegram bot that tracks incomes, expenses and a daily spending limit
#[derive(Parser, Debug)]
#[command(name = "budgetbot")]
#[command(about = "A Telegram bot that keeps your budget locally or in a spreadsheet", long_about = None)]
pub struct Args {
    #[arg(long, help = BOT_TOKEN_HELP)]
    pub bot_token_env: Option<String>,

    /// Directory holding the shared spreadsheet documents (<id>.yaml)
    #[arg(long, default_value = "sheets")]
    pub remote_dir: PathBuf,
}

impl Args {
    /// Get the bot token from CLI args or predefined token
    pub fn get_token(&self) -> Result<String, ConfigError> {
        if let Some(env_name) = &self.bot_token_env {
            std::env::var(env_name).map_err(|_| ConfigError::MissingTokenVariable(env_name.clone()))
        } else if let Some(predefined) = PREDEFINED_BOT_TOKEN {
            Ok(predefined.to_string())
        } else {
            Err(ConfigError::NoToken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_remote_dir() {
        let args = Args::parse_from(["budgetbot"]);
        assert_eq!(args.remote_dir, PathBuf::from("sheets"));
        assert!(args.bot_token_env.is_none());
    }

    #[test]
    fn test_missing_token_variable() {
        let args = Args::parse_from([
            "budgetbot",
            "--bot-token-env",
            "BUDGETBOT_TEST_TOKEN_THAT_IS_NOT_SET",
        ]);
        assert!(matches!(
            args.get_token(),
            Err(ConfigError::MissingTokenVariable(name)) if name == "BUDGETBOT_TEST_TOKEN_THAT_IS_NOT_SET"
        ));
    }
}
