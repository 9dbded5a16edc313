use anyhow::{bail, Context, Result};
use std::env;

/// Which trigger layers to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotMode {
    /// Webhook receiver only.
    Webhook,
    /// Polling loop only.
    Poll,
    /// Webhook receiver plus a background polling loop.
    Both,
}

#[derive(Clone)]
pub struct Config {
    pub organization_url: String,
    pub personal_access_token: String,
    pub project: String,
    pub repository_id: String,
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub poll_interval_hours: u64,
    pub port: u16,
    pub ignored_authors: Vec<String>,
    pub mode: BotMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let organization_url = env::var("AZURE_ORG_URL")
            .context("AZURE_ORG_URL environment variable is required")?
            .trim_end_matches('/')
            .to_string();

        let personal_access_token =
            env::var("AZURE_PAT").context("AZURE_PAT environment variable is required")?;

        let project =
            env::var("PROJECT_NAME").context("PROJECT_NAME environment variable is required")?;

        let repository_id =
            env::var("REPO_ID").context("REPO_ID environment variable is required")?;

        let openai_api_key = env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable is required")?;

        let openai_api_base = env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| reviewbot_core::openai::DEFAULT_API_BASE.to_string());

        let model = env::var("MODEL_VERSION").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let max_tokens = env::var("MAX_TOKENS")
            .unwrap_or_else(|_| "1024".to_string())
            .parse::<u32>()
            .context("MAX_TOKENS must be a valid number")?;

        let poll_interval_hours = env::var("INTERVAL_HOURS")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u64>()
            .context("INTERVAL_HOURS must be a valid number")?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid number")?;

        let ignored_authors =
            parse_ignored_authors(&env::var("IGNORED_AUTHORS").unwrap_or_default());

        let mode = parse_bot_mode(&env::var("BOT_MODE").unwrap_or_else(|_| "both".to_string()))?;

        Ok(Config {
            organization_url,
            personal_access_token,
            project,
            repository_id,
            openai_api_key,
            openai_api_base,
            model,
            max_tokens,
            poll_interval_hours,
            port,
            ignored_authors,
            mode,
        })
    }
}

/// Parse the comma-separated ignore list. Entries are trimmed and empties
/// dropped, so an unset or blank variable means "ignore nobody".
pub fn parse_ignored_authors(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|author| author.trim().to_string())
        .filter(|author| !author.is_empty())
        .collect()
}

pub fn parse_bot_mode(value: &str) -> Result<BotMode> {
    match value.trim().to_lowercase().as_str() {
        "webhook" => Ok(BotMode::Webhook),
        "poll" => Ok(BotMode::Poll),
        "both" => Ok(BotMode::Both),
        other => bail!("BOT_MODE must be one of webhook, poll, both (got '{other}')"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignored_authors_empty() {
        assert!(parse_ignored_authors("").is_empty());
        assert!(parse_ignored_authors("  ").is_empty());
    }

    #[test]
    fn test_parse_ignored_authors_single() {
        assert_eq!(parse_ignored_authors("bot-ci"), vec!["bot-ci".to_string()]);
    }

    #[test]
    fn test_parse_ignored_authors_trims_whitespace() {
        assert_eq!(
            parse_ignored_authors(" bot-ci , Build Service ,"),
            vec!["bot-ci".to_string(), "Build Service".to_string()]
        );
    }

    #[test]
    fn test_parse_bot_mode_accepts_known_modes() {
        assert_eq!(parse_bot_mode("webhook").unwrap(), BotMode::Webhook);
        assert_eq!(parse_bot_mode("poll").unwrap(), BotMode::Poll);
        assert_eq!(parse_bot_mode("Both").unwrap(), BotMode::Both);
    }

    #[test]
    fn test_parse_bot_mode_rejects_unknown() {
        assert!(parse_bot_mode("cron").is_err());
    }
}
