use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use tokio::fs;

const DEFAULT_CONFIG_PATH: &str = ".alerton";

pub const TELEGRAM: &str = "telegram";

#[derive(serde::Deserialize, Default, Debug, Clone)]
pub struct Config {
    pub messenger: Option<MessengerConfig>,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct MessengerConfig {
    #[serde(default = "default_type")]
    pub r#type: String,
    pub token: String,
    pub chat_id: i64,
    // Only set when talking to a self-hosted Bot API server.
    pub api_url: Option<String>,
}

fn default_type() -> String {
    TELEGRAM.to_string()
}

impl Config {
    pub fn parse(literal: &str) -> Result<Self> {
        let config: Config = toml::from_str(literal).context("parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let messenger = match self.messenger.as_ref() {
            Some(m) => m,
            None => bail!("missing [messenger] section"),
        };
        if messenger.r#type != TELEGRAM {
            bail!("unsupported messenger type \"{}\"", messenger.r#type);
        }
        if messenger.token.trim().is_empty() {
            bail!("messenger token is empty");
        }
        if messenger.chat_id == 0 {
            bail!("messenger chat_id is not set");
        }
        Ok(())
    }
}

/// `$HOME/.alerton`, or `/.alerton` without a home.
pub fn default_path() -> PathBuf {
    let home_dir = env::var("HOME").unwrap_or_else(|_| String::from("/"));
    Path::new(&home_dir).join(DEFAULT_CONFIG_PATH)
}

pub async fn load(path: &Path) -> Result<Config> {
    let config_literal = fs::read_to_string(path)
        .await
        .with_context(|| format!("read config {}", path.display()))?;

    Config::parse(&config_literal).with_context(|| format!("load config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parse_full() {
        let config = Config::parse(
            r#"
            [messenger]
            type = "telegram"
            token = "123:abc"
            chat_id = -100123
            api_url = "http://localhost:8081"
            "#,
        )
        .unwrap();
        let messenger = config.messenger.unwrap();
        assert_eq!(messenger.r#type, "telegram");
        assert_eq!(messenger.token, "123:abc");
        assert_eq!(messenger.chat_id, -100123);
        assert_eq!(messenger.api_url.as_deref(), Some("http://localhost:8081"));
    }

    #[test]
    fn type_defaults_to_telegram() {
        let config = Config::parse("[messenger]\ntoken = \"t\"\nchat_id = 1\n").unwrap();
        let messenger = config.messenger.unwrap();
        assert_eq!(messenger.r#type, TELEGRAM);
        assert!(messenger.api_url.is_none());
    }

    #[test]
    fn rejects_invalid() {
        let cases = [
            ("", "missing [messenger] section"),
            (
                "[messenger]\ntoken = \" \"\nchat_id = 1\n",
                "messenger token is empty",
            ),
            (
                "[messenger]\ntoken = \"t\"\nchat_id = 0\n",
                "messenger chat_id is not set",
            ),
            (
                "[messenger]\ntype = \"slack\"\ntoken = \"t\"\nchat_id = 1\n",
                "unsupported messenger type \"slack\"",
            ),
        ];
        for (literal, want) in cases {
            let err = Config::parse(literal).unwrap_err();
            assert_eq!(err.to_string(), want, "config: {:?}", literal);
        }
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(Config::parse("[messenger\n").is_err());
        assert!(Config::parse("[messenger]\ntoken = \"t\"\n").is_err());
    }

    #[test]
    fn default_path_ends_with_file_name() {
        assert!(default_path().ends_with(DEFAULT_CONFIG_PATH));
    }

    #[tokio::test]
    async fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[messenger]\ntoken = \"abc123\"\nchat_id = 42").unwrap();

        let config = load(file.path()).await.unwrap();
        assert_eq!(config.messenger.unwrap().chat_id, 42);
    }

    #[tokio::test]
    async fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope")).await.unwrap_err();
        assert!(err.to_string().starts_with("read config"));
    }
}
