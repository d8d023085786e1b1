use config::{Config as ConfigTree, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const ENVIRONMENT_PREFIX: &str = "NOTE_RELAY";
const CONFIG_SEPARATOR: &str = "__";

#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    pub subscribe_relay: String,
    #[serde(default = "default_publish_relays")]
    pub publish_relays: Vec<String>,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default = "default_limit", deserialize_with = "validate_limit")]
    pub limit: usize,
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub connect_timeout: Duration,
    #[serde(with = "humantime_serde", default = "default_subscription_timeout")]
    pub subscription_timeout: Duration,
    #[serde(with = "humantime_serde", default = "default_query_timeout")]
    pub query_timeout: Duration,
}

fn default_publish_relays() -> Vec<String> {
    [
        "wss://relay.nostrassets.com",
        "wss://relay.primal.net",
        "wss://relay.damus.io",
        "wss://nos.lol",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_output_file() -> String {
    "example_output.json".to_string()
}

fn default_limit() -> usize {
    3
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_subscription_timeout() -> Duration {
    Duration::from_secs(3000)
}

fn default_query_timeout() -> Duration {
    Duration::from_secs(10)
}

fn validate_limit<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let limit = usize::deserialize(deserializer)?;
    if limit == 0 {
        return Err(D::Error::custom("limit must be greater than 0"));
    }
    Ok(limit)
}

#[derive(Debug, Clone)]
pub struct Config {
    config: ConfigTree,
}

impl Config {
    pub fn new<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let environment =
            std::env::var(format!("{ENVIRONMENT_PREFIX}{CONFIG_SEPARATOR}ENVIRONMENT"))
                .unwrap_or_else(|_| "development".into());

        let config_dir = config_dir.as_ref();
        let default_config = config_dir.join("settings.yml");
        let env_config = config_dir.join(format!("settings.{}.yml", environment));
        let local_config = config_dir.join("settings.local.yml");

        let config = ConfigTree::builder()
            .add_source(File::from(default_config))
            .add_source(File::from(env_config).required(false))
            .add_source(File::from(local_config).required(false))
            .add_source(
                Environment::with_prefix(ENVIRONMENT_PREFIX)
                    .separator(CONFIG_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("client.publish_relays")
                    .try_parsing(true),
            )
            .build()?;

        Ok(Config { config })
    }

    pub fn get_settings(&self) -> Result<ClientSettings, ConfigError> {
        let settings: ClientSettings = self.config.get("client")?;
        tracing::debug!(
            "Client config: subscribe_relay={}, publish_relays={:?}, limit={}, subscription_timeout={:?}",
            settings.subscribe_relay,
            settings.publish_relays,
            settings.limit,
            settings.subscription_timeout,
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write_settings(contents: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("settings.yml"), contents).unwrap();
        dir
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let dir = write_settings("client:\n  subscribe_relay: \"ws://127.0.0.1:7777\"\n");
        let settings = Config::new(dir.path()).unwrap().get_settings().unwrap();

        assert_eq!(settings.subscribe_relay, "ws://127.0.0.1:7777");
        assert_eq!(settings.publish_relays.len(), 4);
        assert_eq!(settings.publish_relays[0], "wss://relay.nostrassets.com");
        assert_eq!(settings.output_file, "example_output.json");
        assert_eq!(settings.limit, 3);
        assert_eq!(settings.subscription_timeout, Duration::from_secs(3000));
    }

    #[test]
    fn test_humantime_durations() {
        let dir = write_settings(
            "client:\n  subscribe_relay: \"wss://a\"\n  connect_timeout: \"2s\"\n  query_timeout: \"500ms\"\n  publish_relays: [\"wss://b\"]\n",
        );
        let settings = Config::new(dir.path()).unwrap().get_settings().unwrap();

        assert_eq!(settings.connect_timeout, Duration::from_secs(2));
        assert_eq!(settings.query_timeout, Duration::from_millis(500));
        assert_eq!(settings.publish_relays, vec!["wss://b".to_string()]);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let dir = write_settings("client:\n  subscribe_relay: \"wss://a\"\n  limit: 0\n");
        let result = Config::new(dir.path()).unwrap().get_settings();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_settings_file() {
        let dir = TempDir::new().unwrap();
        assert!(Config::new(dir.path()).is_err());
    }
}
