use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration.
///
/// Every section has defaults, so an absent config file still yields a
/// runnable service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub statistics: StatisticsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Limit on the compressed request body.
    pub max_body_bytes: usize,
    /// Limit on the request body after gzip inflation.
    pub max_decompressed_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            max_body_bytes: 10 * 1024 * 1024,
            max_decompressed_bytes: 100 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Number of jobs executing at once.
    pub concurrency: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { concurrency: 2 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Rows per roster page, header rows included.
    pub page_capacity: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self { page_capacity: 30 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Columns that must be filled on at least one row of every dataset.
    pub required_columns: Vec<String>,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            required_columns: vec!["ward".into(), "party".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
    /// Prefix of the URLs handed out in success callbacks.
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./storage"),
            public_base_url: "/files".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Callback endpoint. Empty disables delivery.
    pub url: String,
    /// Shared HMAC secret. Empty sends callbacks without a signature header.
    pub secret: String,
    pub timeout_ms: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            secret: String::new(),
            timeout_ms: 10_000,
        }
    }
}

impl WebhookConfig {
    pub fn url(&self) -> Option<&str> {
        let url = self.url.trim();
        (!url.is_empty()).then_some(url)
    }

    /// The signing key exactly as configured. Only a blank value disables
    /// signing; surrounding whitespace is part of the key.
    pub fn secret(&self) -> Option<&str> {
        (!self.secret.trim().is_empty()).then_some(self.secret.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,rollbook=debug".into(),
            json: false,
        }
    }
}

impl Config {
    /// Loads `$ROLLBOOK_CONFIG` (a path without extension) or
    /// `config/default`, then layers `ROLLBOOK__SECTION__KEY` variables on top.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        let explicit = std::env::var("ROLLBOOK_CONFIG")
            .ok()
            .filter(|p| !p.is_empty());
        match explicit {
            Some(path) => {
                builder = builder.add_source(config::File::with_name(&path));
            }
            None => {
                builder = builder.add_source(config::File::with_name("config/default").required(false));
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("ROLLBOOK")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("statistics.required_columns")
                .try_parsing(true),
        );

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.normalize();
        Ok(config)
    }

    /// Parses a TOML document, applying the same normalization as [`Config::load`].
    pub fn from_toml(raw: &str) -> Result<Self, config::ConfigError> {
        let mut config: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.normalize();
        Ok(config)
    }

    fn normalize(&mut self) {
        self.queue.concurrency = self.queue.concurrency.max(1);
        self.layout.page_capacity = self
            .layout
            .page_capacity
            .max(rollbook_layout::config::MIN_PAGE_CAPACITY);
        self.storage.public_base_url = self.storage.public_base_url.trim_end_matches('/').to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shipped_config() {
        let cfg = Config::from_toml(include_str!("../config/default.toml")).unwrap();
        assert_eq!(cfg.queue.concurrency, 2);
        assert_eq!(cfg.layout.page_capacity, 30);
        assert_eq!(cfg.statistics.required_columns, vec!["ward", "party"]);
        assert_eq!(cfg.webhook.url(), None);
        assert_eq!(cfg.webhook.secret(), None);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let cfg = Config::from_toml("[webhook]\nurl = \"http://localhost:9000/hook\"\nsecret = \"s\"\n").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.queue.concurrency, 2);
        assert_eq!(cfg.webhook.url(), Some("http://localhost:9000/hook"));
        assert_eq!(cfg.webhook.secret(), Some("s"));
        assert_eq!(cfg.webhook.timeout_ms, 10_000);
    }

    #[test]
    fn test_webhook_secret_keeps_surrounding_whitespace() {
        let cfg = Config::from_toml("[webhook]\nsecret = \"  padded key \"\n").unwrap();
        assert_eq!(cfg.webhook.secret(), Some("  padded key "));

        let cfg = Config::from_toml("[webhook]\nurl = \"  \"\nsecret = \"   \"\n").unwrap();
        assert_eq!(cfg.webhook.url(), None);
        assert_eq!(cfg.webhook.secret(), None);
    }

    #[test]
    fn test_normalization_clamps_values() {
        let cfg = Config::from_toml(
            "[queue]\nconcurrency = 0\n[layout]\npage_capacity = 1\n[storage]\npublic_base_url = \"https://cdn.example.org/docs/\"\n",
        )
        .unwrap();
        assert_eq!(cfg.queue.concurrency, 1);
        assert_eq!(cfg.layout.page_capacity, 2);
        assert_eq!(cfg.storage.public_base_url, "https://cdn.example.org/docs");
    }
}
