use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RostrumConfig {
    pub service: ServiceConfig,
    pub snapshot: SnapshotConfig,
    pub fetch: FetchConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub page_size: u64,
    pub request_delay_ms: u64,
    pub max_pages: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            page_size: 50,
            request_delay_ms: 1000,
            max_pages: 200,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8770,
        }
    }
}

impl RostrumConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .build()?;
        s.try_deserialize()
    }
}
