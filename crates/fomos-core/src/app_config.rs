use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Optional YAML registry of sources; `None` uses the built-in list.
    pub sources_path: Option<PathBuf>,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    pub scraper_max_concurrent_sources: usize,
    /// Upper bound on one source's whole extraction, retries included.
    pub source_timeout_secs: u64,
    pub image_timeout_secs: u64,
    pub image_max_bytes: usize,
    pub image_max_concurrent: usize,
    pub fingerprint_images: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("sources_path", &self.sources_path)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .field(
                "scraper_max_concurrent_sources",
                &self.scraper_max_concurrent_sources,
            )
            .field("source_timeout_secs", &self.source_timeout_secs)
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field("image_max_bytes", &self.image_max_bytes)
            .field("image_max_concurrent", &self.image_max_concurrent)
            .field("fingerprint_images", &self.fingerprint_images)
            .finish()
    }
}
