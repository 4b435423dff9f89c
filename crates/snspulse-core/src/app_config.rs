use std::path::PathBuf;

use crate::KeywordSet;

#[derive(Clone)]
pub struct AppConfig {
    pub bearer_token: String,
    pub database_url: String,
    pub keywords: KeywordSet,
    pub page_size: u32,
    pub poll_interval_secs: u64,
    pub rate_limit_cooldown_secs: u64,
    pub request_timeout_secs: u64,
    pub search_base_url: String,
    pub query_filter: String,
    pub user_agent: String,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bearer_token", &"[redacted]")
            .field("database_url", &self.database_url)
            .field("keywords", &self.keywords.as_slice())
            .field("page_size", &self.page_size)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("rate_limit_cooldown_secs", &self.rate_limit_cooldown_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("search_base_url", &self.search_base_url)
            .field("query_filter", &self.query_filter)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
