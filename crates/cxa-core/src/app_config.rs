use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// Only the `load` stage needs a database; every other stage runs without one.
    pub database_url: Option<String>,
    pub log_level: String,
    pub banks_path: PathBuf,
    pub data_dir: PathBuf,
    pub review_count: u32,
    pub review_lang: String,
    pub review_country: String,
    pub play_base_url: String,
    pub translate_url: String,
    pub sentiment_model_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("banks_path", &self.banks_path)
            .field("data_dir", &self.data_dir)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("review_count", &self.review_count)
            .field("review_lang", &self.review_lang)
            .field("review_country", &self.review_country)
            .field("play_base_url", &self.play_base_url)
            .field("translate_url", &self.translate_url)
            .field("sentiment_model_url", &self.sentiment_model_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
