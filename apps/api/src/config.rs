use anyhow::{Context, Result};

use crate::layout::ExportStrategy;

/// Application configuration loaded from environment variables.
/// Every variable is optional; unset ones fall back to `Config::default()`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base URL of the OpenAI-compatible completion API.
    pub completion_api_url: String,
    pub completion_model: String,
    pub completion_timeout_secs: u64,
    pub export_file_name: String,
    /// Strategy used when an export request does not pick one.
    pub export_strategy: ExportStrategy,
    pub max_upload_bytes: usize,
    /// Paginated exports needing more pages than this are rejected.
    pub max_export_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            completion_api_url: "https://api.openai.com/v1".to_string(),
            completion_model: "gpt-3.5-turbo".to_string(),
            completion_timeout_secs: 30,
            export_file_name: "curriculo.pdf".to_string(),
            export_strategy: ExportStrategy::Paginate,
            max_upload_bytes: 10 * 1024 * 1024,
            max_export_pages: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            completion_api_url: lookup("COMPLETION_API_URL").unwrap_or(defaults.completion_api_url),
            completion_model: lookup("COMPLETION_MODEL").unwrap_or(defaults.completion_model),
            completion_timeout_secs: parse_or(
                &lookup,
                "COMPLETION_TIMEOUT_SECS",
                defaults.completion_timeout_secs,
            )?,
            export_file_name: lookup("EXPORT_FILE_NAME").unwrap_or(defaults.export_file_name),
            export_strategy: parse_or(&lookup, "EXPORT_STRATEGY", defaults.export_strategy)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            max_export_pages: parse_or(&lookup, "MAX_EXPORT_PAGES", defaults.max_export_pages)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
