use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use url::Url;
use config; // Explicitly import the config crate

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Root of the REST API, e.g. `https://api.are.na/v3/`.
    pub base_url: String,
    /// Root of the public site used for permalinks and profile links.
    pub site_url: String,
    pub per_page: u32,
    pub sort: String,
    pub request_timeout_secs: u64,
    /// Zero disables the periodic refresh.
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub web: WebConfig,
    pub api: ApiConfig,
    // These fields will be populated from the .env file
    pub channel_slug: String,
    pub local_username: String,
    pub fallback_display_name: String,
    pub allowed_origins: String,
    pub log_level: String,
    pub static_path: String,
}

/// Returns true for identifiers made of letters, digits, hyphens and underscores.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn required_slug(name: &str) -> Result<String, config::ConfigError> {
    let value = env::var(name).map_err(|_| config::ConfigError::Message(format!(
        "FATAL: Environment variable '{}' is not set in your .env file.", name
    )))?;

    if !is_valid_slug(&value) {
        return Err(config::ConfigError::Message(format!(
            "FATAL: '{}' must not be empty and can only contain letters, numbers, underscores, and hyphens.",
            name
        )));
    }
    Ok(value)
}

impl Config {
    pub fn from_env(env_path: &Path) -> Result<Self, config::ConfigError> {
        // Load the specified .env file. Propagate an error if it fails.
        dotenvy::from_path(env_path)
            .map_err(|e| config::ConfigError::Message(format!(
                "FATAL: Failed to load .env file from '{}'. Error: {}", env_path.display(), e
            )))?;

        let channel_slug = required_slug("CHANNEL_SLUG")?;
        let local_username = required_slug("LOCAL_USERNAME")?;

        let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let fallback_display_name = env::var("FALLBACK_DISPLAY_NAME")
            .unwrap_or_else(|_| local_username.clone());
        let static_path = env::var("STATIC_PATH").unwrap_or_else(|_| "./static".to_string());

        let mut builder = config::Config::builder()
            // Base settings (web host/port, API endpoints, paging).
            .add_source(config::File::new("config/default.toml", config::FileFormat::Toml))
            .set_override("channel_slug", channel_slug)?
            .set_override("local_username", local_username)?
            .set_override("fallback_display_name", fallback_display_name)?
            .set_override("allowed_origins", allowed_origins)?
            .set_override("log_level", log_level)?
            .set_override("static_path", static_path)?;

        if let Ok(base_url) = env::var("API_BASE_URL") {
            builder = builder.set_override("api.base_url", base_url)?;
        }
        if let Ok(interval) = env::var("REFRESH_INTERVAL_SECS") {
            let secs = interval.trim().parse::<u64>().map_err(|_| config::ConfigError::Message(
                "FATAL: 'REFRESH_INTERVAL_SECS' must be a whole number of seconds.".to_string()
            ))?;
            builder = builder.set_override("api.refresh_interval_secs", secs)?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.api.per_page == 0 || self.api.per_page > 100 {
            return Err(config::ConfigError::Message(format!(
                "FATAL: 'api.per_page' must be between 1 and 100, got {}.", self.api.per_page
            )));
        }
        for (name, value) in [("api.base_url", &self.api.base_url), ("api.site_url", &self.api.site_url)] {
            Url::parse(value).map_err(|e| config::ConfigError::Message(format!(
                "FATAL: '{}' is not a valid URL ('{}'): {}", name, value, e
            )))?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs.max(1))
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.api.refresh_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        web: WebConfig { host: "127.0.0.1".to_string(), port: 8080 },
        api: ApiConfig {
            base_url: "https://api.are.na/v3/".to_string(),
            site_url: "https://www.are.na".to_string(),
            per_page: 100,
            sort: "position_desc".to_string(),
            request_timeout_secs: 30,
            refresh_interval_secs: 0,
        },
        channel_slug: "glassware-rxfrlfenjcu".to_string(),
        local_username: "zarah-yaqub".to_string(),
        fallback_display_name: "Zarah Yaqub".to_string(),
        allowed_origins: String::new(),
        log_level: "info".to_string(),
        static_path: "./static".to_string(),
    }
}
