/// Application configuration module
use anyhow::Context;
use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub launch_data_url: String,
    pub satellite_data_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let launch_data_url =
            env::var("LAUNCH_DATA_URL").context("LAUNCH_DATA_URL is required")?;

        let satellite_data_url =
            env::var("SATELLITE_DATA_URL").context("SATELLITE_DATA_URL is required")?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            bind_addr,
            launch_data_url,
            satellite_data_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because the process environment is shared across threads.
    #[test]
    fn from_env_requires_both_source_urls() {
        env::remove_var("LAUNCH_DATA_URL");
        env::remove_var("SATELLITE_DATA_URL");
        env::remove_var("BIND_ADDR");
        assert!(AppConfig::from_env().is_err());

        env::set_var("LAUNCH_DATA_URL", "http://localhost/launches.json");
        assert!(AppConfig::from_env().is_err());

        env::set_var("SATELLITE_DATA_URL", "http://localhost/satellites.json");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.launch_data_url, "http://localhost/launches.json");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");

        env::set_var("BIND_ADDR", "127.0.0.1:8080");
        assert_eq!(AppConfig::from_env().unwrap().bind_addr, "127.0.0.1:8080");

        env::remove_var("LAUNCH_DATA_URL");
        env::remove_var("SATELLITE_DATA_URL");
        env::remove_var("BIND_ADDR");
    }
}
