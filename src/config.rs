use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub groq_key: String,
    pub news_key: String,
    pub pexels_key: String,
    pub bind_addr: String,
    pub output_dir: String,
    pub temp_dir: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_output_dir() -> String {
    "generated_videos".to_string()
}

fn default_temp_dir() -> String {
    "static/temp_images".to_string()
}

impl Config {
    /// Reads configuration from the environment (after `dotenvy` has loaded
    /// `.env`). All three API keys are required; generation cannot work
    /// without them, so construction fails fast.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            groq_key: env::var("GROQ_API_KEY").unwrap_or_default(),
            news_key: env::var("NEWS_API_KEY").unwrap_or_default(),
            pexels_key: env::var("PEXELS_API_KEY").unwrap_or_default(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| default_bind_addr()),
            output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| default_output_dir()),
            temp_dir: env::var("TEMP_DIR").unwrap_or_else(|_| default_temp_dir()),
        };

        if config.groq_key.is_empty() {
            anyhow::bail!("GROQ_API_KEY missing in environment/.env");
        }
        if config.news_key.is_empty() {
            anyhow::bail!("NEWS_API_KEY missing in environment/.env");
        }
        if config.pexels_key.is_empty() {
            anyhow::bail!("PEXELS_API_KEY missing in environment/.env");
        }

        Ok(config)
    }
}
