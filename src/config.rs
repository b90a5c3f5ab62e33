use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

use crate::service::DEFAULT_REVISION_WAIT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub storage: Storage,
    /// Upper bound for one `/revision` long-poll, in seconds.
    #[serde(default = "default_revision_wait_secs")]
    pub revision_wait_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Storage {
    Postgres { dsn: String },
    Memory,
}

const fn default_revision_wait_secs() -> u64 {
    DEFAULT_REVISION_WAIT.as_secs()
}

fn parse_config(contents: &str) -> Result<Config, Box<dyn std::error::Error>> {
    serde_yaml::from_str(contents).map_err(Into::into)
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let port = match env::var("NOTEBOOK_PORT") {
        Ok(port) => port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse NOTEBOOK_PORT: {e}"))?,
        Err(_) => 8000,
    };

    let storage = match env::var("PG_DSN") {
        Ok(dsn) => Storage::Postgres { dsn },
        Err(_) => {
            tracing::warn!("PG_DSN is not set, notes will be kept in memory only");
            Storage::Memory
        }
    };

    let revision_wait_secs = match env::var("NOTEBOOK_REVISION_WAIT_SECS") {
        Ok(secs) => secs
            .parse::<u64>()
            .map_err(|e| format!("Failed to parse NOTEBOOK_REVISION_WAIT_SECS: {e}"))?,
        Err(_) => default_revision_wait_secs(),
    };

    Ok(Config {
        port,
        storage,
        revision_wait_secs,
    })
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path = env::var("NOTEBOOK_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return parse_config(&fs::read_to_string(&config_path)?);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return parse_config(&fs::read_to_string("config.yaml")?);
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return parse_config(&fs::read_to_string("config.example.yaml")?);
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    load_from_env().map_err(|e| {
        format!(
            "Config file not found and environment variables are invalid. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {e}"
        )
        .into()
    })
}
