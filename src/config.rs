use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL DSN; the in-memory store is used when absent
    #[serde(default)]
    pub database_dsn: Option<String>,
    /// Replace all notes with the sample set on startup
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_seed_sample_data() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_dsn: None,
            seed_sample_data: default_seed_sample_data(),
        }
    }
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_config(contents: &str) -> Result<Config, Box<dyn std::error::Error>> {
    serde_yaml::from_str(contents).map_err(Into::into)
}

const ENV_KEYS: [&str; 4] = ["HOST", "PORT", "PG_DSN", "SEED_SAMPLE_DATA"];

/// `None` when none of the variables is set.
fn load_from_vars(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<Config>, Box<dyn std::error::Error>> {
    if ENV_KEYS.iter().all(|&key| lookup(key).is_none()) {
        return Ok(None);
    }

    let mut config = Config::default();

    if let Some(host) = lookup("HOST") {
        config.host = host;
    }
    if let Some(port) = lookup("PORT") {
        config.port = port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse PORT: {e}"))?;
    }
    config.database_dsn = lookup("PG_DSN").filter(|dsn| !dsn.is_empty());
    if let Some(seed) = lookup("SEED_SAMPLE_DATA") {
        config.seed_sample_data = seed
            .parse::<bool>()
            .map_err(|e| format!("Failed to parse SEED_SAMPLE_DATA: {e}"))?;
    }

    Ok(Some(config))
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("NOTEPAD_SERVER_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        let contents = fs::read_to_string(&config_path)?;
        return parse_config(&contents);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        let contents = fs::read_to_string("config.yaml")?;
        return parse_config(&contents);
    }

    // Fallback to environment variables
    if let Some(config) = load_from_vars(|key| env::var(key).ok())? {
        tracing::info!("No config file found, loaded configuration from environment variables");
        return Ok(config);
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        let contents = fs::read_to_string("config.example.yaml")?;
        return parse_config(&contents);
    }

    tracing::warn!("No config file or environment variables found, using defaults");
    Ok(Config::default())
}
