use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Signing key for session and flash cookies. A random key is generated when unset.
    pub secret: Option<String>,
    pub domain: String,
    /// Directory that receives uploaded payment slips.
    pub payslip_dir: PathBuf,
    /// Seed sample products and employees into empty tables at startup.
    pub seed_data: bool,
    /// bcrypt cost used when hashing new passwords.
    pub password_cost: u32,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => 8080,
        };

        let seed_data = match lookup("INITIALIZE_DATA") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                name: "INITIALIZE_DATA",
                value,
            })?,
            None => true,
        };

        let password_cost = match lookup("PASSWORD_HASH_COST") {
            Some(value) => match value.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "PASSWORD_HASH_COST",
                        value,
                    });
                }
            },
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "app.db".to_string()),
            address: lookup("ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            secret: lookup("SECRET_KEY").filter(|value| !value.is_empty()),
            domain: lookup("DOMAIN").unwrap_or_else(|| "localhost".to_string()),
            payslip_dir: lookup("PAYSLIP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("payslips")),
            seed_data,
            password_cost,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
