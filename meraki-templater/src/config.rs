//! Runtime configuration from the environment

use std::env;

/// Everything the pipeline needs before the first remote call.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dashboard API key (bearer token)
    pub api_key: String,
    /// Organization whose networks and templates are in scope
    pub org_id: String,
    /// Path to the assignment workbook
    pub excel_path: String,
}

/// A required environment variable is missing or empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "missing required environment variable '{}' (set it in the environment or a .env file)",
            self.variable
        )
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Read configuration from `MERAKI_API_KEY`, `MERAKI_ORG_ID` and
    /// `EXCEL_DOC`. Call `dotenvy::dotenv()` first if a .env file should be
    /// honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: require("MERAKI_API_KEY")?,
            org_id: require("MERAKI_ORG_ID")?,
            excel_path: require("EXCEL_DOC")?,
        })
    }
}

fn require(variable: &'static str) -> Result<String, ConfigError> {
    match env::var(variable) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError { variable }),
    }
}
