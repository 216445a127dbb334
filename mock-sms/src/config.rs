//! Server configuration parsed from environment variables.

use std::net::SocketAddr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8098;
pub const DEFAULT_MAX_MESSAGES: usize = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSmsConfig {
    pub host: String,
    pub port: u16,
    /// Oldest messages are evicted once the log grows past this.
    pub max_messages: usize,
}

impl Default for MockSmsConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_owned(), port: DEFAULT_PORT, max_messages: DEFAULT_MAX_MESSAGES }
    }
}

impl MockSmsConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `MOCK_SMS_HOST`: default `0.0.0.0`
    /// - `MOCK_SMS_PORT`: default 8098
    /// - `MOCK_SMS_MAX_MESSAGES`: default 100, at least 1
    ///
    /// # Errors
    ///
    /// Returns `Invalid` when a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` when a variable is set to an unparsable value.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("MOCK_SMS_HOST")
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = parse_var(&lookup, "MOCK_SMS_PORT", DEFAULT_PORT)?;
        let max_messages = parse_var(&lookup, "MOCK_SMS_MAX_MESSAGES", DEFAULT_MAX_MESSAGES)?;
        if max_messages == 0 {
            return Err(ConfigError::Invalid { var: "MOCK_SMS_MAX_MESSAGES", value: "0".into() });
        }
        Ok(Self { host, port, max_messages })
    }

    /// Address to bind.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` when the host is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid { var: "MOCK_SMS_HOST", value: self.host.clone() })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
