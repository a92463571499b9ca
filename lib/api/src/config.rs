use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits and bind settings for the HTTP shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted file part, in bytes
    pub max_upload_bytes: usize,
    /// Largest accepted row count per table
    pub max_items: usize,
    /// Wall-clock bound on one computation
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 16 * 1024 * 1024,
            max_items: 20_000,
            timeout_secs: 120,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.max_items, 20_000);
        assert_eq!(config.timeout(), Duration::from_secs(120));
    }
}
