//! Server configuration management.
//!
//! This module handles loading and validating server configuration from CLI
//! arguments and environment variables.
//!
//! # Configuration Sources
//!
//! Configuration can be provided via:
//! - CLI arguments (`--http-bind`, `--seed`, `--tokens`)
//! - Environment variables (`ROTA_HTTP_BIND`, etc.)
//! - Default values
//!
//! # Example
//!
//! ```no_run
//! use rota_server::ServerConfig;
//!
//! // Load from CLI args and environment
//! let config = ServerConfig::from_args();
//!
//! // Validate configuration
//! config.validate().expect("Invalid configuration");
//!
//! println!("HTTP server will bind to: {}", config.http_bind);
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rota-server",
    about = "Weekly course-slot reservation service",
    version
)]
pub struct ServerConfig {
    /// HTTP bind address
    #[arg(long, env = "ROTA_HTTP_BIND", default_value = "0.0.0.0:8080")]
    pub http_bind: SocketAddr,

    /// Path to the school seed JSON (school, locations, courses, profiles)
    #[arg(long, env = "ROTA_SEED", default_value = "./school.json")]
    pub seed: PathBuf,

    /// Path to the token map JSON (token to email)
    #[arg(long, env = "ROTA_TOKENS", default_value = "./tokens.json")]
    pub tokens: PathBuf,
}

impl ServerConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the seed or token files do not exist.
    pub fn validate(&self) -> Result<(), crate::error::ConfigError> {
        use crate::error::ConfigError;

        if !self.seed.exists() {
            return Err(ConfigError::MissingRequired(format!(
                "seed file not found: {}",
                self.seed.display()
            )));
        }
        if !self.tokens.exists() {
            return Err(ConfigError::MissingRequired(format!(
                "token map not found: {}",
                self.tokens.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_requires_existing_files() {
        let mut seed = NamedTempFile::new().unwrap();
        seed.write_all(b"{}").unwrap();
        let mut tokens = NamedTempFile::new().unwrap();
        tokens.write_all(b"{}").unwrap();

        let config = ServerConfig {
            http_bind: "127.0.0.1:8080".parse().unwrap(),
            seed: seed.path().to_path_buf(),
            tokens: tokens.path().to_path_buf(),
        };
        assert!(config.validate().is_ok());

        let missing_seed = ServerConfig {
            seed: PathBuf::from("/definitely/not/here.json"),
            ..config.clone()
        };
        assert!(missing_seed.validate().is_err());

        let missing_tokens = ServerConfig {
            tokens: PathBuf::from("/definitely/not/here.json"),
            ..config
        };
        assert!(missing_tokens.validate().is_err());
    }
}
