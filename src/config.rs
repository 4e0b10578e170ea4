//! Runtime configuration
//!
//! Everything comes from environment variables; there is no config file.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DATABASE_PATH_VAR: &str = "FITTRACK_DATABASE_PATH";
pub const TRANSPORT_VAR: &str = "FITTRACK_TRANSPORT";
pub const HTTP_ADDR_VAR: &str = "FITTRACK_HTTP_ADDR";

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown transport '{0}' (expected 'http' or 'mcp')")]
    UnknownTransport(String),

    #[error("Invalid FITTRACK_HTTP_ADDR '{value}': {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Which front end the server binary runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    Mcp,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Http => "http",
            Transport::Mcp => "mcp",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "http" | "" => Ok(Transport::Http),
            "mcp" | "stdio" => Ok(Transport::Mcp),
            other => Err(ConfigError::UnknownTransport(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_path: PathBuf,
    pub transport: Transport,
    pub http_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let transport = match std::env::var(TRANSPORT_VAR) {
            Ok(value) => Transport::parse(&value)?,
            Err(_) => Transport::Http,
        };

        let addr = std::env::var(HTTP_ADDR_VAR).unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = addr
            .parse()
            .map_err(|source| ConfigError::InvalidAddr { value: addr.clone(), source })?;

        Ok(Self {
            database_path: database_path(),
            transport,
            http_addr,
        })
    }
}

/// Get the database path from environment or use `<project>/data/fittrack.db`
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(root) = path.parent().and_then(|p| p.parent()) {
                    path = root.to_path_buf();
                }
            }

            path.push("data");
            path.push("fittrack.db");
            path
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_parse() {
        assert_eq!(Transport::parse("http").unwrap(), Transport::Http);
        assert_eq!(Transport::parse("MCP").unwrap(), Transport::Mcp);
        assert_eq!(Transport::parse("stdio").unwrap(), Transport::Mcp);
        assert_eq!(Transport::parse("").unwrap(), Transport::Http);
        assert!(matches!(
            Transport::parse("grpc"),
            Err(ConfigError::UnknownTransport(_))
        ));
    }

    #[test]
    fn test_default_database_path_file_name() {
        if std::env::var(DATABASE_PATH_VAR).is_err() {
            let path = database_path();
            assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("fittrack.db"));
        }
    }
}
