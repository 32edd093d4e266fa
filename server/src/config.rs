//! Server configuration

use crate::error::ServerError;
use shared::PuzzleSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Round interval used when none is given.
pub const DEFAULT_ROUND_INTERVAL: Duration = Duration::from_secs(30);

/// Startup settings for the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,
    /// Port to listen on; 0 picks a free one
    pub port: u16,
    /// Time between rotations. Hints land half an interval after each rotation.
    pub round_interval: Duration,
    /// JSON catalogue replacing the built-in puzzles
    pub puzzles_path: Option<PathBuf>,
    /// Fixed seed for puzzle selection
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            round_interval: DEFAULT_ROUND_INTERVAL,
            puzzles_path: None,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Rejects settings the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.round_interval.is_zero() {
            return Err(ServerError::Config(
                "round interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses `host:port` into a bindable address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ServerError::Address(address.clone()))
    }

    /// The configured catalogue, or the built-in one.
    pub fn load_puzzles(&self) -> Result<PuzzleSet, ServerError> {
        match &self.puzzles_path {
            Some(path) => Ok(PuzzleSet::load(path)?),
            None => Ok(PuzzleSet::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.round_interval, Duration::from_secs(30));
        assert!(config.validate().is_ok());
        assert_eq!(config.load_puzzles().unwrap().len(), 20);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = ServerConfig {
            round_interval: Duration::ZERO,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..ServerConfig::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:0");

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(bad.socket_addr(), Err(ServerError::Address(_))));
    }

    #[test]
    fn test_missing_catalogue_file() {
        let config = ServerConfig {
            puzzles_path: Some(PathBuf::from("/nonexistent/puzzles.json")),
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.load_puzzles(),
            Err(ServerError::Puzzles(shared::PuzzleError::Io(_)))
        ));
    }

    #[test]
    fn test_catalogue_file_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("puzzles.json");
        std::fs::write(
            &path,
            r#"[
                {"answer": "CAT", "scrambled": "TAC", "hint": "Pet"},
                {"answer": "DOG", "scrambled": "GOD", "hint": "Barks"}
            ]"#,
        )
        .unwrap();

        let config = ServerConfig {
            puzzles_path: Some(path),
            ..ServerConfig::default()
        };
        let puzzles = config.load_puzzles().unwrap();
        assert_eq!(puzzles.len(), 2);
        assert!(puzzles.contains(&shared::Puzzle::new("CAT", "TAC", "Pet")));
        assert!(puzzles.contains(&shared::Puzzle::new("DOG", "GOD", "Barks")));
    }

    #[test]
    fn test_invalid_catalogue_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("puzzles.json");
        std::fs::write(&path, r#"[{"answer": "CAT", "scrambled": "DOG", "hint": "Pet"}]"#).unwrap();

        let config = ServerConfig {
            puzzles_path: Some(path),
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.load_puzzles(),
            Err(ServerError::Puzzles(shared::PuzzleError::NotAnAnagram { .. }))
        ));
    }
}
