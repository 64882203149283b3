// Application state module
// Process-wide immutable state constructed once at startup

use std::io;
use std::path::PathBuf;

use super::types::Config;

/// Application state shared by reference with every request handler.
/// Nothing in here mutates after startup, so no locking is involved.
pub struct AppState {
    pub config: Config,
    /// Canonical absolute site root all served paths are confined to
    pub site_root: PathBuf,
}

impl AppState {
    /// Resolve the configured site root and freeze the state.
    ///
    /// Fails if the root cannot be canonicalized; the mirror directory must
    /// exist before the server starts.
    pub fn new(config: &Config) -> io::Result<Self> {
        let site_root = config.site.root.canonicalize()?;
        Ok(Self {
            config: config.clone(),
            site_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig};
    use tempfile::TempDir;

    fn config_with_root(root: PathBuf) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            site: SiteConfig { root },
            logging: LoggingConfig {
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                shutdown_timeout: 5,
                max_connections: None,
            },
        }
    }

    #[test]
    fn test_root_is_canonicalized() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(&config_with_root(dir.path().to_path_buf())).unwrap();
        assert!(state.site_root.is_absolute());
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("not-there");
        assert!(AppState::new(&config_with_root(missing)).is_err());
    }
}
