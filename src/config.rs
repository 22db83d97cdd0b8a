use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ReconError;

pub const DEFAULT_ENDPOINT: &str = "https://crt.sh";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Certificate-transparency search endpoint.
    pub endpoint: String,
    /// Max in-flight DNS lookups per batch. 0 means one task per hostname.
    pub concurrency: u16,
    /// Overall certificate fetch timeout. 0 disables it.
    pub fetch_timeout_secs: u64,
    /// Per-lookup DNS timeout. Values below 1 are raised to 1.
    pub lookup_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            concurrency: 50,
            fetch_timeout_secs: 60,
            lookup_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ReconError> {
        let data = std::fs::read_to_string(path).map_err(|e| ReconError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&data).map_err(|e| ReconError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        match self.fetch_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"concurrency": 8}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn zero_fetch_timeout_disables_it() {
        let config = Config { fetch_timeout_secs: 0, ..Config::default() };
        assert!(config.fetch_timeout().is_none());
    }

    #[test]
    fn lookup_timeout_has_one_second_floor() {
        let config = Config { lookup_timeout_secs: 0, ..Config::default() };
        assert_eq!(config.lookup_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = Config::load(Path::new("/nonexistent/domain-recon.json")).unwrap_err();
        assert!(matches!(err, ReconError::Config { .. }));
    }
}
