//! Configuration loader and validator for the ropería service.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    pub server: Server,
    pub auth: Auth,
}

/// App-level settings. `data_dir` holds the SQLite file and rendered actas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub data_dir: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub bind_addr: String,
}

/// Operator credentials for the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

impl Config {
    /// Ensure required directories exist (creates `app.data_dir` if missing).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if self.app.data_dir.trim().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.app.data_dir)?;
        fs::create_dir_all(self.acta_dir())
    }

    /// Directory where delivery actas are written.
    pub fn acta_dir(&self) -> String {
        format!("{}/actas", self.app.data_dir.trim_end_matches('/'))
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.data_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.data_dir must be non-empty"));
    }
    if cfg.server.bind_addr.trim().is_empty() {
        return Err(ConfigError::Invalid("server.bind_addr must be non-empty"));
    }
    if cfg.server.bind_addr.parse::<std::net::SocketAddr>().is_err() {
        return Err(ConfigError::Invalid(
            "server.bind_addr must be a host:port socket address",
        ));
    }
    if cfg.auth.username.trim().is_empty() {
        return Err(ConfigError::Invalid("auth.username must be non-empty"));
    }
    if cfg.auth.password.trim().is_empty() {
        return Err(ConfigError::Invalid("auth.password must be non-empty"));
    }
    Ok(())
}

/// Example YAML configuration, used by tests and `--help` docs.
pub fn example() -> &'static str {
    r#"app:
  data_dir: "./data"

server:
  bind_addr: "0.0.0.0:8000"

auth:
  username: "roperia@roperia.com"
  password: "roperia"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
    }

    #[test]
    fn invalid_bind_addr() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.server.bind_addr = "not-an-addr".into();
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("bind_addr")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn invalid_credentials() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.auth.username = "".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.auth.password = "".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn ensure_dirs_creates_data_and_acta_dirs() {
        let td = tempdir().unwrap();
        let data_path = td.path().join("data");
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.app.data_dir = data_path.to_string_lossy().to_string();
        cfg.ensure_dirs().unwrap();
        assert!(data_path.exists());
        assert!(data_path.join("actas").exists());
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, example()).unwrap();
        let cfg = load(Some(&p)).unwrap();
        assert_eq!(cfg.auth.username, "roperia@roperia.com");
    }
}
