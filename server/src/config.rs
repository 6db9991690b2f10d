//! Service configuration from the environment

use std::path::PathBuf;
use thiserror::Error;

/// Default upload limit for a whole `/generate` request
const DEFAULT_MAX_UPLOAD_MB: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Runtime configuration of the web service
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind (`BIND_ADDR`)
    pub bind_addr: String,
    /// Port to listen on (`PORT`)
    pub port: u16,
    /// Directory holding `index.html`, `app.js` and the sample files (`ASSETS_DIR`)
    pub assets_dir: PathBuf,
    /// Deployment environment (`APP_ENV`)
    pub app_env: String,
    /// Request body limit in bytes (`MAX_UPLOAD_MB`)
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            assets_dir: PathBuf::from("."),
            app_env: "production".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through a variable lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(dir) = lookup("ASSETS_DIR") {
            config.assets_dir = PathBuf::from(dir);
        }
        if let Some(env) = lookup("APP_ENV") {
            config.app_env = env;
        }
        if let Some(mb) = lookup("MAX_UPLOAD_MB") {
            let mb: usize = mb.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "MAX_UPLOAD_MB",
                value: mb.clone(),
            })?;
            config.max_upload_bytes = mb * 1024 * 1024;
        }

        Ok(config)
    }

    /// `host:port` to bind
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }

    /// Log filter used when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_development() {
            "diploma_server=debug,mail_merge=debug,store=debug,tower_http=debug"
        } else {
            "diploma_server=info,mail_merge=info,tower_http=debug"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:5000");
        assert_eq!(config.assets_dir, PathBuf::from("."));
        assert!(!config.is_development());
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("ASSETS_DIR", "/srv/diplomas"),
            ("APP_ENV", "Development"),
            ("MAX_UPLOAD_MB", "5"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.assets_dir, PathBuf::from("/srv/diplomas"));
        assert!(config.is_development());
        assert!(config.default_log_filter().contains("mail_merge=debug"));
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_port() {
        let result = ServerConfig::from_lookup(lookup(&[("PORT", "http")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "PORT", .. })
        ));
    }
}
