use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const DEFAULT_CONFIG_PATH: &str = "config/relay.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Runtime settings of the relay.
///
/// Defaults are overridden by an optional YAML file, which is in turn
/// overridden by environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    /// Base URL of the inference service; `/upload` is appended per request.
    pub upstream_base_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Directory holding the compiled client.
    pub frontend_dir: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        let frontend_dir = if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            format!("{}/../frontend/dist", manifest_dir)
        } else {
            "/usr/src/app/frontend/dist".to_string()
        };

        Self {
            upstream_base_url: None,
            host: "0.0.0.0".to_string(),
            port: 8081,
            frontend_dir,
        }
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_file_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.upstream_base_url = config.upstream_base_url.take().and_then(normalize_upstream);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Applies environment overrides read through `lookup`. Empty values
    /// count as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("UPSTREAM_BASE_URL") {
            self.upstream_base_url = Some(url);
        } else if let Some(host) = get("UPSTREAM_HOST") {
            self.upstream_base_url = Some(match get("UPSTREAM_PORT") {
                Some(port) => format!("https://{}:{}", host.trim(), port.trim()),
                None => format!("https://{}", host.trim()),
            });
        }

        if let Some(host) = get("HOST") {
            self.host = host;
        }
        if let Some(port) = get("PORT") {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(_) => log::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(dir) = get("FRONTEND_DIR") {
            self.frontend_dir = dir;
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("RELAY_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    default.exists().then_some(default)
}

/// Validates an upstream base URL and strips trailing slashes. Invalid
/// values are dropped so the relay reports them per request instead of
/// refusing to start.
pub fn normalize_upstream(raw: String) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match Url::parse(trimmed) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(trimmed.to_string()),
        Ok(url) => {
            log::error!("Unsupported upstream URL scheme: {}", url.scheme());
            None
        }
        Err(e) => {
            log::error!("Invalid upstream URL {:?}: {}", trimmed, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.upstream_base_url, None);
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
        assert!(config.frontend_dir.ends_with("frontend/dist"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RelayConfig::default();
        config.apply_env(env(&[
            ("UPSTREAM_BASE_URL", "http://inference.local:5000/"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("FRONTEND_DIR", "/srv/www"),
        ]));
        assert_eq!(
            config.upstream_base_url.as_deref(),
            Some("http://inference.local:5000/")
        );
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.frontend_dir, "/srv/www");
    }

    #[test]
    fn test_host_and_port_fallback() {
        let mut config = RelayConfig::default();
        config.apply_env(env(&[("UPSTREAM_HOST", "api.example.com"), ("UPSTREAM_PORT", "8443")]));
        assert_eq!(
            config.upstream_base_url.as_deref(),
            Some("https://api.example.com:8443")
        );

        let mut config = RelayConfig::default();
        config.apply_env(env(&[("UPSTREAM_HOST", "api.example.com")]));
        assert_eq!(config.upstream_base_url.as_deref(), Some("https://api.example.com"));
    }

    #[test]
    fn test_empty_and_invalid_values_are_ignored() {
        let mut config = RelayConfig::default();
        config.apply_env(env(&[("UPSTREAM_BASE_URL", "  "), ("PORT", "eighty")]));
        assert_eq!(config.upstream_base_url, None);
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_yaml_file_values() {
        let config = RelayConfig::from_yaml(
            "upstream_base_url: http://10.0.0.5:5000\nport: 8088\n",
        )
        .unwrap();
        assert_eq!(config.upstream_base_url.as_deref(), Some("http://10.0.0.5:5000"));
        assert_eq!(config.port, 8088);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_normalize_upstream() {
        assert_eq!(
            normalize_upstream("https://api.example.com//".into()).as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(normalize_upstream("".into()), None);
        assert_eq!(normalize_upstream("not a url".into()), None);
        assert_eq!(normalize_upstream("ftp://files.example.com".into()), None);
    }
}
