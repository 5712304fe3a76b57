//! Environment-driven server configuration.

use std::path::PathBuf;
use std::time::Duration;

use civic_risk_predictor::SubprocessPredictor;
use civic_risk_predictor::subprocess::DEFAULT_TIMEOUT;

/// Environment name under which failure details are returned to clients.
pub const DEVELOPMENT: &str = "development";

/// Everything the server reads from its environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,
    /// `PORT`
    pub port: u16,
    /// `DATA_PATH`, the JSON record file.
    pub data_path: PathBuf,
    /// `PREDICTOR_COMMAND`
    pub predictor_command: String,
    /// `PREDICTOR_ARGS`, split on whitespace.
    pub predictor_args: Vec<String>,
    /// `PREDICTOR_TIMEOUT_SECS`; `None` when set to `0`.
    pub predictor_timeout: Option<Duration>,
    /// `FRONTEND_URL`; CORS is permissive when unset.
    pub frontend_url: Option<String>,
    /// `APP_ENV`
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            data_path: PathBuf::from("data/records.json"),
            predictor_command: "python3".to_string(),
            predictor_args: vec!["ml/predict.py".to_string()],
            predictor_timeout: Some(DEFAULT_TIMEOUT),
            frontend_url: None,
            environment: DEVELOPMENT.to_string(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset or unparseable values.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = var("PORT").map_or(defaults.port, |p| {
            p.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{p}'");
                defaults.port
            })
        });

        let predictor_timeout = var("PREDICTOR_TIMEOUT_SECS").map_or(
            defaults.predictor_timeout,
            |secs| match secs.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    log::warn!("Ignoring invalid PREDICTOR_TIMEOUT_SECS '{secs}'");
                    defaults.predictor_timeout
                }
            },
        );

        Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            data_path: var("DATA_PATH").map_or(defaults.data_path, PathBuf::from),
            predictor_command: var("PREDICTOR_COMMAND").unwrap_or(defaults.predictor_command),
            predictor_args: var("PREDICTOR_ARGS").map_or(defaults.predictor_args, |args| {
                args.split_whitespace().map(ToString::to_string).collect()
            }),
            predictor_timeout,
            frontend_url: var("FRONTEND_URL"),
            environment: var("APP_ENV").unwrap_or(defaults.environment),
        }
    }

    /// Builds the predictor described by this configuration.
    #[must_use]
    pub fn predictor(&self) -> SubprocessPredictor {
        SubprocessPredictor::new(&self.predictor_command)
            .with_args(self.predictor_args.iter().cloned())
            .with_timeout(self.predictor_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config(&[]), ServerConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "5000"),
            ("DATA_PATH", "/srv/records.json"),
            ("PREDICTOR_COMMAND", "/opt/venv/bin/python"),
            ("PREDICTOR_ARGS", "  ml/predict.py   --quiet "),
            ("PREDICTOR_TIMEOUT_SECS", "5"),
            ("FRONTEND_URL", "https://map.example.org"),
            ("APP_ENV", "production"),
        ]);

        assert_eq!(cfg.bind_addr, "0.0.0.0");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.data_path, PathBuf::from("/srv/records.json"));
        assert_eq!(cfg.predictor_command, "/opt/venv/bin/python");
        assert_eq!(cfg.predictor_args, vec!["ml/predict.py", "--quiet"]);
        assert_eq!(cfg.predictor_timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.frontend_url.as_deref(), Some("https://map.example.org"));
        assert_eq!(cfg.environment, "production");
    }

    #[test]
    fn zero_timeout_disables_it() {
        assert_eq!(config(&[("PREDICTOR_TIMEOUT_SECS", "0")]).predictor_timeout, None);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let cfg = config(&[("PORT", "eighty"), ("PREDICTOR_TIMEOUT_SECS", "-1")]);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.predictor_timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn blank_frontend_url_is_unset() {
        assert_eq!(config(&[("FRONTEND_URL", "  ")]).frontend_url, None);
    }
}
