use std::{fs, path::Path};
use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::client::ClientConfig;
use crate::config::settings::LoggingConfig;

/// Load client config from a YAML file, expanding `${VAR}` / `${VAR:default}`
pub fn file_to_config(path: &Path) -> Result<ClientConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let expanded = expand_env_vars(&content)?;
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> Result<ClientConfig> {
    let mut config: ClientConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))
        .context("invalid config format")?;

    // Apply defaults
    if config.logging.is_none() {
        config.logging = Some(LoggingConfig::default());
    }
    // blank optional values count as absent
    config.user_web_token = config.user_web_token.filter(|v| !v.trim().is_empty());
    config.x_authorization = config.x_authorization.filter(|v| !v.trim().is_empty());
    config.base_url = config.base_url.trim().to_owned();

    debug!(base_url = %config.base_url, timeout_seconds = config.timeout_seconds, "config loaded");
    Ok(config)
}

fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    });
    Ok(expanded.into_owned())
}

#[cfg(test)]
mod test {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn expands_env_and_defaults() {
        std::env::set_var("RAPID_LOADER_TEST_KEY", "from-env");
        let out = expand_env_vars("key: ${RAPID_LOADER_TEST_KEY}\nsecret: ${RAPID_LOADER_TEST_MISSING:fallback}\n").unwrap();
        std::env::remove_var("RAPID_LOADER_TEST_KEY");

        assert_eq!(out, "key: from-env\nsecret: fallback\n");
    }

    #[test]
    fn parse_applies_defaults() {
        let cfg = parse_config("base_url: http://api.example.com\nkey: k\nsecret: s\nuser_web_token: ''\n").unwrap();

        assert_eq!(cfg.timeout_seconds, 600);
        assert!(cfg.user_web_token.is_none());
        assert_eq!(cfg.logging.unwrap().level, "info");
    }
}
