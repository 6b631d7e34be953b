// =============================================================================
// Process Settings — credentials, endpoints and run mode from the environment
// =============================================================================
//
// Nothing secret is compiled in: the GitHub token, webhook URL and config
// location all arrive through environment variables (optionally from a
// `.env` file loaded in `main`).
// =============================================================================

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::binance::BINANCE_FUTURES_BASE;
use crate::types::ScanMode;

#[derive(Clone)]
pub struct Settings {
    /// Raw URL of the remote scan config (`PINGR_CONFIG_URL`).
    pub config_url: Option<String>,
    /// Local scan config file, used when no URL is set (`PINGR_CONFIG_PATH`).
    pub config_path: Option<PathBuf>,
    /// Sent as `Authorization: token ...` on the config request.
    pub github_token: Option<String>,
    pub discord_webhook_url: Option<String>,
    pub binance_base_url: String,
    /// Comma-separated proxy prefixes (`PINGR_PROXIES`).
    pub proxies: Vec<String>,
    pub bind_addr: SocketAddr,
    /// Run one scan, print the report and exit instead of serving HTTP.
    pub run_once: bool,
    /// Scan flavour for `run_once`.
    pub mode: ScanMode,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let proxies = get("PINGR_PROXIES")
            .map(|v| {
                v.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let bind_addr = get("PINGR_BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .context("PINGR_BIND_ADDR is not a socket address")?;

        let mode = match get("PINGR_MODE") {
            Some(m) => m.parse()?,
            None => ScanMode::default(),
        };

        Ok(Self {
            config_url: get("PINGR_CONFIG_URL"),
            config_path: get("PINGR_CONFIG_PATH").map(PathBuf::from),
            github_token: get("GITHUB_TOKEN"),
            discord_webhook_url: get("DISCORD_WEBHOOK_URL"),
            binance_base_url: get("PINGR_BINANCE_BASE")
                .unwrap_or_else(|| BINANCE_FUTURES_BASE.to_string()),
            proxies,
            bind_addr,
            run_once: get("PINGR_RUN_ONCE").and_then(|v| parse_bool(&v)).unwrap_or(false),
            mode,
        })
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("config_url", &self.config_url)
            .field("config_path", &self.config_path)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field(
                "discord_webhook_url",
                &self.discord_webhook_url.as_ref().map(|_| "<redacted>"),
            )
            .field("binance_base_url", &self.binance_base_url)
            .field("proxies", &self.proxies)
            .field("bind_addr", &self.bind_addr)
            .field("run_once", &self.run_once)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let s = settings(&[]).unwrap();
        assert!(s.config_url.is_none());
        assert!(s.github_token.is_none());
        assert!(s.discord_webhook_url.is_none());
        assert_eq!(s.binance_base_url, "https://fapi.binance.com");
        assert!(s.proxies.is_empty());
        assert_eq!(s.bind_addr.port(), 3000);
        assert!(!s.run_once);
        assert_eq!(s.mode, ScanMode::Full);
    }

    #[test]
    fn reads_every_key() {
        let s = settings(&[
            ("PINGR_CONFIG_URL", "https://raw.example/config.json"),
            ("GITHUB_TOKEN", "ghp_abc"),
            ("DISCORD_WEBHOOK_URL", "https://discord.example/hook"),
            ("PINGR_PROXIES", "https://p1/?url=, ,https://p2/fetch/"),
            ("PINGR_BIND_ADDR", "127.0.0.1:8080"),
            ("PINGR_RUN_ONCE", "yes"),
            ("PINGR_MODE", "light"),
        ])
        .unwrap();
        assert_eq!(s.config_url.as_deref(), Some("https://raw.example/config.json"));
        assert_eq!(s.github_token.as_deref(), Some("ghp_abc"));
        assert_eq!(s.proxies, vec!["https://p1/?url=", "https://p2/fetch/"]);
        assert_eq!(s.bind_addr.port(), 8080);
        assert!(s.run_once);
        assert_eq!(s.mode, ScanMode::Light);
    }

    #[test]
    fn blank_values_are_unset() {
        let s = settings(&[("GITHUB_TOKEN", "  "), ("DISCORD_WEBHOOK_URL", "")]).unwrap();
        assert!(s.github_token.is_none());
        assert!(s.discord_webhook_url.is_none());
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(settings(&[("PINGR_BIND_ADDR", "not-an-addr")]).is_err());
        assert!(settings(&[("PINGR_MODE", "turbo")]).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let s = settings(&[("GITHUB_TOKEN", "ghp_secret"), ("DISCORD_WEBHOOK_URL", "https://hook/secret")])
            .unwrap();
        let dbg = format!("{s:?}");
        assert!(!dbg.contains("ghp_secret"));
        assert!(!dbg.contains("hook/secret"));
    }
}
