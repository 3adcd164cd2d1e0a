//! Configuration resolution for `XPilot`.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/xpilot/settings.json)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables
//! 5. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::rating::DEFAULT_K_FACTOR;

/// Complete `XPilot` configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    pub database_path: Option<PathBuf>,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8000".to_string(),
            database_path: None,
            log_json: false,
        }
    }
}

/// Access token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Access token lifetime (seconds).
    pub access_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret-change-me".to_string(),
            access_ttl_secs: 3600,
        }
    }
}

/// Focus Arena match rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Rating volatility.
    pub k_factor: i64,
    /// Match length used when a challenge does not declare one.
    pub default_duration_minutes: i64,
    /// Reason string written to the XP ledger on settlement.
    pub xp_reason: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            default_duration_minutes: 45,
            xp_reason: "Focus Arena match".to_string(),
        }
    }
}

/// Load configuration with hierarchical resolution.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            config = load_config_file(&global_path)?;
        }
    }

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file {} does not exist",
                path.display()
            )));
        }
        let overlay = load_config_file(path)?;
        merge_config(&mut config, overlay);
    }

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".xpilot").join("settings.json"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/xpilot/settings.json"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("xpilot").join("settings.json"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut Config, overlay: Config) {
    if overlay.server.database_path.is_some() {
        base.server.database_path = overlay.server.database_path;
    }
    base.server.addr = overlay.server.addr;
    base.server.log_json = overlay.server.log_json;

    base.auth = overlay.auth;
    base.arena = overlay.arena;
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(val) = std::env::var("XPILOT_ADDR") {
        config.server.addr = val;
    }
    if let Ok(val) = std::env::var("XPILOT_DB_PATH") {
        config.server.database_path = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("XPILOT_LOG_JSON") {
        config.server.log_json = matches!(val.as_str(), "1" | "true" | "yes");
    }
    if let Ok(val) = std::env::var("XPILOT_JWT_SECRET") {
        config.auth.jwt_secret = val;
    }
    if let Ok(val) = std::env::var("XPILOT_K_FACTOR") {
        config.arena.k_factor = parse_k_factor(&val)?;
    }
    Ok(())
}

fn parse_k_factor(val: &str) -> Result<i64> {
    val.trim()
        .parse()
        .map_err(|_| Error::Config(format!("XPILOT_K_FACTOR is not an integer: {val:?}")))
}

fn validate(config: &Config) -> Result<()> {
    if config.arena.k_factor <= 0 {
        return Err(Error::Config("arena.k_factor must be positive".into()));
    }
    if config.arena.default_duration_minutes <= 0 {
        return Err(Error::Config(
            "arena.default_duration_minutes must be positive".into(),
        ));
    }
    if config.auth.access_ttl_secs <= 0 {
        return Err(Error::Config("auth.access_ttl_secs must be positive".into()));
    }
    Ok(())
}
