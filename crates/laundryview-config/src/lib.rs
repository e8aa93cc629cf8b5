//! Shared configuration for the laundryview CLI.
//!
//! TOML room profiles layered with environment overrides, validation,
//! and translation to `laundryview_core::IntegrationConfig`.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use laundryview_core::{IntegrationConfig, RoomConfig};

/// Allowed scan interval, in seconds.
pub const SCAN_INTERVAL_RANGE: RangeInclusive<u64> = 60..=600;

const ENV_PREFIX: &str = "LAUNDRYVIEW_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no room configured (add one with `laundryview config set-room`)")]
    NoRoom,

    #[error("room '{name}' not found in config")]
    UnknownRoom { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Room used when `--room` is not given.
    pub default_room: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named laundry rooms.
    #[serde(default)]
    pub rooms: BTreeMap<String, RoomProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval(),
            timeout_secs: default_timeout(),
            base_url: default_base_url(),
        }
    }
}

fn default_scan_interval() -> u64 {
    laundryview_core::DEFAULT_SCAN_INTERVAL.as_secs()
}
fn default_timeout() -> u64 {
    laundryview_core::DEFAULT_TIMEOUT.as_secs()
}
fn default_base_url() -> String {
    laundryview_core::DEFAULT_BASE_URL.into()
}

/// A named laundry room.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoomProfile {
    /// Site / building code (`loc`).
    pub location: String,

    /// Room code (`room`).
    pub room: String,

    /// Room-disambiguation token (`rdm`).
    pub rdm: String,

    /// Comma-separated phone numbers for notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_numbers: Option<String>,

    /// Override `defaults.scan_interval_secs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_interval_secs: Option<u64>,
}

impl Config {
    /// Pick a room: the explicit name, else `default_room`, else the only
    /// configured room.
    pub fn resolve_room<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a RoomProfile), ConfigError> {
        let name = match name.or(self.default_room.as_deref()) {
            Some(name) => name,
            None => match self.rooms.keys().next() {
                Some(only) if self.rooms.len() == 1 => only.as_str(),
                _ => return Err(ConfigError::NoRoom),
            },
        };

        self.rooms
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownRoom { name: name.into() })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "laundryview", "laundryview").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("laundryview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file is not
/// an error; defaults and env still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Validation ──────────────────────────────────────────────────────

/// Check one room profile against the global defaults.
pub fn validate_room(
    name: &str,
    profile: &RoomProfile,
    defaults: &Defaults,
) -> Result<(), ConfigError> {
    for (field, value) in [
        ("location", &profile.location),
        ("room", &profile.room),
        ("rdm", &profile.rdm),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(format!("rooms.{name}.{field}"), "must not be empty"));
        }
    }

    let interval = profile
        .scan_interval_secs
        .unwrap_or(defaults.scan_interval_secs);
    if !SCAN_INTERVAL_RANGE.contains(&interval) {
        return Err(invalid(
            format!("rooms.{name}.scan_interval_secs"),
            format!(
                "{interval}s is outside {}..={} seconds",
                SCAN_INTERVAL_RANGE.start(),
                SCAN_INTERVAL_RANGE.end()
            ),
        ));
    }

    if defaults.timeout_secs == 0 {
        return Err(invalid("defaults.timeout_secs", "must be at least 1 second"));
    }

    url::Url::parse(&defaults.base_url).map_err(|e| {
        invalid(
            "defaults.base_url",
            format!("invalid URL {}: {e}", defaults.base_url),
        )
    })?;

    Ok(())
}

/// Validate every room in the config.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.rooms
        .iter()
        .try_for_each(|(name, profile)| validate_room(name, profile, &cfg.defaults))?;

    if let Some(ref name) = cfg.default_room {
        if !cfg.rooms.contains_key(name) {
            return Err(ConfigError::UnknownRoom { name: name.clone() });
        }
    }
    Ok(())
}

/// Build an `IntegrationConfig` from a validated room profile.
pub fn profile_to_integration_config(
    name: &str,
    profile: &RoomProfile,
    defaults: &Defaults,
) -> Result<IntegrationConfig, ConfigError> {
    validate_room(name, profile, defaults)?;

    let mut room = RoomConfig::new(
        profile.location.trim(),
        profile.room.trim(),
        profile.rdm.trim(),
    );
    if let Some(ref numbers) = profile.user_numbers {
        room = room.with_user_numbers(numbers);
    }

    let interval = profile
        .scan_interval_secs
        .unwrap_or(defaults.scan_interval_secs);

    Ok(IntegrationConfig::new(room)
        .with_base_url(defaults.base_url.clone())
        .with_scan_interval(Duration::from_secs(interval))
        .with_timeout(Duration::from_secs(defaults.timeout_secs)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    fn dorm() -> RoomProfile {
        RoomProfile {
            location: "1298".into(),
            room: "4697601".into(),
            rdm: "1644085830159".into(),
            user_numbers: Some("555-0100, ,555-0101".into()),
            scan_interval_secs: None,
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults, Defaults::default());
        assert!(cfg.rooms.is_empty());
    }

    #[test]
    fn save_then_load_preserves_rooms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config {
            default_room: Some("dorm".into()),
            ..Config::default()
        };
        cfg.rooms.insert("dorm".into(), dorm());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_room = "dorm"
                [defaults]
                timeout_secs = 10
                [rooms.dorm]
                location = "1298"
                room = "4697601"
                rdm = "1644085830159"
                "#,
            )?;
            jail.set_env("LAUNDRYVIEW_DEFAULTS__TIMEOUT_SECS", "45");

            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(cfg.defaults.timeout_secs, 45);
            assert_eq!(cfg.defaults.scan_interval_secs, 60);
            assert_eq!(cfg.rooms["dorm"].location, "1298");
            Ok(())
        });
    }

    #[test]
    fn resolve_room_prefers_explicit_then_default_then_sole() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.resolve_room(None), Err(ConfigError::NoRoom)));

        cfg.rooms.insert("dorm".into(), dorm());
        assert_eq!(cfg.resolve_room(None).unwrap().0, "dorm");

        cfg.rooms.insert("annex".into(), dorm());
        assert!(matches!(cfg.resolve_room(None), Err(ConfigError::NoRoom)));

        cfg.default_room = Some("dorm".into());
        assert_eq!(cfg.resolve_room(None).unwrap().0, "dorm");
        assert_eq!(cfg.resolve_room(Some("annex")).unwrap().0, "annex");
        assert!(matches!(
            cfg.resolve_room(Some("gym")),
            Err(ConfigError::UnknownRoom { .. })
        ));
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        let mut profile = dorm();
        profile.rdm = "  ".into();
        let err = validate_room("dorm", &profile, &Defaults::default()).unwrap_err();
        assert!(err.to_string().contains("rooms.dorm.rdm"), "{err}");
    }

    #[test]
    fn scan_interval_bounds() {
        let defaults = Defaults::default();
        for (secs, ok) in [(59, false), (60, true), (600, true), (601, false)] {
            let profile = RoomProfile {
                scan_interval_secs: Some(secs),
                ..dorm()
            };
            assert_eq!(
                validate_room("dorm", &profile, &defaults).is_ok(),
                ok,
                "{secs}s"
            );
        }
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let defaults = Defaults {
            base_url: "not a url".into(),
            ..Defaults::default()
        };
        assert!(validate_room("dorm", &dorm(), &defaults).is_err());
    }

    #[test]
    fn dangling_default_room_fails_validation() {
        let cfg = Config {
            default_room: Some("gone".into()),
            ..Config::default()
        };
        assert!(matches!(
            validate(&cfg),
            Err(ConfigError::UnknownRoom { .. })
        ));
    }

    #[test]
    fn profile_translates_to_integration_config() {
        let profile = RoomProfile {
            scan_interval_secs: Some(120),
            ..dorm()
        };
        let cfg = profile_to_integration_config("dorm", &profile, &Defaults::default()).unwrap();

        assert_eq!(cfg.room.location, "1298");
        assert_eq!(cfg.room.rdm, "1644085830159");
        assert_eq!(cfg.room.user_numbers, vec!["555-0100", "555-0101"]);
        assert_eq!(cfg.scan_interval, Duration::from_secs(120));
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.base_url, "https://www.laundryview.com");
    }
}
