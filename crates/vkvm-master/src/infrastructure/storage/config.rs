//! TOML-based configuration for the master application.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\vkvm\config.toml`
//! - Linux:    `~/.config/vkvm/config.toml`
//! - macOS:    `~/Library/Application Support/vkvm/config.toml`
//!
//! # File layout
//!
//! ```toml
//! [local]
//! screen_width = 1920
//! screen_height = 1080
//!
//! [profiles.work]
//! server = "10.0.0.5"
//! port = 5900
//! password = "secret"
//! hotkey = "Control_L+F1"
//! scroll_speed = 3
//! settle_ms = 5
//! timeout_sec = 10
//!
//! [profiles.work.keymap]
//! "Alt_L" = "Meta_L"
//! "Alt_L+Tab" = "Super_L+Tab"
//! ```
//!
//! Profiles and keymap entries keep the order they are written in: the first
//! profile whose hotkey matches wins, and the first keymap rule that matches
//! a combination wins.
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vkvm_core::{ConnectionTarget, DefinitionRegistry, Profile, ProfileError, ProfileSpec, Screen};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A config file named explicitly does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A profile failed validation.
    #[error("invalid profile {name:?}: {source}")]
    InvalidProfile {
        name: String,
        #[source]
        source: ProfileError,
    },

    /// A value has the wrong shape (e.g. a non-string keymap target).
    #[error("invalid entry {key:?} in profile {profile:?}: {reason}")]
    InvalidEntry {
        profile: String,
        key: String,
        reason: String,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Local screen that scripted pointer samples refer to.
    #[serde(default)]
    pub local: ScreenConfig,
    /// Screen size the dry-run transport reports.
    #[serde(default)]
    pub dry_run: ScreenConfig,
    /// Profile tables by name, in file order.
    #[serde(default)]
    pub profiles: toml::Table,
}

/// A screen size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScreenConfig {
    #[serde(default = "default_screen_width")]
    pub screen_width: u16,
    #[serde(default = "default_screen_height")]
    pub screen_height: u16,
}

/// One `[profiles.NAME]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileEntry {
    /// Host name or address of the remote desktop server.
    pub server: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Descriptor that switches to this profile, e.g. `"Control_L+F1"`.
    pub hotkey: String,
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: u8,
    /// Pause after connecting before the first event is sent.
    #[serde(default)]
    pub settle_ms: u64,
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
    /// `from = to` descriptor pairs, in file order.
    #[serde(default)]
    pub keymap: toml::Table,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_screen_width() -> u16 {
    1920
}
fn default_screen_height() -> u16 {
    1080
}
fn default_port() -> u16 {
    5900
}
fn default_scroll_speed() -> u8 {
    1
}
fn default_timeout_sec() -> u64 {
    10
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

impl ScreenConfig {
    pub fn screen(&self) -> Screen {
        Screen::new(self.screen_width, self.screen_height)
    }
}

impl ProfileEntry {
    /// Converts this table into an unvalidated [`ProfileSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEntry`] for a keymap value that is not a
    /// string.
    pub fn into_spec(self, name: &str) -> Result<ProfileSpec, ConfigError> {
        let keymap = self
            .keymap
            .into_iter()
            .map(|(from, to)| match to.as_str() {
                Some(to) => Ok((from, to.to_string())),
                None => Err(ConfigError::InvalidEntry {
                    profile: name.to_string(),
                    key: from,
                    reason: format!("keymap target must be a string, found {}", to.type_str()),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProfileSpec {
            name: name.to_string(),
            target: ConnectionTarget {
                host: self.server,
                port: self.port,
                credential: self.password,
            },
            hotkey: self.hotkey,
            keymap,
            scroll_speed: self.scroll_speed,
            settle_delay: Duration::from_millis(self.settle_ms),
            connect_timeout: Duration::from_secs(self.timeout_sec),
        })
    }
}

impl AppConfig {
    /// Parses every `[profiles.*]` table, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEntry`] if a profile table is malformed.
    pub fn profile_entries(&self) -> Result<Vec<(String, ProfileEntry)>, ConfigError> {
        self.profiles
            .iter()
            .map(|(name, value)| {
                let entry = value
                    .clone()
                    .try_into::<ProfileEntry>()
                    .map_err(|e| ConfigError::InvalidEntry {
                        profile: name.clone(),
                        key: name.clone(),
                        reason: e.message().to_string(),
                    })?;
                Ok((name.clone(), entry))
            })
            .collect()
    }

    /// Builds profile specs, replacing every credential with
    /// `password_override` when one is given.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::profile_entries`] and [`ProfileEntry::into_spec`].
    pub fn profile_specs(&self, password_override: Option<&str>) -> Result<Vec<ProfileSpec>, ConfigError> {
        self.profile_entries()?
            .into_iter()
            .map(|(name, entry)| {
                let mut spec = entry.into_spec(&name)?;
                if let Some(password) = password_override {
                    spec.target.credential = Some(password.to_string());
                }
                Ok(spec)
            })
            .collect()
    }

    /// Validates every profile against `registry`, stopping at the first
    /// invalid one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProfile`] naming the offending profile.
    pub fn load_profiles(
        &self,
        registry: &DefinitionRegistry,
        password_override: Option<&str>,
    ) -> Result<Vec<Profile>, ConfigError> {
        self.profile_specs(password_override)?
            .into_iter()
            .map(|spec| {
                let name = spec.name.clone();
                Profile::from_spec(spec, registry)
                    .map_err(|source| ConfigError::InvalidProfile { name, source })
            })
            .collect()
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` (no
/// profiles) if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match load_config_file(path) {
        Err(ConfigError::NotFound(_)) => Ok(AppConfig::default()),
        other => other,
    }
}

/// Loads `AppConfig` from `path`, which must exist.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file is missing, otherwise as
/// [`load_config`].
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Resolves the platform config directory including the `vkvm` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("vkvm"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("vkvm"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("vkvm")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        // Fallback for unsupported platforms.
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
