//! Remote profiles and their remap rules.
//!
//! A [`ProfileSpec`] is what configuration loading produces: plain strings,
//! nothing checked yet.  [`Profile::from_spec`] validates it against the
//! [`DefinitionRegistry`] and compiles every descriptor into
//! [`EventDefinition`] templates, so that nothing in the dispatch path ever
//! has to look a name up again.
//!
//! # Validation rules
//!
//! - Every name in the hotkey and in every rule must be registered.
//! - No hotkey name may appear on either side of any rule: a profile cannot
//!   remap its own switch/exit key.
//! - Scroll speed must be at least 1.

use std::collections::HashSet;
use std::time::Duration;

use thiserror::Error;

use crate::registry::{is_modifier, DefinitionRegistry, EventDefinition, RegistryError};

use super::descriptor::Descriptor;

/// Error type for profile validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("malformed descriptor {0:?}")]
    MalformedDescriptor(String),
    #[error(transparent)]
    Lookup(#[from] RegistryError),
    #[error("profile {profile:?} remaps {name:?}, which is part of its own hotkey")]
    HotkeyRemapped { profile: String, name: String },
    #[error("profile {profile:?} has scroll speed 0; it must be at least 1")]
    InvalidScrollSpeed { profile: String },
    #[error("profile {0:?} is defined more than once")]
    Duplicate(String),
}

/// Where a profile connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub credential: Option<String>,
}

/// Unvalidated profile as read from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSpec {
    pub name: String,
    pub target: ConnectionTarget,
    pub hotkey: String,
    /// `(from, to)` descriptor pairs in declaration order.
    pub keymap: Vec<(String, String)>,
    pub scroll_speed: u8,
    pub settle_delay: Duration,
    pub connect_timeout: Duration,
}

/// A compiled remap rule.
///
/// `from` is order-insignificant for matching; `to` is emitted in order.
/// Both hold release-state templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapRule {
    pub from: Vec<EventDefinition>,
    pub to: Vec<EventDefinition>,
}

impl RemapRule {
    /// Compiles a `(from, to)` descriptor pair.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] if either side is malformed or unresolvable.
    pub fn compile(
        from: &str,
        to: &str,
        registry: &DefinitionRegistry,
    ) -> Result<Self, ProfileError> {
        Ok(Self {
            from: Descriptor::parse(from)?.resolve(registry, false)?,
            to: Descriptor::parse(to)?.resolve(registry, false)?,
        })
    }

    /// `true` if `from` and `names` contain the same names (any order).
    pub fn matches(&self, names: &[&str]) -> bool {
        self.from.len() == names.len()
            && self.from.iter().all(|def| names.contains(&def.name.as_str()))
    }

    /// `true` for a one-name-to-one-name rule.
    pub fn is_simple(&self) -> bool {
        self.from.len() == 1 && self.to.len() == 1
    }

    /// Names on the `from` side that are modifiers, in declaration order.
    pub fn modifiers_in_from(&self) -> impl Iterator<Item = &str> {
        self.from
            .iter()
            .map(|def| def.name.as_str())
            .filter(|name| is_modifier(name))
    }

    fn mentions(&self, name: &str) -> bool {
        self.from.iter().chain(&self.to).any(|def| def.name == name)
    }
}

/// A validated profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub target: ConnectionTarget,
    pub hotkey: Descriptor,
    /// Hotkey definitions stamped as pressed.
    pub hotkey_defs: Vec<EventDefinition>,
    pub rules: Vec<RemapRule>,
    pub scroll_speed: u8,
    pub settle_delay: Duration,
    pub connect_timeout: Duration,
}

impl Profile {
    /// Validates and compiles `spec`.
    ///
    /// # Errors
    ///
    /// See the module documentation for the rules enforced.
    pub fn from_spec(spec: ProfileSpec, registry: &DefinitionRegistry) -> Result<Self, ProfileError> {
        let hotkey = Descriptor::parse(&spec.hotkey)?;
        let hotkey_defs = hotkey.resolve(registry, true)?;

        let rules = spec
            .keymap
            .iter()
            .map(|(from, to)| RemapRule::compile(from, to, registry))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(name) = hotkey
            .names()
            .iter()
            .find(|name| rules.iter().any(|rule| rule.mentions(name)))
        {
            return Err(ProfileError::HotkeyRemapped {
                profile: spec.name,
                name: name.clone(),
            });
        }

        if spec.scroll_speed == 0 {
            return Err(ProfileError::InvalidScrollSpeed { profile: spec.name });
        }

        Ok(Self {
            name: spec.name,
            target: spec.target,
            hotkey,
            hotkey_defs,
            rules,
            scroll_speed: spec.scroll_speed,
            settle_delay: spec.settle_delay,
            connect_timeout: spec.connect_timeout,
        })
    }

    /// `true` if every hotkey definition is present (as a press) in `defs`.
    ///
    /// Extra entries in `defs` do not prevent a match.
    pub fn hotkey_matches(&self, defs: &[EventDefinition]) -> bool {
        self.hotkey_defs.iter().all(|hotkey| {
            defs.iter()
                .any(|def| def.name == hotkey.name && def.is_press == hotkey.is_press)
        })
    }
}

/// Validates every spec, aborting on the first failure.
///
/// # Errors
///
/// Returns the first [`ProfileError`], or [`ProfileError::Duplicate`] if two
/// specs share a name.
pub fn load_profiles(
    specs: impl IntoIterator<Item = ProfileSpec>,
    registry: &DefinitionRegistry,
) -> Result<Vec<Profile>, ProfileError> {
    let mut seen = HashSet::new();
    let mut profiles = Vec::new();
    for spec in specs {
        if !seen.insert(spec.name.clone()) {
            return Err(ProfileError::Duplicate(spec.name));
        }
        profiles.push(Profile::from_spec(spec, registry)?);
    }
    Ok(profiles)
}
