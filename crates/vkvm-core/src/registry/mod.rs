//! Definition registry: bidirectional lookup between symbolic key/button names
//! and their numeric codes.
//!
//! Keys are identified by X11 KeySym, buttons by X11 button number.  A name
//! is resolved against the key table first and the button table second, so a
//! name that exists in both (none do today) would always resolve to the key.
//!
//! The registry is built once from the static tables in [`keysyms`] and
//! [`buttons`] and is immutable afterwards.  [`DefinitionRegistry::global`]
//! returns the shared process-wide instance.

pub mod buttons;
pub mod keysyms;

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use buttons::{MOTION, SCROLL_DOWN, SCROLL_UP};

/// Names treated as holdable, state-bearing modifier keys.
pub const MODIFIER_NAMES: &[&str] = &[
    "Control_L",
    "Control_R",
    "Alt_L",
    "Alt_R",
    "Super_L",
    "Super_R",
    "Shift_L",
    "Shift_R",
    "Meta_L",
    "Meta_R",
    "Caps_Lock",
];

/// Returns `true` if `name` is one of [`MODIFIER_NAMES`].
pub fn is_modifier(name: &str) -> bool {
    MODIFIER_NAMES.contains(&name)
}

/// Error type for registry lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no key or button definition found for name {0:?}")]
    UnknownName(String),
    #[error("no {kind} definition found for code {code:#x}")]
    UnknownCode { code: u32, kind: &'static str },
}

/// A single key or button transition.
///
/// `key` is meaningful only when `is_key` is set, `button` only when it is
/// not.  Two definitions are equal iff every field matches, so a press and a
/// release of the same key are different values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDefinition {
    pub name: String,
    pub key: u32,
    pub button: u8,
    pub is_key: bool,
    pub is_press: bool,
}

impl EventDefinition {
    /// Returns a copy of this definition with `is_press` replaced.
    pub fn with_press(&self, is_press: bool) -> Self {
        Self {
            is_press,
            ..self.clone()
        }
    }

    /// `true` for the two wheel pseudo-buttons.
    pub fn is_scroll(&self) -> bool {
        !self.is_key && (self.name == SCROLL_UP || self.name == SCROLL_DOWN)
    }

    /// `true` if the name is a modifier.
    pub fn is_modifier(&self) -> bool {
        is_modifier(&self.name)
    }

    /// Pointer button mask for this definition (`1 << (button - 1)`).
    ///
    /// Keys and the motion pseudo-button yield 0.
    pub fn button_mask(&self) -> u8 {
        if self.is_key || self.button == 0 || self.button > 8 {
            return 0;
        }
        1 << (self.button - 1)
    }
}

/// Name ↔ code lookup tables.
#[derive(Debug)]
pub struct DefinitionRegistry {
    keys_by_name: HashMap<&'static str, u32>,
    keys_by_code: HashMap<u32, &'static str>,
    buttons_by_name: HashMap<&'static str, u8>,
    buttons_by_code: HashMap<u8, &'static str>,
}

impl DefinitionRegistry {
    /// Builds a registry from the X11 KeySym and button tables.
    pub fn new() -> Self {
        Self::from_tables(keysyms::KEYSYMS, buttons::BUTTONS)
    }

    /// Builds a registry from arbitrary tables.
    ///
    /// Later duplicates of a name or code overwrite earlier ones.
    pub fn from_tables(keys: &[(&'static str, u32)], buttons: &[(&'static str, u8)]) -> Self {
        Self {
            keys_by_name: keys.iter().copied().collect(),
            keys_by_code: keys.iter().map(|&(n, c)| (c, n)).collect(),
            buttons_by_name: buttons.iter().copied().collect(),
            buttons_by_code: buttons.iter().map(|&(n, c)| (c, n)).collect(),
        }
    }

    /// Returns the shared registry built from the default tables.
    pub fn global() -> &'static DefinitionRegistry {
        static REGISTRY: OnceLock<DefinitionRegistry> = OnceLock::new();
        REGISTRY.get_or_init(DefinitionRegistry::new)
    }

    /// Looks up `name` and returns a release-state template definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownName`] if neither table has `name`.
    pub fn by_name(&self, name: &str) -> Result<EventDefinition, RegistryError> {
        if let Some((&name, &key)) = self.keys_by_name.get_key_value(name) {
            return Ok(EventDefinition {
                name: name.to_string(),
                key,
                button: 0,
                is_key: true,
                is_press: false,
            });
        }
        if let Some((&name, &button)) = self.buttons_by_name.get_key_value(name) {
            return Ok(EventDefinition {
                name: name.to_string(),
                key: 0,
                button,
                is_key: false,
                is_press: false,
            });
        }
        Err(RegistryError::UnknownName(name.to_string()))
    }

    /// Looks up the name registered for `code`.
    ///
    /// `code` is a KeySym when `is_key` is set, otherwise a button number.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCode`] if no name is registered.
    pub fn by_code(&self, code: u32, is_key: bool) -> Result<&'static str, RegistryError> {
        let found = if is_key {
            self.keys_by_code.get(&code).copied()
        } else {
            u8::try_from(code)
                .ok()
                .and_then(|b| self.buttons_by_code.get(&b).copied())
        };
        found.ok_or(RegistryError::UnknownCode {
            code,
            kind: if is_key { "key" } else { "button" },
        })
    }

    /// Builds a full definition for a raw code with the given press state.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCode`] if no name is registered.
    pub fn definition_for_code(
        &self,
        code: u32,
        is_key: bool,
        is_press: bool,
    ) -> Result<EventDefinition, RegistryError> {
        let name = self.by_code(code, is_key)?;
        let mut def = self.by_name(name)?;
        def.is_press = is_press;
        Ok(def)
    }

    /// Iterates over every registered name, keys first.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keys_by_name
            .keys()
            .chain(self.buttons_by_name.keys())
            .copied()
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
