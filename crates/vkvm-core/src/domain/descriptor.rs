//! `+`-joined key/button descriptors such as `Alt_L+Tab`.

use std::fmt;

use crate::registry::{DefinitionRegistry, EventDefinition, RegistryError};

use super::profile::ProfileError;

/// Separator between names in a descriptor.
pub const SEPARATOR: char = '+';

/// A parsed descriptor: one name for a simple key/button, several for a chord.
///
/// Names are kept in the order written.  Duplicates are dropped, so
/// `a+a` is the single-name descriptor `a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    names: Vec<String>,
}

impl Descriptor {
    /// Parses `text`, trimming whitespace around each name.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MalformedDescriptor`] if the text is empty or
    /// contains an empty segment (`"a++b"`, `"+a"`).
    pub fn parse(text: &str) -> Result<Self, ProfileError> {
        let mut names: Vec<String> = Vec::new();
        for segment in text.split(SEPARATOR) {
            let name = segment.trim();
            if name.is_empty() {
                return Err(ProfileError::MalformedDescriptor(text.to_string()));
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves every name through `registry`, stamping `is_press`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] encountered.
    pub fn resolve(
        &self,
        registry: &DefinitionRegistry,
        is_press: bool,
    ) -> Result<Vec<EventDefinition>, RegistryError> {
        self.names
            .iter()
            .map(|name| registry.by_name(name).map(|def| def.with_press(is_press)))
            .collect()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}
