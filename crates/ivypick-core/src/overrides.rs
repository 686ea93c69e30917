//! Operator-maintained corrections applied on top of the automatic mapping.
//!
//! An override pins a raw picking-list name (optionally for one platform) to a
//! canonical product, or removes it from the report when `product` is absent.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::platform::{Column, Platform};
use crate::{strip_whitespace, ConfigError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOverride {
    /// Raw picking-list name; compared with whitespace removed.
    pub name: String,
    /// Restricts the override to one platform when set.
    #[serde(default)]
    pub source: Option<Platform>,
    /// Canonical product to count the line as. `None` drops the line.
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub column: Option<Column>,
    #[serde(default)]
    pub spec: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualOverrides {
    #[serde(default)]
    pub overrides: Vec<ManualOverride>,
}

impl ManualOverrides {
    /// Finds the override for a line. A platform-specific entry wins over a
    /// platform-agnostic one.
    #[must_use]
    pub fn find(&self, name: &str, source: Platform) -> Option<&ManualOverride> {
        let compact = strip_whitespace(name);
        let mut fallback = None;

        for entry in &self.overrides {
            if strip_whitespace(&entry.name) != compact {
                continue;
            }
            match entry.source {
                Some(s) if s == source => return Some(entry),
                Some(_) => {}
                None => {
                    if fallback.is_none() {
                        fallback = Some(entry);
                    }
                }
            }
        }

        fallback
    }
}

/// Load and validate manual overrides from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_overrides(path: &Path) -> Result<ManualOverrides, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::OverridesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let overrides: ManualOverrides =
        serde_yaml::from_str(&content).map_err(ConfigError::OverridesFileParse)?;

    validate_overrides(&overrides)?;

    Ok(overrides)
}

fn validate_overrides(overrides: &ManualOverrides) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in &overrides.overrides {
        let compact = strip_whitespace(&entry.name);
        if compact.is_empty() {
            return Err(ConfigError::Validation(
                "override name must be non-empty".to_string(),
            ));
        }

        if entry
            .product
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "override '{}' has an empty product; omit the field to drop the line",
                entry.name
            )));
        }

        if !seen.insert((compact, entry.source)) {
            return Err(ConfigError::Validation(format!(
                "duplicate override for '{}'",
                entry.name
            )));
        }
    }

    Ok(())
}
