//! # Ambient Settings
//!
//! A flat map of string properties that supplies defaults to every writer
//! created in the process. Settings can be built in code, from `key=value`
//! pairs, or loaded from a TOML file:
//!
//! ```toml
//! # orc.toml
//! [orc]
//! compress = "SNAPPY"
//! "compress.size" = 65536
//! stripe.size = 67108864
//! row.index.stride = 0
//!
//! [hive.exec.orc]
//! write.format = "0.11"
//! memory.pool = 0.25
//! ```
//!
//! Tables are flattened into dotted keys, so the file above sets
//! `orc.compress`, `orc.stripe.size`, `hive.exec.orc.write.format` and so on.
//! A key that is also the prefix of another key (`orc.compress` and
//! `orc.compress.size`) has to be quoted in TOML. The recognized keys and
//! their defaults live in [`keys`].
//!
//! Lookups never fail on their own. Typed getters hand back an
//! [`InvalidSetting`] for text that does not parse, and the caller decides when
//! to surface it.

pub mod keys;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Errors that can occur while loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// I/O error reading a settings file
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML syntax error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A TOML value that cannot be expressed as a single property
    #[error("Unsupported value for setting {0}: only strings, numbers and booleans are allowed")]
    UnsupportedValue(String),

    /// A `key=value` pair without `=` or with an empty key
    #[error("Malformed setting {0:?}, expected key=value")]
    MalformedPair(String),
}

/// A property whose text does not parse as the expected type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value {value:?} for setting {key}")]
pub struct InvalidSetting {
    /// Property name
    pub key: String,
    /// Raw property text
    pub value: String,
}

/// Process-wide string properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Empty settings: every lookup falls back to its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, returning the updated settings
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Set a property in place
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.insert(key.into(), value.to_string());
    }

    /// Remove a property, returning its previous text
    pub fn unset(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Raw text of a property
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether the property is present
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of properties set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no properties are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over properties in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a property, `Ok(None)` when it is absent
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, InvalidSetting> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| InvalidSetting {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Parse an unsigned integer property, falling back to `default`
    pub fn get_u64_or(&self, key: &str, default: u64) -> Result<u64, InvalidSetting> {
        Ok(self.get_parsed(key)?.unwrap_or(default))
    }

    /// Parse an unsigned integer property, falling back to `default`
    pub fn get_u32_or(&self, key: &str, default: u32) -> Result<u32, InvalidSetting> {
        Ok(self.get_parsed(key)?.unwrap_or(default))
    }

    /// Parse a size property, falling back to `default`
    pub fn get_usize_or(&self, key: &str, default: usize) -> Result<usize, InvalidSetting> {
        Ok(self.get_parsed(key)?.unwrap_or(default))
    }

    /// Parse a floating point property, falling back to `default`
    pub fn get_f64_or(&self, key: &str, default: f64) -> Result<f64, InvalidSetting> {
        Ok(self.get_parsed(key)?.unwrap_or(default))
    }

    /// Parse a boolean property (`true`/`false`, any case), falling back to `default`
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, InvalidSetting> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => {
                let text = raw.trim();
                if text.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(InvalidSetting {
                        key: key.to_string(),
                        value: raw.to_string(),
                    })
                }
            }
        }
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from a TOML string, flattening tables into dotted keys.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut settings = Self::new();
        flatten_into(&mut settings, "", &table)?;
        Ok(settings)
    }

    /// Apply `key=value` pairs on top of these settings, later pairs winning.
    pub fn apply_pairs<I, S>(&mut self, pairs: I) -> Result<(), SettingsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pair in pairs {
            let (key, value) = parse_pair(pair.as_ref())?;
            self.set(key, value);
        }
        Ok(())
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = Self::new();
        settings.extend(iter);
        settings
    }
}

impl<K: Into<String>, V: ToString> Extend<(K, V)> for Settings {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Split `key=value` at the first `=`, trimming the key.
pub fn parse_pair(pair: &str) -> Result<(String, String), SettingsError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(SettingsError::MalformedPair(pair.to_string())),
    }
}

fn flatten_into(
    settings: &mut Settings,
    prefix: &str,
    table: &toml::Table,
) -> Result<(), SettingsError> {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::Table(inner) => flatten_into(settings, &full_key, inner)?,
            toml::Value::String(s) => settings.set(full_key, s),
            toml::Value::Integer(i) => settings.set(full_key, i),
            toml::Value::Float(f) => settings.set(full_key, f),
            toml::Value::Boolean(b) => settings.set(full_key, b),
            toml::Value::Array(_) | toml::Value::Datetime(_) => {
                return Err(SettingsError::UnsupportedValue(full_key));
            }
        }
    }
    Ok(())
}
