use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in alias table. Declaration order is match priority.
const BUILTIN_ALIASES: &[(&str, &[&str])] = &[
    ("usa", &["United States of America", "United States"]),
    ("uk", &["United Kingdom"]),
    ("india", &["India"]),
    ("germany", &["Germany"]),
    ("france", &["France"]),
    ("italy", &["Italy"]),
    ("spain", &["Spain"]),
    ("netherlands", &["Netherlands"]),
    ("switzerland", &["Switzerland"]),
    ("japan", &["Japan"]),
    ("china", &["China"]),
    ("canada", &["Canada"]),
    ("australia", &["Australia"]),
    ("ireland", &["Ireland"]),
    ("poland", &["Poland"]),
    ("denmark", &["Denmark"]),
    ("greece", &["Greece"]),
    ("mexico", &["Mexico"]),
    ("belgium", &["Belgium"]),
    ("sweden", &["Sweden"]),
    ("finland", &["Finland"]),
    ("israel", &["Israel"]),
    ("south korea", &["South Korea", "Korea"]),
    ("hong kong", &["Hong Kong"]),
    ("brazil", &["Brazil"]),
    ("austria", &["Austria"]),
    ("hungary", &["Hungary"]),
    ("portugal", &["Portugal"]),
    ("norway", &["Norway"]),
    ("russia", &["Russia"]),
];

#[derive(Debug, Error)]
pub enum AliasTableError {
    #[error("could not read alias table `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse alias table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("alias table is invalid: {0}")]
    Validation(String),
}

/// One canonical country code and the display names it accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryAlias {
    pub code: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AliasTableFile {
    #[serde(default)]
    country: Vec<CountryAlias>,
}

/// Maps free-text country labels onto canonical lowercase codes.
///
/// A code matches when the lowercased label equals one of its aliases, contains
/// one, or is contained in one. The first matching entry in table order wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryResolver {
    entries: Vec<NormalizedEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct NormalizedEntry {
    code: String,
    aliases: Vec<String>,
}

impl Default for CountryResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CountryResolver {
    pub fn builtin() -> Self {
        let entries = BUILTIN_ALIASES
            .iter()
            .map(|(code, aliases)| CountryAlias {
                code: (*code).to_string(),
                aliases: aliases.iter().map(|alias| (*alias).to_string()).collect(),
            })
            .collect();
        Self::from_entries(entries)
    }

    pub fn new(entries: Vec<CountryAlias>) -> Result<Self, AliasTableError> {
        validate_entries(&entries)?;
        Ok(Self::from_entries(entries))
    }

    /// Parses `[[country]]` tables with `code` and `aliases` keys.
    pub fn from_toml_str(raw: &str) -> Result<Self, AliasTableError> {
        let file = toml::from_str::<AliasTableFile>(raw)?;
        Self::new(file.country)
    }

    pub fn load(path: &Path) -> Result<Self, AliasTableError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| AliasTableError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn resolve(&self, label: &str) -> Option<&str> {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|entry| {
                entry.aliases.iter().any(|alias| {
                    needle == *alias || needle.contains(alias.as_str()) || alias.contains(&needle)
                })
            })
            .map(|entry| entry.code.as_str())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn from_entries(entries: Vec<CountryAlias>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| NormalizedEntry {
                code: entry.code.trim().to_lowercase(),
                aliases: entry
                    .aliases
                    .iter()
                    .map(|alias| alias.trim().to_lowercase())
                    .filter(|alias| !alias.is_empty())
                    .collect(),
            })
            .collect();
        Self { entries }
    }
}

fn validate_entries(entries: &[CountryAlias]) -> Result<(), AliasTableError> {
    if entries.is_empty() {
        return Err(AliasTableError::Validation(
            "at least one [[country]] entry is required".to_string(),
        ));
    }

    let mut seen_codes = HashSet::new();
    for entry in entries {
        let code = entry.code.trim().to_lowercase();
        if code.is_empty() {
            return Err(AliasTableError::Validation("country code must not be empty".to_string()));
        }
        if !seen_codes.insert(code.clone()) {
            return Err(AliasTableError::Validation(format!("duplicate country code `{code}`")));
        }
        if entry.aliases.iter().all(|alias| alias.trim().is_empty()) {
            return Err(AliasTableError::Validation(format!(
                "country `{code}` needs at least one non-empty alias"
            )));
        }
    }

    Ok(())
}
