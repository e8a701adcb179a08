use std::{collections::HashMap, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::PaddockError;

const BUILTIN_FLAGS: &str = include_str!("../assets/flags.json");

/// One row of the flag lookup table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlagEntry {
    /// Two letter ISO 3166 code
    pub code: String,
    /// Demonym used for drivers, e.g. `British`
    pub nationality: String,
    /// Country names used for circuits, e.g. `UK`
    #[serde(default)]
    pub countries: Vec<String>,
}

/// Maps nationalities and country names to two letter flag codes.
#[derive(Clone, Debug, Default)]
pub struct FlagTable {
    codes: HashMap<String, String>,
}

impl FlagTable {
    pub fn from_entries(entries: impl IntoIterator<Item = FlagEntry>) -> Self {
        let mut codes = HashMap::new();
        for entry in entries {
            let code = entry.code.trim().to_uppercase();
            codes.insert(normalize(&entry.nationality), code.clone());
            for country in &entry.countries {
                codes.insert(normalize(country), code.clone());
            }
        }
        Self { codes }
    }

    pub fn from_json(json: &str) -> Result<Self, PaddockError> {
        let entries: Vec<FlagEntry> = serde_json::from_str(json)
            .map_err(|e| PaddockError::FlagTableParseError { source: e })?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_file(path: &Path) -> Result<Self, PaddockError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PaddockError::FlagTableIOError { source: e })?;
        Self::from_json(&json)
    }

    /// Table shipped with the application.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_FLAGS).unwrap_or_else(|e| {
            debug!("Built-in flag table is invalid: {}", e);
            Self::default()
        })
    }

    /// Resolves a nationality (`British`) or a country name (`UK`) to its flag code.
    /// Unknown names resolve to `None` and callers render a neutral badge instead.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.codes.get(&normalize(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
