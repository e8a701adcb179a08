use std::fmt;

use serde::{Deserialize, Serialize};

/// A competitor as described by the statistics API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_id: String,
    /// Three letter abbreviation, e.g. `HAM`. Older drivers have none.
    pub code: Option<String>,
    pub permanent_number: Option<u32>,
    pub given_name: String,
    pub family_name: String,
    /// ISO date as sent by the API (`1985-01-07`)
    pub date_of_birth: String,
    pub nationality: String,
    /// Biography link
    pub url: String,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Constructor {
    pub constructor_id: String,
    pub name: String,
    pub nationality: String,
}

/// A driver's championship standing for one season.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverStanding {
    /// Championship position. Missing for drivers that were never classified.
    pub position: Option<u32>,
    pub points: f32,
    pub wins: u32,
    pub driver: Driver,
    /// Teams the driver raced for in the season, in API order
    pub constructors: Vec<Constructor>,
}

impl DriverStanding {
    /// The team shown on the driver card: the first constructor of the season.
    pub fn team(&self) -> Option<&str> {
        self.constructors.first().map(|c| c.name.as_str())
    }
}

/// Final classification in a race.
///
/// Variant order matters: the derived `Ord` puts every classified position
/// before any status code, which is the order used when sorting the results table.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    Classified(u32),
    /// Non-finish status code such as `R` (retired), `D` (disqualified),
    /// `E` (excluded), `W` (withdrawn), `F` (failed to qualify) or `N` (not classified)
    Status(String),
}

impl Position {
    /// Parses a raw position value. Positive integers are classified positions,
    /// anything else is kept verbatim as a status code.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.parse::<u32>() {
            Ok(position) if position > 0 => Self::Classified(position),
            _ if value.is_empty() => Self::Status("-".to_string()),
            _ => Self::Status(value.to_string()),
        }
    }

    pub fn classified(&self) -> Option<u32> {
        match self {
            Self::Classified(position) => Some(*position),
            Self::Status(_) => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classified(position) => write!(f, "{position}"),
            Self::Status(code) => f.write_str(code),
        }
    }
}

/// The driver's own result in a race.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceEntry {
    pub constructor_name: String,
    /// Starting slot, 0 means pit lane start
    pub grid: u32,
    pub position: Position,
    pub points: f32,
    pub laps: u32,
    /// Free text status, e.g. `Finished`, `+1 Lap`, `Gearbox`
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub season: String,
    pub round: u32,
    pub race_name: String,
    pub circuit_name: String,
    pub locality: String,
    pub circuit_country: String,
    pub date: String,
    /// Never empty once decoded, the first entry is the driver's own result
    pub results: Vec<RaceEntry>,
}

impl RaceResult {
    pub fn entry(&self) -> Option<&RaceEntry> {
        self.results.first()
    }
}

/// Everything the driver view renders, fetched as one unit.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverProfile {
    pub standing: DriverStanding,
    pub races: Vec<RaceResult>,
}
