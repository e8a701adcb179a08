//! Serde mirror of the Ergast JSON responses and their conversion into the
//! typed records in [`crate::driver`].
//!
//! The external shape is kept as loose as the API is (everything optional,
//! numbers sent as strings) so that a missing piece surfaces as a
//! [`PaddockError::MissingField`] carrying the JSON path instead of a generic
//! deserialization failure.

use std::fmt;

use serde::Deserialize;

use crate::{
    PaddockError,
    driver::{Constructor, Driver, DriverStanding, Position, RaceEntry, RaceResult},
};

/// The API sends most numbers as strings but a few mirrors send real numbers.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MRData")]
    mr_data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct StandingsData {
    #[serde(rename = "StandingsTable")]
    standings_table: Option<StandingsTable>,
}

#[derive(Debug, Deserialize)]
struct StandingsTable {
    #[serde(rename = "StandingsLists", default)]
    standings_lists: Vec<StandingsList>,
}

#[derive(Debug, Deserialize)]
struct StandingsList {
    #[serde(rename = "DriverStandings", default)]
    driver_standings: Vec<WireDriverStanding>,
}

#[derive(Debug, Deserialize)]
struct WireDriverStanding {
    position: Option<Scalar>,
    points: Option<Scalar>,
    wins: Option<Scalar>,
    #[serde(rename = "Driver")]
    driver: Option<WireDriver>,
    #[serde(rename = "Constructors", default)]
    constructors: Vec<WireConstructor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDriver {
    driver_id: Option<String>,
    permanent_number: Option<Scalar>,
    code: Option<String>,
    url: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    date_of_birth: Option<String>,
    nationality: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConstructor {
    constructor_id: Option<String>,
    name: Option<String>,
    nationality: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RaceData {
    #[serde(rename = "RaceTable")]
    race_table: Option<RaceTable>,
}

#[derive(Debug, Deserialize)]
struct RaceTable {
    #[serde(rename = "Races")]
    races: Option<Vec<WireRace>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRace {
    season: Option<String>,
    round: Option<Scalar>,
    race_name: Option<String>,
    #[serde(rename = "Circuit")]
    circuit: Option<WireCircuit>,
    date: Option<String>,
    #[serde(rename = "Results", default)]
    results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCircuit {
    circuit_name: Option<String>,
    #[serde(rename = "Location")]
    location: Option<WireLocation>,
}

#[derive(Debug, Deserialize)]
struct WireLocation {
    locality: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResult {
    position: Option<Scalar>,
    position_text: Option<String>,
    points: Option<Scalar>,
    #[serde(rename = "Constructor")]
    constructor: Option<WireConstructor>,
    grid: Option<Scalar>,
    laps: Option<Scalar>,
    status: Option<String>,
}

/// Decodes a `driverStandings.json` body into the first standing of the first list.
pub fn parse_standing(url: &str, body: &str) -> Result<DriverStanding, PaddockError> {
    let envelope: Envelope<StandingsData> =
        serde_json::from_str(body).map_err(|e| PaddockError::MalformedBody {
            url: url.to_string(),
            source: e,
        })?;

    let table = required(envelope.mr_data, "MRData")?
        .standings_table;
    let table = required(table, "MRData.StandingsTable")?;
    let list = table
        .standings_lists
        .into_iter()
        .next()
        .ok_or_else(|| missing("MRData.StandingsTable.StandingsLists[0]"))?;
    let standing = list
        .driver_standings
        .into_iter()
        .next()
        .ok_or_else(|| missing("MRData.StandingsTable.StandingsLists[0].DriverStandings[0]"))?;

    standing.into_standing("MRData.StandingsTable.StandingsLists[0].DriverStandings[0]")
}

/// Decodes a `results.json` body into the full, ordered race list.
pub fn parse_races(url: &str, body: &str) -> Result<Vec<RaceResult>, PaddockError> {
    let envelope: Envelope<RaceData> =
        serde_json::from_str(body).map_err(|e| PaddockError::MalformedBody {
            url: url.to_string(),
            source: e,
        })?;

    let table = required(envelope.mr_data, "MRData")?.race_table;
    let races = required(required(table, "MRData.RaceTable")?.races, "MRData.RaceTable.Races")?;

    races
        .into_iter()
        .enumerate()
        .map(|(i, race)| race.into_race(&format!("MRData.RaceTable.Races[{i}]")))
        .collect()
}

impl WireDriverStanding {
    fn into_standing(self, path: &str) -> Result<DriverStanding, PaddockError> {
        let driver = required(self.driver, &format!("{path}.Driver"))?
            .into_driver(&format!("{path}.Driver"))?;
        let constructors = self
            .constructors
            .into_iter()
            .enumerate()
            .map(|(i, c)| c.into_constructor(&format!("{path}.Constructors[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DriverStanding {
            // drivers without a championship classification come back with no position
            position: self
                .position
                .map(|p| to_u32(p, &format!("{path}.position")))
                .transpose()?,
            points: self
                .points
                .map(|p| to_f32(p, &format!("{path}.points")))
                .transpose()?
                .unwrap_or(0.),
            wins: self
                .wins
                .map(|w| to_u32(w, &format!("{path}.wins")))
                .transpose()?
                .unwrap_or(0),
            driver,
            constructors,
        })
    }
}

impl WireDriver {
    fn into_driver(self, path: &str) -> Result<Driver, PaddockError> {
        Ok(Driver {
            driver_id: self.driver_id.unwrap_or_default(),
            code: self.code,
            permanent_number: self
                .permanent_number
                .map(|n| to_u32(n, &format!("{path}.permanentNumber")))
                .transpose()?,
            given_name: required(self.given_name, &format!("{path}.givenName"))?,
            family_name: required(self.family_name, &format!("{path}.familyName"))?,
            date_of_birth: self.date_of_birth.unwrap_or_default(),
            nationality: self.nationality.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
        })
    }
}

impl WireConstructor {
    fn into_constructor(self, path: &str) -> Result<Constructor, PaddockError> {
        Ok(Constructor {
            constructor_id: self.constructor_id.unwrap_or_default(),
            name: required(self.name, &format!("{path}.name"))?,
            nationality: self.nationality.unwrap_or_default(),
        })
    }
}

impl WireRace {
    fn into_race(self, path: &str) -> Result<RaceResult, PaddockError> {
        let round = to_u32(
            required(self.round, &format!("{path}.round"))?,
            &format!("{path}.round"),
        )?;
        let (circuit_name, locality, circuit_country) = match self.circuit {
            Some(circuit) => {
                let location = required(circuit.location, &format!("{path}.Circuit.Location"))?;
                (
                    circuit.circuit_name.unwrap_or_default(),
                    location.locality.unwrap_or_default(),
                    required(
                        location.country,
                        &format!("{path}.Circuit.Location.country"),
                    )?,
                )
            }
            None => return Err(missing(&format!("{path}.Circuit"))),
        };
        if self.results.is_empty() {
            return Err(missing(&format!("{path}.Results[0]")));
        }
        let results = self
            .results
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_entry(&format!("{path}.Results[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RaceResult {
            season: self.season.unwrap_or_default(),
            round,
            race_name: required(self.race_name, &format!("{path}.raceName"))?,
            circuit_name,
            locality,
            circuit_country,
            date: self.date.unwrap_or_default(),
            results,
        })
    }
}

impl WireResult {
    fn into_entry(self, path: &str) -> Result<RaceEntry, PaddockError> {
        let constructor = required(self.constructor, &format!("{path}.Constructor"))?
            .into_constructor(&format!("{path}.Constructor"))?;
        let grid = to_u32(
            required(self.grid, &format!("{path}.grid"))?,
            &format!("{path}.grid"),
        )?;
        let position = entry_position(self.position, self.position_text, path)?;

        Ok(RaceEntry {
            constructor_name: constructor.name,
            grid,
            position,
            points: self
                .points
                .map(|p| to_f32(p, &format!("{path}.points")))
                .transpose()?
                .unwrap_or(0.),
            laps: self
                .laps
                .map(|l| to_u32(l, &format!("{path}.laps")))
                .transpose()?
                .unwrap_or(0),
            status: self.status.unwrap_or_default(),
        })
    }
}

/// `positionText` carries the status code (`R`, `D`, ...) for non-finishers while
/// `position` still holds the order of retirement, so a non-numeric text wins.
fn entry_position(
    position: Option<Scalar>,
    position_text: Option<String>,
    path: &str,
) -> Result<Position, PaddockError> {
    if let Some(text) = position_text.as_deref().filter(|t| !t.trim().is_empty()) {
        if let status @ Position::Status(_) = Position::parse(text) {
            return Ok(status);
        }
    }
    match (position, position_text) {
        (Some(position), _) => Ok(Position::parse(&position.to_string())),
        (None, Some(text)) => Ok(Position::parse(&text)),
        (None, None) => Err(missing(&format!("{path}.position"))),
    }
}

fn missing(path: &str) -> PaddockError {
    PaddockError::MissingField {
        path: path.to_string(),
    }
}

fn required<T>(value: Option<T>, path: &str) -> Result<T, PaddockError> {
    value.ok_or_else(|| missing(path))
}

fn to_u32(value: Scalar, path: &str) -> Result<u32, PaddockError> {
    let invalid = |value: &Scalar| PaddockError::InvalidField {
        path: path.to_string(),
        value: value.to_string(),
    };
    match &value {
        Scalar::Int(n) => u32::try_from(*n).map_err(|_| invalid(&value)),
        Scalar::Float(_) => Err(invalid(&value)),
        Scalar::Text(text) => text.trim().parse::<u32>().map_err(|_| invalid(&value)),
    }
}

fn to_f32(value: Scalar, path: &str) -> Result<f32, PaddockError> {
    match &value {
        Scalar::Int(n) => Ok(*n as f32),
        Scalar::Float(n) => Ok(*n as f32),
        Scalar::Text(text) => text
            .trim()
            .parse::<f32>()
            .map_err(|_| PaddockError::InvalidField {
                path: path.to_string(),
                value: value.to_string(),
            }),
    }
}
