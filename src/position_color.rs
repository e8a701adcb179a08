use std::fmt;

use crate::driver::Position;

const POINTS_POSITIONS: u32 = 10;

/// Color band for a finishing or grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PositionColor {
    Gold,
    Silver,
    Bronze,
    /// Scored championship points
    Points,
    /// Classified outside the points
    Finished,
    /// Retired, disqualified, excluded and every other status code
    NonFinish,
}

impl PositionColor {
    /// Maps a raw position value as sent by the API, e.g. `"3"` or `"R"`.
    pub fn for_value(value: &str) -> Self {
        Self::from(&Position::parse(value))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
            Self::Points => "points",
            Self::Finished => "finished",
            Self::NonFinish => "non-finish",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Gold => (212, 175, 55),
            Self::Silver => (168, 169, 173),
            Self::Bronze => (176, 110, 60),
            Self::Points => (46, 125, 50),
            Self::Finished => (72, 72, 72),
            Self::NonFinish => (155, 57, 34),
        }
    }
}

impl From<&Position> for PositionColor {
    fn from(position: &Position) -> Self {
        match position {
            Position::Classified(1) => Self::Gold,
            Position::Classified(2) => Self::Silver,
            Position::Classified(3) => Self::Bronze,
            Position::Classified(p) if *p <= POINTS_POSITIONS => Self::Points,
            Position::Classified(_) => Self::Finished,
            Position::Status(_) => Self::NonFinish,
        }
    }
}

impl fmt::Display for PositionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
