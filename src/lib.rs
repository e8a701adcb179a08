// Library interface for paddock
// The binary renders these models with egui or in the terminal

pub mod card;
pub mod config;
pub mod driver;
pub mod ergast;
pub mod errors;
pub mod flags;
pub mod position_color;
pub mod table;
pub mod view;

// Re-export commonly used types
pub use config::{AppConfig, StoredConfig};
pub use driver::{DriverProfile, DriverStanding, Position, RaceResult};
pub use ergast::{DriverDataSource, ErgastClient};
pub use errors::PaddockError;
pub use flags::FlagTable;
pub use position_color::PositionColor;
pub use view::{ErrorReporter, LogReporter, ViewController, ViewState};
