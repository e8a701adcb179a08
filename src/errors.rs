// Error types for paddock

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum PaddockError {
    // Errors talking to the statistics API
    #[snafu(display("Could not build HTTP client"))]
    HttpClientBuild { source: reqwest::Error },
    #[snafu(display("Request to {url} failed"))]
    HttpRequest { url: String, source: reqwest::Error },
    #[snafu(display("Request to {url} returned HTTP {status}"))]
    HttpStatus { url: String, status: u16 },

    // Errors decoding API payloads
    #[snafu(display("Malformed response body from {url}"))]
    MalformedBody {
        url: String,
        source: serde_json::Error,
    },
    #[snafu(display("Missing field in response: {path}"))]
    MissingField { path: String },
    #[snafu(display("Invalid value for {path}: {value}"))]
    InvalidField { path: String, value: String },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Flag table errors
    #[snafu(display("Error reading flag table"))]
    FlagTableIOError { source: io::Error },
    #[snafu(display("Error parsing flag table"))]
    FlagTableParseError { source: serde_json::Error },

    // Runtime and UI errors
    #[snafu(display("Could not start async runtime"))]
    RuntimeError { source: io::Error },
    #[snafu(display("User interface error: {description}"))]
    UiError { description: String },
}

impl PaddockError {
    /// Short, user-facing explanation of what went wrong, without source chains.
    pub fn summary(&self) -> String {
        match self {
            Self::HttpRequest { source, .. } if source.is_timeout() => {
                "The statistics service did not answer in time".to_string()
            }
            Self::HttpRequest { .. } | Self::HttpClientBuild { .. } => {
                "Could not reach the statistics service".to_string()
            }
            Self::HttpStatus { status: 404, .. } => "Driver not found".to_string(),
            Self::HttpStatus { status, .. } => {
                format!("The statistics service answered with HTTP {status}")
            }
            Self::MalformedBody { .. } => "The statistics service sent an unreadable response".to_string(),
            Self::MissingField { .. } | Self::InvalidField { .. } => {
                format!("No season data available: {self}")
            }
            other => other.to_string(),
        }
    }
}
