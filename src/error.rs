// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    /// `/config` carried no dataframe wide enough to be the MASE table.
    #[error("could not find the MASE dataframe in the /config response")]
    DataNotFound,

    #[error("job submission returned no event_id")]
    SubmissionError,

    #[error("timed out waiting for CRPS data after {attempts} attempts")]
    PollTimeout { attempts: u32 },

    #[error("input file not found: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("placeholder '{0}' not found in template")]
    PlaceholderMissing(String),

    #[error("malformed table: {0}")]
    InvalidTable(String),

    #[error("malformed cutoff '{0}', expected YYYY-MM-DD-HH")]
    InvalidCutoff(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
