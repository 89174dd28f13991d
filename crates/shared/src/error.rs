use thiserror::Error;

use crate::models::{FlagRule, PostKey, Year};

/// Why a single row of the trading post table was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PostError {
    #[error("missing value for {0}")]
    Missing(&'static str),

    #[error("{field} is not a number: '{value}'")]
    NotNumeric { field: &'static str, value: String },

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("start year {start} is after end year {end}")]
    InvertedRange { start: Year, end: Year },

    #[error("duplicate trading post {0}")]
    Duplicate(PostKey),

    #[error("unreadable row: {0}")]
    Malformed(String),
}

/// The trading post table as a whole could not be read.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
}

#[derive(Error, Debug)]
pub enum FlagConfigError {
    #[error("invalid flag configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empire '{empire}' has an empty interval [{from}, {to})")]
    EmptyInterval { empire: String, from: Year, to: Year },

    #[error(
        "empire '{empire}' has overlapping rules [{}, {}) '{}' and [{}, {}) '{}'",
        .first.from, .first.to, .first.icon, .second.from, .second.to, .second.icon
    )]
    Overlap {
        empire: String,
        first: FlagRule,
        second: FlagRule,
    },
}

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("invalid topology: {0}")]
    Json(#[from] serde_json::Error),

    #[error("topology has no object named '{0}'")]
    MissingObject(String),

    #[error("arc index {0} out of range")]
    ArcOutOfRange(i64),
}
