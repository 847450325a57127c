//! Read-only access to remote OPeNDAP datasets through libnetcdf's DAP2 client.
//!
//! `netcdf::open` accepts an OPeNDAP URL as well as a local path, so the same reader
//! serves the THREDDS endpoints and local copies of them.

pub mod cf_time;
pub mod client;

use thiserror::Error;

pub use client::OpendapDataset;

/// Name of the time coordinate variable.
pub const TIME: &str = "time";
/// Name of the latitude coordinate variable.
pub const LAT: &str = "lat";
/// Name of the longitude coordinate variable.
pub const LON: &str = "lon";

#[derive(Error, Debug)]
pub enum DapError {
    #[error("netCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("blocking read did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("failed to decode data: {0}")]
    Decode(String),

    #[error("variable `{0}` not found")]
    MissingVariable(String),

    #[error("attribute `{attribute}` not found on `{variable}`")]
    MissingAttribute { variable: String, attribute: String },

    #[error("variable `{variable}` has unexpected type: {message}")]
    UnexpectedType { variable: String, message: String },

    #[error("time index {index} outside `{variable}` with {steps} steps")]
    TimeIndex {
        variable: String,
        index: usize,
        steps: usize,
    },

    #[error("unsupported time units `{0}`")]
    TimeUnits(String),
}

/// Result type for OPeNDAP operations.
pub type Result<T> = std::result::Result<T, DapError>;
