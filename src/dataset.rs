//! The read-only view of a gridded dataset that the daily driver works against.

use async_trait::async_trait;

use crate::{field::RawSlice, opendap::Result};

/// Latitude and longitude cell centres shared by every panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

#[async_trait]
pub trait Dataset: Send + Sync {
    /// Human readable name used in errors and logs (normally the endpoint URL).
    fn label(&self) -> &str;

    /// The time coordinate as ISO-8601 UTC timestamps (`YYYY-MM-DDTHH:MM:SSZ`).
    async fn time_coordinate(&self) -> Result<Vec<String>>;

    async fn coordinates(&self) -> Result<Coordinates>;

    /// Every lat/lon sample of `variable` at one time step.
    async fn read_slice(&self, variable: &str, time_index: usize) -> Result<RawSlice>;
}
