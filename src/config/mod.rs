//! Run configuration: date range, colour scales, endpoints and output.
//!
//! Defaults reproduce the April 2017 PEACH cruise plots. A JSON file can override any
//! subset of fields, and command line flags override the file.

pub mod error;

use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::render::colormap::{linear_tick_count, MAX_TICKS};

pub use error::ConfigError;

const THREDDS: &str = "http://oceanus.meas.ncsu.edu:8080/thredds/dodsC/secoora";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Endpoint {
    pub url: String,
    pub variable: String,
}

impl Endpoint {
    fn new(path: &str, variable: &str) -> Self {
        Endpoint {
            url: format!("{}/{}", THREDDS, path),
            variable: variable.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Endpoints {
    pub raw_sst: Endpoint,
    pub raw_chlorophyll: Endpoint,
    pub cloud_free_sst: Endpoint,
    pub cloud_free_chlorophyll: Endpoint,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            raw_sst: Endpoint::new("modis/sst.nc", "sst"),
            raw_chlorophyll: Endpoint::new("modis/chla.nc", "chlor_a"),
            cloud_free_sst: Endpoint::new("dineof/sst.nc", "sst"),
            cloud_free_chlorophyll: Endpoint::new("dineof/chla.nc", "chlor_a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    /// SST colour scale bounds in °C.
    pub sst_range: [f64; 2],
    pub sst_tick_step: f64,
    /// Chlorophyll log-scale bounds in mg/m³.
    pub chlorophyll_range: [f64; 2],
    pub endpoints: Endpoints,
    pub output_dir: PathBuf,
    /// Width and height in pixels.
    pub figure_size: [u32; 2],
    /// GeoJSON file with coastlines and borders.
    pub boundaries: Option<PathBuf>,
    /// Skip dates missing from the time coordinate instead of failing.
    pub skip_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            start_date: NaiveDate::from_ymd_opt(2017, 4, 13).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2017, 4, 30).unwrap_or_default(),
            sst_range: [16.0, 30.0],
            sst_tick_step: 2.0,
            chlorophyll_range: [0.01, 100.0],
            endpoints: Endpoints::default(),
            output_dir: PathBuf::from("."),
            figure_size: [2200, 2000],
            boundaries: None,
            skip_missing: false,
        }
    }
}

impl Config {
    /// Reads a JSON config; missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_date > self.end_date {
            return Err(ConfigError::DateOrder);
        }
        let [sst_min, sst_max] = self.sst_range;
        if !(sst_min < sst_max) {
            return Err(ConfigError::SstRange(sst_min, sst_max));
        }
        let [chl_min, chl_max] = self.chlorophyll_range;
        if !(chl_min > 0.0 && chl_min < chl_max) {
            return Err(ConfigError::ChlorophyllRange(chl_min, chl_max));
        }
        if !(self.sst_tick_step > 0.0)
            || linear_tick_count(sst_min, sst_max, self.sst_tick_step) > MAX_TICKS as f64
        {
            return Err(ConfigError::TickStep(self.sst_tick_step));
        }
        if self.figure_size.contains(&0) {
            return Err(ConfigError::FigureSize);
        }

        Ok(())
    }

    /// Every calendar day from start to end, inclusive.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |date| *date <= end)
    }

    pub fn day_count(&self) -> u64 {
        ((self.end_date - self.start_date).num_days() + 1).max(0) as u64
    }

    pub fn figure_size(&self) -> (u32, u32) {
        (self.figure_size[0], self.figure_size[1])
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn should_default_to_cruise_period() {
        let config = Config::default();

        assert_eq!(config.start_date, date(2017, 4, 13));
        assert_eq!(config.end_date, date(2017, 4, 30));
        assert_eq!(config.day_count(), 18);
        assert_eq!(config.dates().count(), 18);
        assert_eq!(
            config.endpoints.cloud_free_chlorophyll.url,
            "http://oceanus.meas.ncsu.edu:8080/thredds/dodsC/secoora/dineof/chla.nc"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_iterate_inclusive_range_across_month_end() {
        let config = Config {
            start_date: date(2017, 4, 29),
            end_date: date(2017, 5, 2),
            ..Config::default()
        };

        let dates: Vec<NaiveDate> = config.dates().collect();
        assert_eq!(
            dates,
            vec![date(2017, 4, 29), date(2017, 4, 30), date(2017, 5, 1), date(2017, 5, 2)]
        );
    }

    #[test]
    fn should_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "start_date": "2018-01-01",
                "end_date": "2018-01-03",
                "sst_range": [10, 28],
                "endpoints": {{
                    "raw_sst": {{"url": "http://localhost/sst.nc", "variable": "analysed_sst"}}
                }}
            }}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.day_count(), 3);
        assert_eq!(config.sst_range, [10.0, 28.0]);
        assert_eq!(config.endpoints.raw_sst.variable, "analysed_sst");
        assert_eq!(config.endpoints.raw_chlorophyll.variable, "chlor_a");
        assert_eq!(config.figure_size(), (2200, 2000));
    }

    #[test]
    fn should_reject_reversed_dates() {
        let config = Config {
            start_date: date(2017, 4, 30),
            end_date: date(2017, 4, 13),
            ..Config::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::DateOrder)));
    }

    #[test]
    fn should_reject_bad_scales() {
        let sst = Config {
            sst_range: [30.0, 16.0],
            ..Config::default()
        };
        assert!(matches!(sst.validate(), Err(ConfigError::SstRange(..))));

        let chl = Config {
            chlorophyll_range: [0.0, 100.0],
            ..Config::default()
        };
        assert!(matches!(chl.validate(), Err(ConfigError::ChlorophyllRange(..))));
    }

    #[test]
    fn should_reject_tick_step_giving_too_many_ticks() {
        let tiny = Config {
            sst_tick_step: 1e-15,
            ..Config::default()
        };
        assert!(matches!(tiny.validate(), Err(ConfigError::TickStep(_))));

        let fine = Config {
            sst_tick_step: 0.5,
            ..Config::default()
        };
        assert!(fine.validate().is_ok());
    }

    #[test]
    fn should_reject_unknown_fields() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"start": "2018-01-01"}}"#).unwrap();

        assert!(matches!(Config::from_file(file.path()), Err(ConfigError::Json(_))));
    }
}
