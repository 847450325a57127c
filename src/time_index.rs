//! Locating a calendar day in each dataset's time coordinate.

use chrono::NaiveDate;

use crate::error::PipelineError;

/// A dataset's decoded time coordinate.
#[derive(Debug, Clone)]
pub struct TimeAxis {
    pub dataset: String,
    pub times: Vec<String>,
}

/// The UTC-midnight timestamp of `date` as time coordinates spell it.
pub fn midnight_timestamp(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

/// Position of an exact match of `timestamp` in `times`.
pub fn locate(times: &[String], timestamp: &str) -> Option<usize> {
    times.iter().position(|t| t == timestamp)
}

/// Looks the timestamp up in every axis; all of them must agree on the index.
pub fn resolve(axes: &[TimeAxis], timestamp: &str) -> Result<usize, PipelineError> {
    let reference = axes.first().ok_or(PipelineError::NoLayers)?;
    let reference_index =
        locate(&reference.times, timestamp).ok_or_else(|| PipelineError::DateNotFound {
            dataset: reference.dataset.clone(),
            timestamp: timestamp.to_string(),
        })?;

    for axis in &axes[1..] {
        let index = locate(&axis.times, timestamp).ok_or_else(|| PipelineError::DateNotFound {
            dataset: axis.dataset.clone(),
            timestamp: timestamp.to_string(),
        })?;
        if index != reference_index {
            return Err(PipelineError::TimeIndexMismatch {
                timestamp: timestamp.to_string(),
                reference: reference.dataset.clone(),
                reference_index,
                dataset: axis.dataset.clone(),
                index,
            });
        }
    }

    Ok(reference_index)
}

// -- Tests -------------------------------------------------------------------
