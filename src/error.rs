//! Errors that stop a plotting run.

use thiserror::Error;

use crate::{field::FieldError, opendap::DapError, render::RenderError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no datasets configured")]
    NoLayers,

    #[error("{timestamp} not found in the time coordinate of {dataset}")]
    DateNotFound { dataset: String, timestamp: String },

    #[error(
        "{timestamp} is at index {index} in {dataset} but at index {reference_index} in {reference}"
    )]
    TimeIndexMismatch {
        timestamp: String,
        reference: String,
        reference_index: usize,
        dataset: String,
        index: usize,
    },

    #[error("slice from {dataset} has shape {found:?}, coordinates give {expected:?}")]
    ShapeMismatch {
        dataset: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("unusable coordinates from {dataset}: {message}")]
    Coordinates { dataset: String, message: String },

    #[error("failed to read from {dataset}")]
    Fetch {
        dataset: String,
        #[source]
        source: DapError,
    },

    #[error("bad slice from {dataset}")]
    Field {
        dataset: String,
        #[source]
        source: FieldError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// True when the requested date is simply not offered by a dataset.
    pub fn is_date_not_found(&self) -> bool {
        matches!(self, PipelineError::DateNotFound { .. })
    }
}
