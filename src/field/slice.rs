//! 2-D slices of a measurement variable at one time step.

use thiserror::Error;

use super::FieldKind;

#[derive(Error, Debug, PartialEq)]
pub enum FieldError {
    #[error("expected a 2-D slice, got shape {0:?}")]
    NotTwoDimensional(Vec<usize>),

    #[error("shape {shape:?} needs {expected} values, got {found}")]
    Length {
        shape: Vec<usize>,
        expected: usize,
        found: usize,
    },
}

/// Values as fetched, before missing markers and thresholds are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSlice {
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
    /// Declared missing-value markers (`_FillValue`, `missing_value`).
    pub fill_values: Vec<f64>,
}

/// A lat × lon field with its validity mask. Masked samples hold NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSlice {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
    mask: Vec<bool>,
}

impl GridSlice {
    /// Squeezes leading singleton dimensions, fills missing markers with NaN and masks
    /// everything `kind` considers implausible.
    pub fn from_raw(raw: RawSlice, kind: FieldKind) -> Result<Self, FieldError> {
        let mut shape: &[usize] = &raw.shape;
        while shape.len() > 2 && shape[0] == 1 {
            shape = &shape[1..];
        }
        let (rows, cols) = match shape {
            [rows, cols] => (*rows, *cols),
            _ => return Err(FieldError::NotTwoDimensional(raw.shape.clone())),
        };
        if raw.values.len() != rows * cols {
            return Err(FieldError::Length {
                shape: raw.shape.clone(),
                expected: rows * cols,
                found: raw.values.len(),
            });
        }

        let values: Vec<f64> = raw
            .values
            .iter()
            .map(|&value| {
                if is_fill(value, &raw.fill_values) || !kind.is_valid(value) {
                    f64::NAN
                } else {
                    value
                }
            })
            .collect();
        let mask = values.iter().map(|v| v.is_nan()).collect();

        Ok(GridSlice {
            rows,
            cols,
            values,
            mask,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        self.mask[row * self.cols + col]
    }

    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&masked| !masked).count()
    }
}

// Fill values are usually declared at the variable's own (often single) precision.
fn is_fill(value: f64, fill_values: &[f64]) -> bool {
    fill_values
        .iter()
        .any(|&fill| value == fill || (value as f32) == (fill as f32))
}

// -- Tests -------------------------------------------------------------------
