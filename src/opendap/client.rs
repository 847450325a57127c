//! Opens datasets with `netcdf` and exposes them through [`Dataset`].
//!
//! libnetcdf calls block, so every read runs on tokio's blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use netcdf::{AttributeValue, Extents, Variable};
use tokio::task;
use tracing::debug;

use super::{cf_time, DapError, Result, LAT, LON, TIME};
use crate::{
    dataset::{Coordinates, Dataset},
    field::RawSlice,
};

const FILL_ATTRIBUTES: &[&str] = &["_FillValue", "missing_value"];

/// An opened remote (or local) gridded dataset.
pub struct OpendapDataset {
    url: String,
    file: Arc<netcdf::File>,
}

impl OpendapDataset {
    /// Opens the dataset at `url`, an OPeNDAP endpoint or a netCDF path.
    pub async fn open(url: &str) -> Result<Self> {
        let url = url.trim_end_matches('/').to_string();
        debug!(%url, "opening");

        let target = url.clone();
        let file = task::spawn_blocking(move || netcdf::open(target)).await??;

        Ok(OpendapDataset {
            url,
            file: Arc::new(file),
        })
    }

    async fn with_file<T, F>(&self, read: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&netcdf::File) -> Result<T> + Send + 'static,
    {
        let file = Arc::clone(&self.file);
        task::spawn_blocking(move || read(&file)).await?
    }
}

#[async_trait]
impl Dataset for OpendapDataset {
    fn label(&self) -> &str {
        &self.url
    }

    async fn time_coordinate(&self) -> Result<Vec<String>> {
        self.with_file(read_times).await
    }

    async fn coordinates(&self) -> Result<Coordinates> {
        self.with_file(|file| {
            Ok(Coordinates {
                lat: read_axis(file, LAT)?,
                lon: read_axis(file, LON)?,
            })
        })
        .await
    }

    async fn read_slice(&self, variable: &str, time_index: usize) -> Result<RawSlice> {
        debug!(url = %self.url, variable, time_index, "reading slice");
        let name = variable.to_string();

        self.with_file(move |file| read_slice(file, &name, time_index)).await
    }
}

fn variable<'f>(file: &'f netcdf::File, name: &str) -> Result<Variable<'f>> {
    file.variable(name)
        .ok_or_else(|| DapError::MissingVariable(name.to_string()))
}

/// Numeric times are decoded with their CF `units`; string times are used verbatim.
fn read_times(file: &netcdf::File) -> Result<Vec<String>> {
    let var = variable(file, TIME)?;

    if let Ok(values) = read_numbers(&var, ..) {
        let units = text_attribute(&var, "units")?;
        return cf_time::decode_times(&values, &units);
    }

    let steps = var.dimensions().first().map(|d| d.len()).unwrap_or(0);
    (0..steps)
        .map(|index| Ok(var.get_string([index])?))
        .collect()
}

fn read_axis(file: &netcdf::File, name: &str) -> Result<Vec<f64>> {
    read_numbers(&variable(file, name)?, ..)
}

fn read_slice(file: &netcdf::File, name: &str, time_index: usize) -> Result<RawSlice> {
    let var = variable(file, name)?;
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    let (steps, rows, cols) = match shape[..] {
        [steps, rows, cols] => (steps, rows, cols),
        _ => {
            return Err(DapError::UnexpectedType {
                variable: name.to_string(),
                message: format!("expected (time, lat, lon), got shape {:?}", shape),
            })
        }
    };
    if time_index >= steps {
        return Err(DapError::TimeIndex {
            variable: name.to_string(),
            index: time_index,
            steps,
        });
    }

    Ok(RawSlice {
        shape: vec![1, rows, cols],
        values: read_numbers(&var, (time_index, .., ..))?,
        fill_values: fill_values(&var),
    })
}

/// Reads values at whatever precision the variable is stored in.
fn read_numbers<E>(var: &Variable<'_>, extents: E) -> Result<Vec<f64>>
where
    E: TryInto<Extents> + Clone,
    E::Error: Into<netcdf::Error>,
{
    if let Ok(values) = var.get_values::<f64, _>(extents.clone()) {
        return Ok(values);
    }
    if let Ok(values) = var.get_values::<f32, _>(extents.clone()) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    if let Ok(values) = var.get_values::<i32, _>(extents.clone()) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    let values = var.get_values::<i16, _>(extents)?;

    Ok(values.into_iter().map(f64::from).collect())
}

fn text_attribute(var: &Variable<'_>, name: &str) -> Result<String> {
    let value = var
        .attribute_value(name)
        .ok_or_else(|| DapError::MissingAttribute {
            variable: var.name(),
            attribute: name.to_string(),
        })??;

    match value {
        AttributeValue::Str(text) => Ok(text),
        other => Err(DapError::UnexpectedType {
            variable: var.name(),
            message: format!("attribute `{}` is not text: {:?}", name, other),
        }),
    }
}

/// Declared missing-value markers (`_FillValue`, `missing_value`).
fn fill_values(var: &Variable<'_>) -> Vec<f64> {
    FILL_ATTRIBUTES
        .iter()
        .filter_map(|name| var.attribute_value(name)?.ok())
        .flat_map(attribute_numbers)
        .collect()
}

fn attribute_numbers(value: AttributeValue) -> Vec<f64> {
    match value {
        AttributeValue::Double(v) => vec![v],
        AttributeValue::Doubles(v) => v,
        AttributeValue::Float(v) => vec![f64::from(v)],
        AttributeValue::Floats(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Int(v) => vec![f64::from(v)],
        AttributeValue::Ints(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Short(v) => vec![f64::from(v)],
        AttributeValue::Shorts(v) => v.into_iter().map(f64::from).collect(),
        _ => Vec::new(),
    }
}

// -- Tests -------------------------------------------------------------------
