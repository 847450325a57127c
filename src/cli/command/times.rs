use anyhow::{Context, Result};

use crate::{cli::create_spinner, dataset::Dataset, opendap::OpendapDataset};

pub async fn times(url: &str) -> Result<Vec<String>> {
    let bar = create_spinner(format!("Reading time coordinate of {}...", url));
    let dataset = OpendapDataset::open(url)
        .await
        .with_context(|| format!("Cannot open {}", url))?;
    let times = dataset.time_coordinate().await?;
    bar.finish_and_clear();

    Ok(times)
}
