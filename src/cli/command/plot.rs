use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::{
    cli::{create_progress_bar, create_spinner},
    config::{Config, Endpoint},
    driver::{Driver, RunReport},
    layer::{Layer, Role},
    opendap::OpendapDataset,
    render::{Boundaries, PlottersWriter},
};

/// Command line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct PlotArgs {
    pub config: Option<PathBuf>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub output_dir: Option<PathBuf>,
    pub boundaries: Option<PathBuf>,
    pub skip_missing: bool,
}

pub async fn plot(args: PlotArgs) -> Result<RunReport> {
    let config = load_config(&args)?;
    info!(
        "Plotting {} to {} into {}",
        config.start_date,
        config.end_date,
        config.output_dir.display()
    );

    let layers = open_layers(&config).await?;
    let boundaries = load_boundaries(&config)?;
    let writer = PlottersWriter::new(config.figure_size(), boundaries);

    let bar = create_progress_bar(config.day_count(), "Plotting days".to_string());
    let report = Driver::new(&config, layers, &writer)?
        .with_progress(bar.clone())
        .run()
        .await;
    bar.finish_and_clear();

    let report = report.context("Plotting failed")?;
    info!("Wrote {} figures, skipped {} days", report.written.len(), report.skipped.len());

    Ok(report)
}

fn load_config(args: &PlotArgs) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Cannot load config {}", path.display()))?,
        None => Config::default(),
    };
    let config = apply_overrides(config, args);
    config.validate()?;

    Ok(config)
}

fn apply_overrides(mut config: Config, args: &PlotArgs) -> Config {
    if let Some(start) = args.start {
        config.start_date = start;
    }
    if let Some(end) = args.end {
        config.end_date = end;
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(boundaries) = &args.boundaries {
        config.boundaries = Some(boundaries.clone());
    }
    config.skip_missing |= args.skip_missing;

    config
}

async fn open_layers(config: &Config) -> Result<Vec<Layer>> {
    let endpoints = &config.endpoints;
    let plan: [(Role, &Endpoint); 4] = [
        (Role::RawSst, &endpoints.raw_sst),
        (Role::CloudFreeSst, &endpoints.cloud_free_sst),
        (Role::RawChlorophyll, &endpoints.raw_chlorophyll),
        (Role::CloudFreeChlorophyll, &endpoints.cloud_free_chlorophyll),
    ];

    let bar = create_spinner("Opening datasets...".to_string());
    let mut layers = Vec::with_capacity(plan.len());
    for (role, endpoint) in plan {
        let dataset = OpendapDataset::open(&endpoint.url)
            .await
            .with_context(|| format!("Cannot open {}", endpoint.url))?;
        layers.push(Layer::new(role, &endpoint.variable, Box::new(dataset)));
    }
    bar.finish_with_message("Datasets opened");

    Ok(layers)
}

fn load_boundaries(config: &Config) -> Result<Option<Boundaries>> {
    match &config.boundaries {
        Some(path) => {
            let boundaries = Boundaries::load(path)?;
            if boundaries.is_empty() {
                warn!("{} holds no boundary lines", path.display());
            } else {
                info!("Loaded {} boundary lines", boundaries.len());
            }
            Ok(Some(boundaries))
        }
        None => {
            warn!("No boundaries file configured, maps will have no coastlines");
            Ok(None)
        }
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_override_config_with_flags() {
        let args = PlotArgs {
            start: NaiveDate::from_ymd_opt(2017, 4, 20),
            output_dir: Some(PathBuf::from("/tmp/figures")),
            skip_missing: true,
            ..PlotArgs::default()
        };

        let config = apply_overrides(Config::default(), &args);

        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2017, 4, 20).unwrap());
        assert_eq!(config.end_date, Config::default().end_date);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/figures"));
        assert!(config.skip_missing);
    }

    #[test]
    fn should_reject_overrides_that_reverse_the_range() {
        let args = PlotArgs {
            end: NaiveDate::from_ymd_opt(2017, 4, 1),
            ..PlotArgs::default()
        };

        assert!(load_config(&args).is_err());
    }
}
