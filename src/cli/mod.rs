//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::{command, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plot observed and cloud-free SST and chlorophyll, one figure per day
    Plot {
        /// JSON file overriding the default settings
        #[arg(long)]
        config: Option<PathBuf>,
        /// First day to plot (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day to plot, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Directory the figures are written to
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// GeoJSON file with coastlines and borders
        #[arg(long)]
        boundaries: Option<PathBuf>,
        /// Skip days a dataset does not offer instead of failing
        #[arg(long)]
        skip_missing: bool,
    },
    /// Print the time coordinate of an OPeNDAP dataset
    Times {
        /// OPeNDAP dataset URL or local netCDF path
        url: String,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    let style = ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .map(|style| style.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

    ProgressBar::new(size).with_message(message).with_style(style)
}
