mod cli;
mod config;
mod dataset;
mod driver;
mod error;
mod field;
mod layer;
mod opendap;
mod render;
mod time_index;

use std::process::ExitCode;

use clap::Parser;
use cli::{
    command::{self, PlotArgs},
    Cli, Commands,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plot {
            config,
            start,
            end,
            output_dir,
            boundaries,
            skip_missing,
        } => {
            let args = PlotArgs {
                config,
                start,
                end,
                output_dir,
                boundaries,
                skip_missing,
            };
            command::plot(args).await.map(|report| {
                for path in &report.written {
                    println!("File saved to `{}`", path.display());
                }
                for date in &report.skipped {
                    println!("Skipped {}", date);
                }
            })
        }
        Commands::Times { url } => command::times(&url).await.map(|times| {
            for time in times {
                println!("{}", time);
            }
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
