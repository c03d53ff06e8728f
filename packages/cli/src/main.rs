#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the cherry blossom dashboard.
//!
//! `render` runs the pipeline once for the filters given as flags.
//! `session` is the reactive loop: one JSON input event per stdin line in,
//! one artifact bundle per line out.

mod args;
mod output;

use std::io::{BufRead as _, Write as _};
use std::path::PathBuf;

use blossom_map_dashboard::{Dashboard, DashboardConfig};
use clap::{Parser, Subcommand};

use crate::args::FilterArgs;

#[derive(Parser)]
#[command(name = "blossom_map", about = "Vancouver cherry blossom dashboard")]
struct Cli {
    /// Config file replacing the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every chart once for the given filters
    Render {
        #[command(flatten)]
        filters: FilterArgs,
        /// Write one JSON file per chart into this directory instead of
        /// printing the bundle
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print the filter option lists and bounds
    Options,
    /// Read JSON filter events from stdin and print a bundle per event
    Session,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = DashboardConfig::load(cli.config.as_deref())?;
    log::info!(
        "Opening dashboard from {}",
        config.data.trees_path.display()
    );
    let dashboard = Dashboard::open(&config).await?;
    log::info!(
        "Loaded {} trees and {} neighbourhood boundaries",
        dashboard.dataset().len(),
        dashboard.boundaries().len()
    );

    match cli.command {
        Commands::Render {
            filters,
            output_dir,
            pretty,
        } => {
            let mut artifacts = dashboard.render(&filters.into_state());
            artifacts.generation = 1;
            if let Some(dir) = output_dir {
                let written = output::write_charts(&dir, &artifacts)?;
                log::info!("Wrote {} charts to {}", written.len(), dir.display());
            } else {
                output::print_json(&artifacts, pretty)?;
            }
        }
        Commands::Options => {
            output::print_json(&dashboard.options(), true)?;
        }
        Commands::Session => run_session(&dashboard)?,
    }

    Ok(())
}

fn run_session(dashboard: &Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = dashboard.session();
    let stdout = std::io::stdout();

    let initial = session.refresh();
    output::write_line(&mut stdout.lock(), &*initial)?;

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match session.handle_json(&line) {
            Ok(artifacts) => {
                let mut out = stdout.lock();
                output::write_line(&mut out, &*artifacts)?;
                out.flush()?;
            }
            Err(e) => log::warn!("Ignoring input event: {e}"),
        }
    }

    log::info!("Input closed, ending session");
    Ok(())
}
