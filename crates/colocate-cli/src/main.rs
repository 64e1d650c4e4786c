mod pipeline;
mod prompt;
mod report;
mod resolve;
mod search;
#[cfg(test)]
mod testing;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colocate_core::{AppConfig, SUMMARY_ENTRIES};
use colocate_geocoder::{NominatimClient, RetryPolicy};
use colocate_store::StagingDir;
use tracing_subscriber::EnvFilter;

use crate::pipeline::{
    choose_categories, correlate_stage, report_categories, report_stage, resolve_stage,
    search_stage, InputMode, PoiDataset,
};
use crate::prompt::ConsolePrompter;

#[derive(Debug, Parser)]
#[command(name = "colocate")]
#[command(about = "Find anchor POIs (parks by default) with other POI categories nearby")]
struct Cli {
    /// Staging directory for intermediate JSON (overrides COLOCATE_STAGING_DIR)
    #[arg(long, global = true)]
    staging_dir: Option<PathBuf>,

    /// Use fixed defaults instead of prompting on the console
    #[arg(long, global = true)]
    non_interactive: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve, search, correlate and report in one run
    Run {
        #[command(flatten)]
        anchor: AnchorArgs,
        #[command(flatten)]
        categories: CategoryArgs,
        #[command(flatten)]
        ranking: RankArgs,
    },
    /// Resolve and stage the anchor place only
    Resolve {
        #[command(flatten)]
        anchor: AnchorArgs,
    },
    /// Search the three categories around the staged place
    Search {
        #[command(flatten)]
        categories: CategoryArgs,
    },
    /// Correlate staged POI collections offline and print the report
    Correlate {
        #[command(flatten)]
        ranking: RankArgs,
    },
    /// Re-rank a staged correlation and print the report
    Report {
        /// Number of anchors to show
        #[arg(long, default_value_t = SUMMARY_ENTRIES)]
        top: usize,
    },
}

#[derive(Debug, Args)]
struct AnchorArgs {
    /// Place to geocode without prompting (implies --non-interactive)
    #[arg(long)]
    place: Option<String>,
}

#[derive(Debug, Args)]
struct CategoryArgs {
    /// Anchor, secondary and tertiary categories, e.g. `park "book shop" bakery`
    #[arg(long, num_args = 3, value_names = ["ANCHOR", "SECONDARY", "TERTIARY"])]
    categories: Option<Vec<String>>,
}

#[derive(Debug, Args)]
struct RankArgs {
    /// Neighborhood radius around each anchor in miles (overrides config)
    #[arg(long)]
    radius_miles: Option<f64>,

    /// Number of anchors to show
    #[arg(long, default_value_t = SUMMARY_ENTRIES)]
    top: usize,
}

impl RankArgs {
    fn radius(&self, config: &AppConfig) -> anyhow::Result<f64> {
        match self.radius_miles {
            Some(r) if !(r.is_finite() && r > 0.0) => {
                anyhow::bail!("--radius-miles must be positive, got {r}")
            }
            Some(r) => Ok(r),
            None => Ok(config.neighborhood_radius_miles),
        }
    }
}

fn input_mode(non_interactive: bool, place: Option<&str>) -> InputMode {
    if non_interactive || place.is_some() {
        InputMode::Fixed
    } else {
        InputMode::Interactive
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = colocate_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let staging = StagingDir::new(
        cli.staging_dir
            .clone()
            .unwrap_or_else(|| config.staging_dir.clone()),
    );
    let retry = RetryPolicy::from_config(config.max_attempts);
    tracing::debug!(?config, staging = %staging.root().display(), "configuration loaded");

    match cli.command {
        Commands::Run {
            anchor,
            categories,
            ranking,
        } => {
            let radius = ranking.radius(&config)?;
            let mode = input_mode(cli.non_interactive, anchor.place.as_deref());
            let geocoder = NominatimClient::from_config(&config)?;
            let mut prompter = ConsolePrompter::new();

            let place = resolve_stage(
                &geocoder,
                &retry,
                &mut prompter,
                mode,
                anchor.place.as_deref(),
                &config,
                &staging,
            )
            .await?;
            let categories = choose_categories(&mut prompter, mode, categories.categories)?;
            let dataset =
                search_stage(&geocoder, &retry, &categories, &place, &config, &staging).await?;
            let entries = correlate_stage(&dataset, radius, &staging)?;
            print!("{}", report_stage(&entries, &categories, ranking.top));
        }
        Commands::Resolve { anchor } => {
            let mode = input_mode(cli.non_interactive, anchor.place.as_deref());
            let geocoder = NominatimClient::from_config(&config)?;
            let mut prompter = ConsolePrompter::new();
            let place = resolve_stage(
                &geocoder,
                &retry,
                &mut prompter,
                mode,
                anchor.place.as_deref(),
                &config,
                &staging,
            )
            .await?;
            println!(
                "{} ({}, {}), search radius {:.2} mi",
                place.display_name, place.coordinate.lat, place.coordinate.lon, place.radius_miles
            );
        }
        Commands::Search { categories } => {
            let mode = input_mode(cli.non_interactive, None);
            let place = staging
                .read_place()
                .context("loading staged place; run `colocate resolve` first")?;
            let geocoder = NominatimClient::from_config(&config)?;
            let mut prompter = ConsolePrompter::new();
            let categories = choose_categories(&mut prompter, mode, categories.categories)?;
            let dataset =
                search_stage(&geocoder, &retry, &categories, &place, &config, &staging).await?;
            println!(
                "staged {} {}, {} {}, {} {}",
                dataset.anchor.records.len(),
                categories.anchor,
                dataset.secondary.records.len(),
                categories.secondary,
                dataset.tertiary.records.len(),
                categories.tertiary
            );
        }
        Commands::Correlate { ranking } => {
            let radius = ranking.radius(&config)?;
            let dataset = PoiDataset::load(&staging)?;
            let entries = correlate_stage(&dataset, radius, &staging)?;
            print!("{}", report_stage(&entries, &dataset.categories(), ranking.top));
        }
        Commands::Report { top } => {
            let entries = staging
                .read_correlation()
                .context("loading staged correlation; run `colocate correlate` first")?;
            let categories = report_categories(&entries, &staging);
            print!("{}", report_stage(&entries, &categories, top));
        }
    }

    Ok(())
}
