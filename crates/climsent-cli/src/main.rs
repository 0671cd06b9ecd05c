mod heatmap;
mod stance;
mod topics;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "climsent")]
#[command(about = "Climate tweet sentiment analyses")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Monthly Negative/Neutral/Positive counts, cached on disk
    Heatmap {
        /// Dataset CSV (defaults to `CLIMSENT_DATA_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Cache artifact path (defaults to `CLIMSENT_CACHE_PATH`)
        #[arg(long)]
        cache: Option<PathBuf>,
        /// First day of the window, YYYY-MM-DD
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day of the window, YYYY-MM-DD (inclusive)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Limit the number of dataset rows read
        #[arg(long)]
        nrows: Option<usize>,
        /// With --nrows, take a seeded random sample instead of the leading rows
        #[arg(long, requires = "nrows")]
        sample_random: bool,
        /// Seed for --sample-random (defaults to `CLIMSENT_SAMPLE_SEED`)
        #[arg(long)]
        seed: Option<u64>,
        /// Ignore any cached artifact, recompute, and overwrite it
        #[arg(long, conflicts_with = "no_cache")]
        force_recompute: bool,
        /// Neither read nor write the cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Sentiment distribution per stance
    Stance {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Sampled temperature vs. sentiment per stance, with trend lines
    Scatter {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Approximate total points across all stances
        #[arg(long)]
        max_points: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Weekly mean sentiment for the most frequent topics
    Topics {
        #[arg(long)]
        input: Option<PathBuf>,
        /// How many topics to keep
        #[arg(long)]
        top: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = climsent_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Heatmap {
            input,
            cache,
            start,
            end,
            nrows,
            sample_random,
            seed,
            force_recompute,
            no_cache,
        }) => {
            let args = heatmap::HeatmapArgs {
                input: input.unwrap_or_else(|| config.data_path.clone()),
                cache: cache.unwrap_or_else(|| config.cache_path.clone()),
                start: start.unwrap_or(config.start_date),
                end: end.unwrap_or(config.end_date),
                sampling: heatmap::resolve_sampling(
                    nrows,
                    sample_random,
                    seed.unwrap_or(config.sample_seed),
                ),
                cache_policy: heatmap::resolve_cache_policy(force_recompute, no_cache),
            };
            heatmap::run_heatmap(&args)?;
        }
        Some(Commands::Stance { input }) => {
            stance::run_stance(&input.unwrap_or_else(|| config.data_path.clone()))?;
        }
        Some(Commands::Scatter {
            input,
            max_points,
            seed,
        }) => {
            stance::run_scatter(
                &input.unwrap_or_else(|| config.data_path.clone()),
                max_points.unwrap_or(config.max_scatter_points),
                seed.unwrap_or(config.sample_seed),
            )?;
        }
        Some(Commands::Topics { input, top }) => {
            topics::run_topics(
                &input.unwrap_or_else(|| config.data_path.clone()),
                top.unwrap_or(config.top_topics),
            )?;
        }
        None => println!("climsent: choose a sub-command (heatmap, stance, scatter, topics); see --help"),
    }

    Ok(())
}
