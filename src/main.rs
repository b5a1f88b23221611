use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cartelera_scrape::browse::{BrowseConfig, HttpBrowser};
use cartelera_scrape::chains;
use cartelera_scrape::enrich::{self, EnrichOptions, TmdbSearch};
use cartelera_scrape::loader::LoadOptions;
use cartelera_scrape::orchestrator;
use cartelera_scrape::{Result, Snapshot};

#[derive(Parser, Debug)]
#[command(
    name = "cartelera",
    about = "Scrape Madrid cinema listings and enrich them with TMDB metadata"
)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the configured chains and write a title snapshot
    Scrape {
        #[arg(long, default_value = "Madrid")]
        city: String,

        #[arg(long, default_value = "data/madrid-cartelera.json")]
        out: PathBuf,

        /// Milliseconds to let client-side rendering settle after navigation
        #[arg(long, default_value_t = 3000)]
        settle_ms: u64,
    },
    /// Enrich a previously written snapshot with TMDB metadata
    Enrich {
        #[arg(long, default_value = "data/madrid-cartelera.json")]
        input: PathBuf,

        #[arg(long, default_value = "data/enriched/madrid-cartelera.json")]
        out: PathBuf,

        /// TMDB locale for synopses and release dates
        #[arg(long, default_value = "es-ES")]
        language: String,

        /// Milliseconds to pause between search requests
        #[arg(long, default_value_t = 300)]
        delay_ms: u64,
    },
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "cartelera_scrape=debug,info"
    } else {
        "cartelera_scrape=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Command::Scrape {
            city,
            out,
            settle_ms,
        } => run_scrape(city, out, settle_ms).await,
        Command::Enrich {
            input,
            out,
            language,
            delay_ms,
        } => run_enrich(input, out, language, delay_ms).await,
    };

    if let Err(err) = result {
        tracing::error!("run failed: {err}");
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}

async fn run_scrape(city: String, out: PathBuf, settle_ms: u64) -> Result<()> {
    let sources = chains::madrid_sources();
    let mut browser = HttpBrowser::new(BrowseConfig::default())?;
    let opts = LoadOptions {
        settle_delay: Duration::from_millis(settle_ms),
        ..LoadOptions::default()
    };

    let snapshot = orchestrator::run_scrape(&mut browser, &sources, &city, &opts).await;
    snapshot.write_to(&out)?;
    println!(
        "💾 Guardado: {} ({} títulos)",
        out.display(),
        snapshot.titles.len()
    );
    Ok(())
}

async fn run_enrich(input: PathBuf, out: PathBuf, language: String, delay_ms: u64) -> Result<()> {
    // Credential check comes first: without a key there is nothing to do.
    let search = TmdbSearch::from_env()?;

    let snapshot = Snapshot::read_from(&input)?;
    let opts = EnrichOptions {
        language,
        request_delay: Duration::from_millis(delay_ms),
    };

    let enriched = enrich::enrich_snapshot(&search, &snapshot, &opts).await?;
    enriched.write_to(&out)?;
    println!(
        "💾 Enriched → {} ({} películas)",
        out.display(),
        enriched.movies.len()
    );
    Ok(())
}
