mod error;
mod fetch;
mod output;
mod parser;
mod pipeline;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use error::ScrapeError;
use pipeline::Strategy;
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "estatuto_scraper",
    about = "Extract the Estatuto Tributario page into text files"
)]
struct Cli {
    /// TOML settings file (ESTATUTO_* env vars still take precedence)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Page to fetch
    #[arg(long, global = true)]
    url: Option<String>,

    /// Directory the text files are written to
    #[arg(short, long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One articulo_N.txt per article plus complete_text.txt
    Articles {
        /// Article element as `tag.class`
        #[arg(long)]
        filter: Option<String>,
        /// Fail when no element matches the filter
        #[arg(long)]
        require_matches: bool,
    },
    /// All visible text of the page into complete_text2.txt
    Flat,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    let (strategy, filter, require_matches) = match cli.command {
        Commands::Articles {
            filter,
            require_matches,
        } => (Strategy::Articles, filter, require_matches),
        Commands::Flat => (Strategy::Flat, None, false),
    };
    settings.apply_overrides(cli.url, cli.out_dir, filter, require_matches);

    match pipeline::run(strategy, &settings) {
        Ok(report) => {
            info!(
                "{} run: {} units, {} files in {:.1}s",
                report.strategy,
                report.unit_count,
                report.files.units.len() + 1,
                t0.elapsed().as_secs_f64()
            );
            match report.strategy {
                Strategy::Articles => println!("Articles extracted and saved successfully."),
                Strategy::Flat => println!("Complete text extracted and saved successfully."),
            }
            Ok(())
        }
        Err(e) => {
            // handled failure: report the status and exit normally
            if let ScrapeError::Status { url, .. } = &e {
                info!("No files written for {}", url);
                println!("{}", e);
                return Ok(());
            }
            Err(e.into())
        }
    }
}
