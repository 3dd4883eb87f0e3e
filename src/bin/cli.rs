//! pagewatch CLI
//!
//! Scheduled execution entry point: run `check` from cron (or a CI
//! schedule) and deliver the generated report.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pagewatch::{
    error::Result,
    models::Config,
    report,
    services::SiteMonitor,
    store::{LocalStore, NoveltyStore},
};

/// pagewatch - Web Page Event Monitor
#[derive(Parser, Debug)]
#[command(
    name = "pagewatch",
    version,
    about = "Monitors web pages for newly published events"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "pagewatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check all enabled sites and report new records
    Check {
        /// Write the markdown report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,

    /// Show persisted state summary per site
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // An unreadable or invalid config aborts before any site is checked.
    let config = Config::load(&cli.config)?;
    config.validate()?;

    log::info!(
        "Loaded {} site(s) from {}",
        config.sites.len(),
        cli.config.display()
    );

    let config = Arc::new(config);
    let store = LocalStore::new(&config.state.dir);

    match cli.command {
        Command::Check { output } => {
            let monitor = SiteMonitor::new(Arc::clone(&config), Arc::new(store))?;
            let run = monitor.run().await;

            log::info!(
                "Run complete: {} site(s) with updates, {} failed",
                run.update_count(),
                run.failure_count()
            );

            let markdown = report::render_markdown(&run);
            match output {
                Some(path) => {
                    std::fs::write(&path, markdown)?;
                    log::info!("Report written to {}", path.display());
                }
                None => println!("{markdown}"),
            }
        }

        Command::Validate => {
            // Load + validate already ran above; getting here means OK.
            log::info!("✓ Config OK ({} sites)", config.sites.len());
        }

        Command::Info => {
            log::info!("State directory: {}", config.state.dir);
            for site in &config.sites {
                let state = store.load(&site.name).await?;
                if state.keys.is_empty() {
                    log::info!("{}: no state yet", site.name);
                } else {
                    log::info!(
                        "{}: {} seen key(s), last updated {}",
                        site.name,
                        state.keys.len(),
                        state.updated_at
                    );
                }
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
