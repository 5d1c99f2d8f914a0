mod run;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::run::RunOptions;

#[derive(Debug, Parser)]
#[command(name = "fstudio-cli")]
#[command(about = "Fashion Studio product ETL")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the catalogue, normalize it and load every sink
    Run {
        /// Number of listing pages to crawl (defaults to `FSTUDIO_TOTAL_PAGES`)
        #[arg(long)]
        pages: Option<u32>,

        /// Seconds to pause between pages (defaults to `FSTUDIO_PAGE_DELAY_SECS`)
        #[arg(long)]
        delay: Option<u64>,

        /// Extract and normalize, but skip the load step
        #[arg(long)]
        dry_run: bool,
    },
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that `DATABASE_URL` is reachable
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = fstudio_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Some(Commands::Run {
            pages,
            delay,
            dry_run,
        }) => {
            let options = RunOptions {
                pages,
                delay_secs: delay,
                dry_run,
            };
            run::run_pipeline(&config, options).await?;
        }
        Some(Commands::Db {
            command: DbCommands::Ping,
        }) => {
            let pool = fstudio_db::connect_pool_from_config(&config).await?;
            fstudio_db::ping(&pool).await?;
            pool.close().await;
            println!("database connection ok");
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
