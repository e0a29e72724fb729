//! Diary main entry point

use anyhow::Context;
use clap::Parser;
use diary_api::start_server;
use diary_config::{Config, ConfigError};
use diary_core::MemoryStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "diary")]
#[command(version = "0.1.0")]
#[command(about = "A server-rendered product and spending diary", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    // Logging is configured from the file, so a missing file is reported after init
    let (config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, None),
        Err(e @ ConfigError::FileNotFound { .. }) => (Config::default(), Some(e)),
        Err(e) => {
            eprintln!("{}", e.to_details());
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if let Some(e) = missing {
        log::warn!("{}", e.to_details());
    }
    log::info!(
        "Config loaded: user={}, snapshot={}, persist={}",
        config.user.default_user_id,
        config.snapshot_path().display(),
        config.data.persist
    );

    let rt = Runtime::new().context("failed to start the async runtime")?;
    rt.block_on(async {
        let store = MemoryStore::open(&config.data)
            .await
            .context("failed to open the diary store")?;
        start_server(config, Arc::new(store))
            .await
            .context("server stopped with an error")
    })
}
