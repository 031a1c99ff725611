mod cli;
mod commands;
mod error;
mod output;
mod paths;
mod settings;

use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use dispatcharr_grid::AppStore;
use log::error;
use log::info;
use log::warn;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::commands::Context;
use crate::error::CliError;
use crate::settings::MemoryBackend;
use crate::settings::SettingsProvider;
use crate::settings::SqliteBackend;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Logging disabled: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) -> Result<(), CliError> {
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    paths::rotate_logs();
    paths::ensure_parent(&path)?;
    let file = File::create(&path)?;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}

async fn open_settings() -> Result<SettingsProvider, CliError> {
    match paths::settings_db() {
        Some(path) => {
            paths::ensure_parent(&path)?;
            Ok(SettingsProvider::new(SqliteBackend::open(&path).await?))
        }
        None => {
            warn!("No data directory; settings will not persist");
            Ok(SettingsProvider::new(MemoryBackend::new()))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    info!("dispatcharr {} starting", env!("CARGO_PKG_VERSION"));
    let settings = open_settings().await?;

    let cx = Context {
        settings,
        store: AppStore::new(),
        url: cli.url,
        token: cli.token,
        width: cli.width,
    };

    match cli.command {
        Commands::Streams {
            page,
            filter,
            sorts,
            select_all,
        } => commands::streams(&cx, page, filter, sorts, select_all).await,
        Commands::ChannelStreams {
            channel,
            page,
            move_rows,
        } => commands::channel_streams(&cx, channel, page, move_rows).await,
        Commands::DeleteSelected { filter, yes } => commands::delete_selected(&cx, filter, yes).await,
        Commands::Preview {
            text,
            pattern,
            replacement,
        } => commands::preview(text, pattern, replacement),
        Commands::Config { action } => commands::config(&cx.settings, action).await,
    }
}
