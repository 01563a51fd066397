//! `compressor-ledger` - web application for compressor test records
//!
//! This binary loads configuration, opens the record database and serves the
//! HTTP front end until interrupted.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use compressor_ledger::cli::{Cli, Command, ConfigCommand, ServeCommand};
use compressor_ledger::{init_logging, web, AppState, Config, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Serve(cmd) => serve(&cli, cmd).await,
        Command::Config(cmd) => {
            init_logging(cli.verbosity(), false);
            handle_config(&cli, cmd)
        }
    }
}

async fn serve(cli: &Cli, cmd: &ServeCommand) -> anyhow::Result<()> {
    let mut config =
        Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    cmd.apply(&mut config);
    config.validate()?;

    init_logging(cli.verbosity(), config.server.debug);

    let addr = config.bind_addr()?;
    let db_path = config.database_path();
    let store = Arc::new(SqliteStore::open(&db_path)?);
    info!("Using database {}", db_path.display());

    let state = AppState::new(store.clone(), &config)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    if config.server.debug {
        warn!("Debug mode enabled: error details are sent to clients");
    }

    web::serve(listener, state).await?;

    match Arc::try_unwrap(store) {
        Ok(store) => store.close()?,
        Err(_) => debug!("Database still in use at shutdown, closing on drop"),
    }
    Ok(())
}

fn handle_config(cli: &Cli, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(cli.config.clone())?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Address:            {}", config.bind_addr()?);
                println!("  Debug:              {}", config.server.debug);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Export]");
                println!("  Directory:          {}", config.export_dir().display());
                println!("  Keep copies:        {}", config.export.persist);
                println!();
                println!("[Invoice]");
                println!("  Company:            {}", config.invoice.company_name);
                println!("  Bill to:            {}", config.invoice.customer_name);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .clone()
                .or_else(|| cli.config.clone())
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}
