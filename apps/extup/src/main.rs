//! extup - bootstrap and update orchestrator for editor extension packages
//!
//! This is the CLI application that wires the filesystem host, the
//! settings store, and the built-in migration catalog into the ops crate
//! and renders the event stream while a command runs.

mod catalog;
mod cli;
mod display;
mod error;
mod events;

use crate::cli::{Cli, Commands};
use crate::display::render;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use extup_config::Config;
use extup_events::EventReceiver;
use extup_host::DirectoryHost;
use extup_ops::{bootstrap, plan, status, OperationResult, OpsCtx, OpsCtxBuilder};
use extup_state::{ProgressStore, SettingsStore};
use extup_types::VersionOrdinal;
use std::process;
use tokio::select;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting extup v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration: file (or defaults), then environment, then flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    if let Some(dir) = &cli.global.state_dir {
        config.state.state_dir = Some(dir.clone());
    }

    let settings = SettingsStore::new(config.state_dir());
    let progress = ProgressStore::new(settings.clone(), config.state.progress_document.clone());

    // Init only seeds the progress record; no orchestration machinery
    if let Commands::Init {
        version_override,
        force,
    } = &cli.command
    {
        let result = run_init(&progress, version_override.as_deref(), *force).await?;
        return render(&result, cli.global.json);
    }

    let host = DirectoryHost::new(
        config.packages_dir(),
        config.channel_dir(),
        settings.clone(),
        config.state.preferences_document.clone(),
        config.state.progress_document.clone(),
    );
    let registry = catalog::build_registry(&settings, &config.state.preferences_document);

    let (event_sender, event_receiver) = extup_events::channel();
    let ctx = OpsCtxBuilder::new()
        .with_host(host)
        .with_settings(settings)
        .with_progress(progress)
        .with_registry(registry)
        .with_config(config)
        .with_event_sender(event_sender)
        .build()?;

    let colors = !cli.global.json && console::Term::stdout().features().colors_supported();
    let mut event_handler = EventHandler::new(colors, cli.global.debug);

    let result =
        execute_command_with_events(cli.command, ctx, event_receiver, &mut event_handler).await?;

    render(&result, cli.global.json)?;
    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ctx: OpsCtx<DirectoryHost>,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ctx));

    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            // Event received
            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    ctx: OpsCtx<DirectoryHost>,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Run => Ok(OperationResult::Bootstrap(bootstrap(&ctx).await?)),
        Commands::Plan => Ok(OperationResult::Plan(plan(&ctx).await?)),
        Commands::Status => Ok(OperationResult::Status(status(&ctx).await?)),
        Commands::Init { .. } => unreachable!("init is handled before context construction"),
    }
}

/// Seed the progress record with the tool version
async fn run_init(
    progress: &ProgressStore,
    version_override: Option<&str>,
    force: bool,
) -> Result<OperationResult, CliError> {
    if progress.is_seeded().await? && !force {
        return Err(CliError::InvalidArguments(
            "progress record is already seeded; pass --force to overwrite".to_string(),
        ));
    }

    let version: VersionOrdinal = version_override
        .unwrap_or(env!("CARGO_PKG_VERSION"))
        .parse()
        .map_err(extup_errors::Error::from)?;

    progress.seed_current(&version).await?;
    Ok(OperationResult::Success(format!(
        "recorded current version {version}"
    )))
}

/// Initialize tracing with JSON awareness
fn init_tracing(json_mode: bool, debug: bool) {
    let default_filter = if debug { "extup=debug" } else { "extup=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    if json_mode {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
