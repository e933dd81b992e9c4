//! vsixget - download VS Code extensions for offline installation
//!
//! This is the CLI application. It loads configuration and inputs, runs the
//! requested operation through the ops crate and renders the report.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use vsixget_config::Config;
use vsixget_events::EventReceiver;
use vsixget_ops::{OperationResult, OpsCtx};
use vsixget_types::ExtensionRef;

/// Exit status for a run in which at least one extension failed
const EXIT_PARTIAL_FAILURE: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_PARTIAL_FAILURE),
        Err(e) => {
            error!("Application error: {}", e);
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Main application logic; returns whether every extension succeeded
async fn run(cli: Cli) -> Result<bool, CliError> {
    info!("Starting vsixget v{}", env!("CARGO_PKG_VERSION"));

    // 1. File config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Environment variables
    config.merge_env()?;

    // 3. CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global, &cli.command);
    config.validate()?;

    let renderer = OutputRenderer::new(cli.global.json, config.general.color);
    let mut event_handler = EventHandler::new(renderer.colors_enabled());

    let inputs = vsixget_manifest::load_references(cli.command.inputs()).await?;
    for skipped in &inputs.skipped {
        warn!(
            source = %skipped.source,
            position = skipped.position,
            error = %skipped.error,
            "Skipped entry"
        );
        event_handler.show_warning(&format!(
            "{}:{}: skipped: {}",
            skipped.source, skipped.position, skipped.error
        ));
    }
    if inputs.is_empty() {
        return Err(CliError::InvalidArguments(
            "no valid extension references in the given inputs".to_string(),
        ));
    }
    debug!(count = inputs.references.len(), "References loaded");

    let (event_sender, event_receiver) = vsixget_events::channel();
    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let ops_ctx = OpsCtx::from_config(&config, event_sender, cancel)?;

    let result = execute_command_with_events(
        cli.command,
        ops_ctx,
        inputs.references,
        config.download.dir.clone(),
        config.download.cached,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    renderer.render_result(&result)?;

    let success = result.is_success();
    info!(success, failures = event_handler.failures(), "Command completed");
    Ok(success)
}

/// Cancel the run on the first Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing without starting new downloads");
            cancel.cancel();
        }
    });
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: OpsCtx,
    references: Vec<ExtensionRef>,
    download_dir: PathBuf,
    use_cache: bool,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(
        command,
        ops_ctx,
        references,
        download_dir,
        use_cache,
    ));

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(&event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(&event);
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    ctx: OpsCtx,
    references: Vec<ExtensionRef>,
    download_dir: PathBuf,
    use_cache: bool,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Download { .. } => {
            let report = vsixget_ops::download(&ctx, &references, &download_dir, use_cache).await?;
            Ok(OperationResult::BatchReport(report))
        }
        Commands::Resolve { .. } => {
            let report = vsixget_ops::resolve(&ctx, &references).await;
            Ok(OperationResult::Resolution(report))
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let default_filter = if debug_enabled_flag {
        "info,vsixget=debug"
    } else {
        "warn,vsixget=info"
    };
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter))
    };

    if json_mode {
        // Keep the terminal clean for the JSON report; logs go to a file
        if debug_enabled {
            if let Some(file) = create_log_file() {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(env_filter())
                    .init();
                return;
            }
        }
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter())
            .init();
    }
}

/// Open a timestamped log file under the user data directory
fn create_log_file() -> Option<std::fs::File> {
    let log_dir = dirs::data_local_dir()?.join("vsixget").join("logs");
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {e}");
        return None;
    }
    let log_file = log_dir.join(format!(
        "vsixget-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    match std::fs::File::create(&log_file) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {e}");
            None
        }
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs, command: &Commands) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if let Some(url) = &global.gallery_url {
        config.catalog.gallery_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        config.network.timeout = timeout;
    }
    if let Some(jobs) = global.jobs {
        config.download.jobs = jobs;
    }

    if let Commands::Download {
        download_dir,
        cached,
        ..
    } = command
    {
        if let Some(dir) = download_dir {
            config.download.dir.clone_from(dir);
        }
        if let Some(cached) = cached {
            config.download.cached = *cached;
        }
    }
}
