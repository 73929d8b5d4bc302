use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{info, warn};
use std::fs;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use rota::domain::EntityKind;
use rota::edit::EditManager;
use rota::gateway::{Gateway, HttpGateway};
use rota::loader::{DatasetLoader, LoadedSchedule, Reload};
use rota::proxy::{self, ProxyState};
use rota::regen::{RegenMode, RegenerationOrchestrator};
use rota::render;
use rota::view::{FilterOptions, ViewState, build_page, sorted_filtered, total_pages};

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, EditArgs, ScheduleArgs};
use config::Config;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rota")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("rota.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_gateway(config: &Config) -> Result<Arc<dyn Gateway>> {
    let gateway = HttpGateway::new(config.gateway_config()).context("Failed to create gateway")?;
    info!("Using {:?}", gateway);
    Ok(Arc::new(gateway))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<ExitCode> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => handle_schedule_command(&ScheduleArgs::default(), config).await,
        Some(Commands::Schedule(args)) => handle_schedule_command(args, config).await,
        Some(Commands::Options { refresh }) => handle_options_command(*refresh, config).await,
        Some(Commands::Refs { kind }) => handle_refs_command(*kind, config).await,
        Some(Commands::Edit(args)) => handle_edit_command(args, config).await,
        Some(Commands::Regenerate { inline }) => handle_regenerate_command(*inline, config).await,
        Some(Commands::Proxy { bind }) => handle_proxy_command(*bind, config).await,
    }
}

fn print_schedule(loaded: &LoadedSchedule, args: &ScheduleArgs) {
    let snapshot = &loaded.snapshot;
    let mut state = ViewState::with_filters(args.filters());
    let total = total_pages(sorted_filtered(snapshot, &state).len(), state.page_size());
    state.set_page(args.page.max(1), total);
    let page = build_page(snapshot, &state);

    println!("{}", render::render_header(snapshot));
    println!("{}", render::render_page(snapshot, &page));
    println!();
    println!("{}", render::render_summary(snapshot));
}

async fn handle_schedule_command(args: &ScheduleArgs, config: &Config) -> Result<ExitCode> {
    info!("Schedule view: {:?}", args);
    let loader = DatasetLoader::new(build_gateway(config)?);
    let reload = if args.refresh { Reload::Forced } else { Reload::Normal };

    match loader.load_schedule(reload).await {
        Ok(loaded) => {
            info!("Schedule loaded from {}", loaded.source.file_name());
            print_schedule(&loaded, args);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", render::render_load_error(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn handle_options_command(refresh: bool, config: &Config) -> Result<ExitCode> {
    let loader = DatasetLoader::new(build_gateway(config)?);
    let reload = if refresh { Reload::Forced } else { Reload::Normal };

    match loader.load_schedule(reload).await {
        Ok(loaded) => {
            let options = FilterOptions::from_snapshot(&loaded.snapshot);
            println!("{}", render::render_filter_options(&options));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", render::render_load_error(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn handle_refs_command(kind: Option<EntityKind>, config: &Config) -> Result<ExitCode> {
    info!("Loading reference data (kind: {:?})", kind);
    let loader = DatasetLoader::new(build_gateway(config)?);
    let loaded = loader.load_reference(Reload::Forced).await;

    let kinds: Vec<EntityKind> = match kind {
        Some(kind) => vec![kind],
        None => EntityKind::ALL.to_vec(),
    };
    println!("{}", render::render_reference(&loaded, &kinds));
    Ok(ExitCode::SUCCESS)
}

async fn handle_edit_command(args: &EditArgs, config: &Config) -> Result<ExitCode> {
    info!("Editing {} {} (new: {})", args.kind, args.id, args.new);
    let gateway = build_gateway(config)?;
    let loaded = DatasetLoader::new(Arc::clone(&gateway)).load_reference(Reload::Forced).await;
    let mut editor = EditManager::new(gateway, loaded.dataset);

    if args.new {
        editor.add_entity(args.new_record()).await?;
        println!("{} {} {}", "Added".green(), args.kind, args.id);
    } else {
        let current = editor.begin_edit(args.kind, &args.id)?;
        editor.apply_edit(args.apply(current)).await?;
        println!("{} {} {}", "Updated".green(), args.kind, args.id);
    }

    match editor.settle().await {
        Some(Ok(ack)) => println!("{} {}", "Saved:".green(), ack.message.unwrap_or_default()),
        Some(Err(e)) => {
            warn!("Save failed: {}", e);
            println!("{} {}", "Not saved:".red(), e);
        }
        None => {}
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_regenerate_command(inline: bool, config: &Config) -> Result<ExitCode> {
    info!("Regenerating schedule (inline: {})", inline);
    let gateway = build_gateway(config)?;
    let loader = DatasetLoader::new(Arc::clone(&gateway));
    let orchestrator = RegenerationOrchestrator::new(Arc::clone(&gateway), config.progress_config());

    let mut editor = if inline {
        let loaded = loader.load_reference(Reload::Forced).await;
        Some(EditManager::new(Arc::clone(&gateway), loaded.dataset))
    } else {
        None
    };
    let mode = match editor.as_mut() {
        Some(editor) => RegenMode::Inline(editor),
        None => RegenMode::ServerHeld,
    };

    let mut progress = orchestrator.subscribe_progress();
    let run = orchestrator.run(mode);
    tokio::pin!(run);
    let outcome = loop {
        tokio::select! {
            outcome = &mut run => break outcome,
            Ok(()) = progress.changed() => {
                let percent = *progress.borrow_and_update();
                print!("\r{}", render::render_progress(orchestrator.phase(), percent));
                let _ = std::io::stdout().flush();
            }
        }
    };

    match outcome {
        Ok(success) => {
            println!("\r{}", render::render_progress(orchestrator.phase(), orchestrator.progress()));
            if let Some(message) = &success.result.message {
                println!("{}", message.green());
            }
            info!("Following {}", success.navigation.url());
            match loader.load_schedule(success.navigation.reload()).await {
                Ok(loaded) => {
                    print_schedule(&loaded, &ScheduleArgs::default());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    println!("{}", render::render_load_error(&e));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Err(failure) => {
            println!();
            println!("{} {}", "Error:".red().bold(), failure.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn handle_proxy_command(bind: Option<SocketAddr>, config: &Config) -> Result<ExitCode> {
    let addr = match bind {
        Some(addr) => addr,
        None => config.proxy_bind()?,
    };
    let state = ProxyState::new(config.backend_generate_url(), config.backend_timeout())?;
    println!("{} {} -> {}", "Proxy listening on".cyan(), addr, state.target);
    proxy::serve(addr, state).await.context("Proxy server failed")?;
    Ok(ExitCode::SUCCESS)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")
}
