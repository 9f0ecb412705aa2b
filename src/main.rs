//! # pageharvest CLI Application
//!
//! Command-line entry point for pageharvest.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands:
//!   - `serve`: Run the HTTP API
//!   - `process`: Run the pipeline once for a URL and print the result
//!   - `list`: Inspect stored tasks
//!
//! Settings come from `PAGEHARVEST_*` environment variables; flags override them.

mod telemetry;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use pageharvest::api::{AppState, build_router};
use pageharvest::config::AppConfig;
use pageharvest::pipeline::Pipeline;
use pageharvest::store::{Database, MediaStore};
use tracing::{info, instrument, warn};

#[derive(Parser)]
#[command(author, version, about = "Fetch web pages, extract their text and download their images", long_about = None)]
struct Cli {
    /// Emit console logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Also write daily-rotated log files to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Export traces over OTLP
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Process a single URL and print the stored result
    Process(ProcessArgs),

    /// List stored tasks
    List(ListArgs),
}

#[derive(Args, Debug)]
struct StorageArgs {
    /// Database path
    #[arg(long)]
    database: Option<PathBuf>,

    /// Directory holding downloaded images
    #[arg(long)]
    media_root: Option<PathBuf>,
}

impl StorageArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(database) = self.database {
            config.database_path = database;
        }
        if let Some(media_root) = self.media_root {
            config.media_root = media_root;
        }
    }
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on
    #[arg(short, long)]
    bind: Option<String>,

    #[command(flatten)]
    storage: StorageArgs,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// URL of the page to process
    #[arg(required = true)]
    url: String,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    #[command(flatten)]
    storage: StorageArgs,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Show detailed information
    #[arg(short, long)]
    details: bool,

    #[command(flatten)]
    storage: StorageArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    config.log_json |= cli.log_json;
    config.otel |= cli.otel;
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = Some(log_dir);
    }

    let _otel = telemetry::init_tracing_subscriber(&config)?;

    match cli.command {
        Some(Commands::Serve(args)) => {
            serve_command(config, args).await?;
        }
        Some(Commands::Process(args)) => {
            process_command(config, args).await?;
        }
        Some(Commands::List(args)) => {
            list_command(config, args).await?;
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

async fn open_pipeline(config: &AppConfig) -> anyhow::Result<Pipeline> {
    tokio::fs::create_dir_all(&config.media_root).await?;

    let db = Database::new_from_path(&config.database_path).await?;
    let media = MediaStore::new(config.media_config());
    info!(
        database = %config.database_path.display(),
        media_root = %config.media_root.display(),
        "Storage ready"
    );

    Ok(Pipeline::new(db, media, config.pipeline_config())?)
}

#[instrument(skip(config))]
async fn serve_command(mut config: AppConfig, args: ServeArgs) -> anyhow::Result<()> {
    args.storage.apply(&mut config);
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    let pipeline = open_pipeline(&config).await?;
    let app = build_router(AppState::new(pipeline));

    let addr: SocketAddr = config.bind_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, version = env!("CARGO_PKG_VERSION"), "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("pageharvest stopped");
    Ok(())
}

#[instrument(skip(config))]
async fn process_command(mut config: AppConfig, args: ProcessArgs) -> anyhow::Result<()> {
    args.storage.apply(&mut config);
    let pipeline = open_pipeline(&config).await?;

    let processed = pipeline
        .process(&args.url)
        .await
        .map_err(pageharvest::Error::from)?;
    let text = pipeline.text(processed.task_id).await?;
    let images = pipeline.images(processed.task_id).await?;

    match args.format.as_str() {
        "json" => {
            let json_response = serde_json::json!({
                "task_id": processed.task_id,
                "url": processed.url,
                "text": text.text,
                "images_urls": images.images_urls,
            });
            println!("{}", serde_json::to_string_pretty(&json_response)?);
        }
        _ => {
            println!("Task {}: {}", processed.task_id, processed.url);
            println!("\nText:");
            println!("{}", text.text.as_deref().unwrap_or_default().trim());
            println!("\nImages ({}):", images.images_urls.len());
            for (i, url) in images.images_urls.iter().enumerate() {
                println!("{}. {}", i + 1, url);
            }
        }
    }

    Ok(())
}

#[instrument(skip(config))]
async fn list_command(mut config: AppConfig, args: ListArgs) -> anyhow::Result<()> {
    args.storage.apply(&mut config);
    let db = Database::new_from_path(&config.database_path).await?;
    let media = MediaStore::new(config.media_config());

    let tasks = db.list_tasks().await?;
    println!("Stored tasks: {}", tasks.len());

    let format_timestamp = |ts: i64| -> String {
        use chrono::{TimeZone, Utc};
        Utc.timestamp_opt(ts, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| ts.to_string())
    };

    for task in tasks {
        if args.details {
            let images = db.images_for_task(task.id).await?;

            println!("Task {}", task.id);
            println!("URL: {}", task.url);
            println!("Created: {}", format_timestamp(task.created_at));
            println!("Updated: {}", format_timestamp(task.updated_at));
            println!(
                "Text: {}",
                task.text_content
                    .as_ref()
                    .map(|t| format!("{} characters", t.chars().count()))
                    .unwrap_or_else(|| "pending".to_string())
            );
            println!(
                "Images: {}{}",
                images.len(),
                if task.images_in_progress { " (in progress)" } else { "" }
            );
            for image in images {
                println!("  {}", media.url_for(&image.path));
            }
            println!();
        } else {
            println!("{}. {}", task.id, task.url);
        }
    }

    Ok(())
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received; starting graceful shutdown");
}
