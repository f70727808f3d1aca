//! # limo-quote
//!
//! Command-line entry point: runs the quote API or lists requests waiting
//! for manual follow-up.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use limo_quote::api::rest::{AppState, SEND_QUOTE_PATH, create_router};
use limo_quote::config::Settings;
use limo_quote::domain::entities::FallbackRecord;
use limo_quote::infrastructure::persistence::{FallbackStore, JsonFileFallbackStore};
use limo_quote::telemetry::init_tracing;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "limo-quote")]
#[command(version, about = "Quote-request intake service for EZ Airport Limo")]
struct Cli {
    /// Config file (defaults to config/limo-quote.* when present).
    #[arg(long, global = true, env = "LIMO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Port override.
        #[arg(long)]
        port: Option<u16>,
    },
    /// List quote requests saved for manual follow-up.
    Pending {
        /// Print the records as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            serve(settings).await
        }
        Command::Pending { json } => pending(&settings, json).await,
    }
}

async fn serve(settings: Settings) -> Result<()> {
    init_tracing(&settings.logging)?;
    log_startup(&settings);

    let state = AppState::from_settings(&settings).context("failed to assemble service")?;
    let router = create_router(state);

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!("Listening on http://{address}");
    info!("  POST    {SEND_QUOTE_PATH}");
    info!("  OPTIONS {SEND_QUOTE_PATH}");
    info!("  GET     /health");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("=== limo-quote stopped ===");
    Ok(())
}

fn log_startup(settings: &Settings) {
    info!("=== limo-quote v{} starting ===", env!("CARGO_PKG_VERSION"));
    info!(business = %settings.business.name, phone = %settings.business.phone, "Business profile");
    info!(
        sender = %settings.mail.sender_address,
        operator = %settings.mail.business_mailbox,
        relay = %format!("{}:{}", settings.mail.smtp_host, settings.mail.smtp_port),
        "Mail provider"
    );
    info!(
        oauth2 = settings.has_oauth2(),
        app_password = settings.has_app_password(),
        "Mail credentials"
    );
    if !settings.has_oauth2() && !settings.has_app_password() {
        warn!("No mail credentials configured; every request will go to the fallback store");
    }
    info!(path = %settings.storage.fallback_path.display(), "Fallback store");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

async fn pending(settings: &Settings, json: bool) -> Result<()> {
    let store = JsonFileFallbackStore::new(settings.storage.fallback_path.clone());
    let records = store
        .load_all()
        .await
        .with_context(|| format!("failed to read {}", store.path().display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No pending quote requests in {}", store.path().display());
        return Ok(());
    }

    println!(
        "{} pending quote request(s) in {}",
        records.len(),
        store.path().display()
    );
    for record in &records {
        println!("{}", summary_line(record));
    }
    Ok(())
}

fn summary_line(record: &FallbackRecord) -> String {
    let request = &record.request;
    format!(
        "{}  {}  {} <{}> {}  {} {}  {} -> {}  [{}]",
        record.booking_id,
        record.received_at.to_display_string(),
        request.full_name(),
        request.email(),
        request.phone(),
        request.pickup_date(),
        request.pickup_time(),
        request.pickup_location(),
        request.drop_location(),
        record.delivery_error.code,
    )
}
