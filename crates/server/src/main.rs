use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use folio_auth::{Authenticator, OtpMailer, spawn_sweeper};
use folio_blob::{BlobStore, FsBlobStore, MemoryBlobStore};
use folio_document::{DocumentService, DocumentStore, FileDocumentStore, MemoryDocumentStore};
use folio_email::{LogMailer, SmtpMailer};
use folio_server::api::AppState;
use folio_server::config::{DocumentBackend, FolioConfig, StorageBackend};
use folio_state_memory::MemoryStateStore;

/// Folio portfolio backend HTTP server.
#[derive(Parser, Debug)]
#[command(name = "folio-server", about = "HTTP server for the folio portfolio backend")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "folio.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Hash a password for the `[admin]` config section. Reads the
    /// plaintext from stdin.
    HashPassword,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber from RUST_LOG or default to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(Commands::HashPassword) = cli.command {
        return run_hash_password();
    }

    // Load configuration. The admin credential is required, so there is no
    // useful default config.
    if !Path::new(&cli.config).exists() {
        return Err(format!(
            "config file not found: {} (see folio.example.toml)",
            cli.config
        )
        .into());
    }
    let contents = std::fs::read_to_string(&cli.config)?;
    let config: FolioConfig = toml::from_str(&contents)?;

    // Volatile auth state plus the authenticator.
    let state_store = Arc::new(MemoryStateStore::new());
    let mailer: Arc<dyn OtpMailer> = match config.email {
        Some(ref email_config) => {
            let mailer = SmtpMailer::new(email_config.clone())
                .map_err(|e| format!("invalid email config: {e}"))?;
            info!(host = %email_config.smtp_host, "SMTP mailer initialized");
            Arc::new(mailer)
        }
        None => {
            tracing::warn!("no [email] section; one-time codes will be logged (dev only)");
            Arc::new(LogMailer)
        }
    };
    let auth = Arc::new(Authenticator::new(
        config.admin.credentials(),
        config.auth.auth_config(),
        state_store,
        mailer,
    ));
    let sweeper_handle = spawn_sweeper(Arc::clone(&auth));

    // Document persistence.
    let document_store: Arc<dyn DocumentStore> = match config.document.backend {
        DocumentBackend::File => {
            info!(path = %config.document.path, "file document store initialized");
            Arc::new(FileDocumentStore::new(&config.document.path))
        }
        DocumentBackend::Memory => {
            tracing::warn!("memory document store; contents are lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
    };
    let documents = Arc::new(DocumentService::new(document_store));

    // Uploaded-file storage.
    let public_url = config.server.resolved_public_url();
    let blobs: Arc<dyn BlobStore> = match config.storage.backend {
        StorageBackend::Fs => {
            info!(root = %config.storage.root, "filesystem blob store initialized");
            Arc::new(FsBlobStore::open(&config.storage.root, &public_url)?)
        }
        StorageBackend::Memory => {
            tracing::warn!("memory blob store; uploads are lost on restart");
            Arc::new(MemoryBlobStore::new(&public_url))
        }
    };

    let state = AppState {
        auth,
        documents,
        blobs,
    };
    let app = folio_server::api::router(state);

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "folio-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the background sweep, giving an in-flight pass a bounded window
    // to wind down.
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    sweeper_handle.abort();
    let _ = tokio::time::timeout(shutdown_timeout, sweeper_handle).await;

    info!("folio-server shut down");
    Ok(())
}

/// Run the `hash-password` subcommand: read plaintext from stdin, print the
/// argon2 hash to stdout.
fn run_hash_password() -> Result<(), Box<dyn std::error::Error>> {
    let mut plaintext = String::new();
    std::io::Read::read_to_string(&mut std::io::stdin(), &mut plaintext)?;
    let plaintext = plaintext.trim_end_matches('\n');

    let hash = folio_auth::password::hash_password(plaintext)?;
    println!("{hash}");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
