//! botmetrics CLI - login and data export for the chatbot analytics API.
//!
//! The dashboard UI normally drives the core; this binary is the headless
//! equivalent: it authenticates, keeps the session file fresh, and writes
//! export documents to disk.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use botmetrics::{
    ApiClient, ApiConfig, Config, CredentialStore, ExportFormat, Exporter, SessionManager,
    TokenStore,
};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: botmetrics <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login <username>              Authenticate and persist the session");
    eprintln!("  logout                        Clear the persisted session");
    eprintln!("  status                        Show who is logged in");
    eprintln!("  export [csv|excel|report] [path]   Export all dashboard data");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");

    let mut config = Config::load()?;
    let api_config = ApiConfig::resolve(&config);
    let store = TokenStore::new(Config::token_path()?);
    let session = Arc::new(SessionManager::new(api_config, store)?);
    let client = Arc::new(ApiClient::new(Arc::clone(&session)));

    match command {
        "login" => {
            let username = args
                .get(2)
                .cloned()
                .or_else(|| config.last_username.clone())
                .context("Usage: botmetrics login <username>")?;
            let password = read_password(&username)?;

            session.login(&username, &password).await?;

            config.last_username = Some(username.clone());
            config.save()?;
            if let Err(e) = CredentialStore::store(&username, &password) {
                info!(error = %e, "Could not store credentials in keychain");
            }
            println!("Logged in as {}", username);
        }
        "logout" => {
            session.logout().await;
            if let Some(ref username) = config.last_username {
                let _ = CredentialStore::delete(username);
            }
            println!("Logged out");
        }
        "status" => {
            if !session.is_authenticated().await {
                println!("Not logged in");
                return Ok(());
            }
            match client.current_user().await {
                Ok(user) => println!(
                    "Logged in as {} ({})",
                    user.user_id,
                    user.role.as_deref().unwrap_or("no role")
                ),
                Err(e) => println!("Session held but identity lookup failed: {}", e),
            }
        }
        "export" => {
            ensure_session(&session, &config).await?;

            let format = match args.get(2) {
                Some(name) => ExportFormat::parse(name)
                    .with_context(|| format!("Unknown export format: {}", name))?,
                None => ExportFormat::Csv,
            };

            let exporter = Exporter::new(Arc::clone(&client));
            let document = exporter.export_all(format).await?;

            let path = args
                .get(3)
                .cloned()
                .unwrap_or_else(|| document.filename.clone());
            std::fs::write(&path, &document.content)
                .with_context(|| format!("Failed to write export to {}", path))?;
            println!("Wrote {} ({} bytes)", path, document.content.len());
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Re-authenticate with keychain credentials when no session is held.
async fn ensure_session(session: &Arc<SessionManager>, config: &Config) -> Result<()> {
    if session.is_authenticated().await {
        return Ok(());
    }

    let username = config
        .last_username
        .clone()
        .context("Not logged in (run `botmetrics login <username>`)")?;
    let password = CredentialStore::get_password(&username)
        .context("No stored credentials (run `botmetrics login <username>`)")?;

    session.login(&username, &password).await?;
    info!(username = %username, "Re-authenticated with stored credentials");
    Ok(())
}

/// Password comes from BOTMETRICS_PASSWORD, the keychain, or a prompt.
fn read_password(username: &str) -> Result<String> {
    if let Ok(password) = std::env::var("BOTMETRICS_PASSWORD") {
        return Ok(password);
    }
    if let Ok(password) = CredentialStore::get_password(username) {
        return Ok(password);
    }

    eprint!("Password for {}: ", username);
    io::stderr().flush()?;
    let mut password = String::new();
    io::stdin()
        .lock()
        .read_line(&mut password)
        .context("Failed to read password")?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}
