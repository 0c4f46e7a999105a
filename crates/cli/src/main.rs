//! Liubiljett CLI - Inspect the current API session.
//!
//! # Usage
//!
//! ```bash
//! # Show who the configured token logs in as
//! lb-cli whoami
//!
//! # Show that person's default cart
//! lb-cli cart
//! ```
//!
//! # Commands
//!
//! - `whoami` - Print the current person
//! - `cart` - Print the current person's default cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use liubiljett_session::{SessionConfig, SessionService};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::session::CommandError;

#[derive(Parser)]
#[command(name = "lb-cli")]
#[command(author, version, about = "Liubiljett session tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the logged-in person
    Whoami,
    /// Print the logged-in person's default cart
    Cart,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &SessionConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be up before the subscriber so the tracing layer binds to it
    let config = SessionConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Logs go to stderr so stdout stays machine-readable JSON
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "liubiljett_session=info,lb_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(CommandError::from(e)),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &SessionConfig) -> Result<(), CommandError> {
    let session = SessionService::from_config(&config.api)?;

    match cli.command {
        Commands::Whoami => commands::session::whoami(&session).await?,
        Commands::Cart => commands::session::cart(&session).await?,
    }
    Ok(())
}
