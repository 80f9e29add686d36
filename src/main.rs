use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tokio::io::BufReader;

use arqr::domain::types::ScanPayload;
use arqr::models::config::{AppConfig, ConfigError, SuggestionMode};
use arqr::repository::{AppwriteRepository, RepositoryError};
use arqr::scanner::{Alert, LineScanSource, ScannerApp, ScannerError, SystemLinkOpener};
use arqr::services::resolver::ProductResolver;
use arqr::views::{ViewError, ViewRenderer};

#[derive(Debug, Parser)]
#[command(name = "arqr", version, about = "Look up products by their QR code")]
struct Cli {
    /// Configuration file, without extension.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Skip the recommended alternative.
    #[arg(long, global = true)]
    no_alternatives: bool,
    /// Skip "You May Also Like" suggestions.
    #[arg(long, global = true)]
    no_suggestions: bool,
    /// Fetch the collection again when picking suggestions.
    #[arg(long, global = true, conflicts_with = "no_suggestions")]
    refetch_suggestions: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read QR payloads from standard input, one per line (default).
    Scan,
    /// Resolve a single payload and print the result.
    Lookup { payload: String },
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("store client: {0}")]
    Store(#[from] RepositoryError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Scanner(#[from] ScannerError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if self.no_alternatives {
            config.resolver.alternatives = false;
        }
        if self.no_suggestions {
            config.resolver.suggestions = SuggestionMode::Disabled;
        } else if self.refetch_suggestions {
            config.resolver.suggestions = SuggestionMode::Refetch;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    log::debug!("Resolver options: {:?}", config.resolver);

    let store = AppwriteRepository::new(config.store.clone())?;
    let mut resolver = ProductResolver::new(store, StdRng::from_entropy(), config.resolver);
    let views = ViewRenderer::new()?;

    match cli.command.unwrap_or(Command::Scan) {
        Command::Scan => {
            let mut source = LineScanSource::new(BufReader::new(tokio::io::stdin()));
            let mut app = ScannerApp::new(resolver, views, SystemLinkOpener);
            app.run(&mut source, &mut io::stdout().lock()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Lookup { payload } => {
            let Ok(payload) = ScanPayload::new(payload) else {
                log::error!("Payload is empty");
                return Ok(ExitCode::FAILURE);
            };
            match resolver.resolve(&payload).await {
                Ok(lookup) => {
                    println!("{}", views.render_detail(&lookup, Utc::now())?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    println!("{}", views.render_alert(Alert::from(&e))?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
