use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ivy_snapshot::github::GithubSnapshotClient;
use ivy_snapshot::harvest::IvyParser;
use ivy_snapshot::{RunError, SubmissionConfig, SubmissionExecutor, DEFAULT_MANIFEST_PATH};

#[derive(Parser)]
#[command(name = "ivy-snapshot")]
#[command(about = "Submit Ivy manifest dependencies to the GitHub dependency graph", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Ivy manifest
    #[arg(default_value = DEFAULT_MANIFEST_PATH)]
    manifest: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli.manifest).await {
        Ok(()) => {
            println!("Dependency snapshot submitted.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            if let RunError::Submit(submit) = &e {
                if let Some(body) = submit.response_body() {
                    eprintln!("{}", body);
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(manifest: &str) -> Result<(), RunError> {
    // Configuration is validated before the manifest is touched
    let config = SubmissionConfig::from_env()?;
    let client = GithubSnapshotClient::new(config.api_url.as_str())?;

    let executor = SubmissionExecutor::new(IvyParser::new(), client);
    let outcome = executor.execute(&config, manifest).await?;

    tracing::info!(
        status = outcome.receipt.status,
        declared = outcome.declared,
        resolved = outcome.resolved,
        "Snapshot submitted"
    );
    Ok(())
}
