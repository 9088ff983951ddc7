mod cli;
mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod orchestrator;
mod output;
mod review;
mod state;
#[cfg(test)]
mod testing;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::{Config, RunConfig};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::orchestrator::schedule::{RetryPolicy, RunMode, Scheduler, TokioSleeper};
use crate::orchestrator::AttemptInputs;
use crate::output::{ConsoleReporter, StdinOperator};
use crate::state::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // before clap, so JOB_TARGET can come from .env
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.code(), "{e}");
            eprintln!("drafter error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // Configuration problems are fatal before any model call
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the documents
    tracing_subscriber::registry()
        .with(log_filter(cli.debug, config.rust_log.as_deref()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting drafter v{}", env!("CARGO_PKG_VERSION"));

    let job = cli.job_target()?;
    let run_config = RunConfig::load(&cli.config).await?;
    let policy = RetryPolicy::from_config(&run_config)?;
    let mode = RunMode::resolve(cli.once, cli.daemon, &run_config);
    info!(
        "Run mode {:?}: up to {} attempt(s), reapply every {}-{} days",
        mode,
        policy.attempts_for(mode),
        policy.min_days,
        policy.max_days
    );

    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.model.clone())
        .map_err(|e| AppError::llm("Failed to initialize LLM client", e))?
        .with_payload_logging(cli.debug);
    info!("LLM client initialized (model: {})", llm.settings().model);

    let state = AppState::new(Arc::new(llm), Arc::new(ConsoleReporter));
    let inputs = AttemptInputs {
        job,
        profile_path: cli.profile,
        notes_path: cli.notes,
    };
    let mut scheduler = Scheduler::new(policy, TokioSleeper);
    let mut operator = StdinOperator::new();

    orchestrator::run(&state, &inputs, mode, &mut scheduler, &mut operator).await?;
    Ok(())
}

/// `--debug` always means `drafter=debug`, whatever `RUST_LOG` says. Otherwise
/// `RUST_LOG` applies, falling back to `drafter=info`.
fn log_filter(debug: bool, rust_log: Option<&str>) -> EnvFilter {
    let crate_name = env!("CARGO_PKG_NAME");
    if debug {
        return EnvFilter::new(format!("{crate_name}=debug"));
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(format!("{crate_name}=info")))
}
