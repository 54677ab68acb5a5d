mod cli;
mod config;
mod service_provider;
mod telemetry;

use clap::Parser;
use colored::Colorize;
use domain_job::{model::vo::LaunchMode, service::SubmissionService};

use crate::cli::Cli;
use crate::config::LauncherConfig;

/// `EX_CONFIG`
const CONFIG_ERROR: i32 = 78;
/// `EX_SOFTWARE`
const INTERNAL_ERROR: i32 = 70;

#[tokio::main]
async fn main() {
    std::process::exit(run(Cli::parse()).await)
}

async fn run(cli: Cli) -> i32 {
    let config: LauncherConfig = match config::build_config(&cli)
        .and_then(|c| c.try_deserialize().map_err(anyhow::Error::from))
    {
        Ok(x) => x,
        Err(e) => {
            eprintln!("{}: {e:#}", "Failed to build config".red());
            return CONFIG_ERROR;
        }
    };

    if let Err(e) = telemetry::initialize_telemetry(&config.telemetry) {
        eprintln!("{}: {e}", "Failed to initialize logger".red());
        return INTERNAL_ERROR;
    }
    if let Ok(effective) = serde_yaml::to_string(&config) {
        tracing::debug!("Effective configuration:\n{effective}");
    }

    let in_allocation = std::env::var_os("SLURM_JOB_ID").is_some();
    let mode = cli
        .mode
        .map(LaunchMode::from)
        .unwrap_or(config.scheduler.mode)
        .resolve(in_allocation);
    tracing::debug!(in_allocation, "Launch mode resolved to {mode:?}.");

    let spec = match config.job_spec(cli.command) {
        Ok(x) => x,
        Err(e) => {
            tracing::error!("{e}");
            return e.exit_code();
        }
    };
    let service = service_provider::submission_service(&config, mode);

    if cli.dry_run {
        return match service.plan(&spec).await {
            Ok(plan) => {
                print!("{plan}");
                0
            }
            Err(e) => {
                tracing::error!("{e}");
                e.exit_code()
            }
        };
    }

    match service.submit(spec).await {
        Ok(status) => status.code(),
        Err(e) => {
            tracing::error!("{e}");
            e.exit_code()
        }
    }
}
