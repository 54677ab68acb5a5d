use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use domain_job::model::vo::LaunchMode;

/// Launch a command on a SLURM cluster with the resources described in the
/// configuration.
#[derive(Debug, Parser)]
#[command(name = "slaunch", version)]
pub struct Cli {
    /// Additional YAML configuration files, applied in order after `config.yaml`.
    #[arg(short, long = "config", value_name = "FILE")]
    pub configs: Vec<PathBuf>,

    /// Override a configuration value, e.g. `job.nodes=2`.
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub overrides: Vec<(String, String)>,

    /// Run as a job step, submit a batch job, or pick based on `SLURM_JOB_ID`.
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Print what would be launched and exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Command and arguments, forwarded verbatim.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Auto,
    Step,
    Submit,
}

impl From<ModeArg> for LaunchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => LaunchMode::Auto,
            ModeArg::Step => LaunchMode::Step,
            ModeArg::Submit => LaunchMode::Submit,
        }
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("`{s}` is not in KEY=VALUE form"))?;
    if key.trim().is_empty() {
        return Err(format!("`{s}` has an empty key"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}
