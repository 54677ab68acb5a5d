use std::collections::BTreeMap;
use std::path::PathBuf;

use domain_job::{
    exception::{JobException, JobResult},
    model::{
        entity::JobSpec,
        vo::{GpuResource, LaunchMode, Memory, TimeLimit},
    },
};
use serde::*;

use crate::cli::Cli;
use crate::telemetry::TelemetryConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default = "Default::default")]
    pub job: JobConfig,
    #[serde(default = "Default::default")]
    pub environment: EnvironmentConfig,
    #[serde(default = "Default::default")]
    pub scheduler: SchedulerConfig,
    #[serde(default = "Default::default")]
    pub launch: LaunchConfig,
    #[serde(default = "Default::default")]
    pub telemetry: TelemetryConfig,
}

/// Resource requests, as written in the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default = "Default::default")]
    pub name: Option<String>,
    #[serde(default = "Default::default")]
    pub account: String,
    #[serde(default = "Default::default")]
    pub partition: String,
    #[serde(default = "JobConfig::default_count")]
    pub nodes: i64,
    #[serde(default = "JobConfig::default_count")]
    pub tasks_per_node: i64,
    #[serde(default = "JobConfig::default_count")]
    pub cpus_per_task: i64,
    /// `[<type>:]<count>`, e.g. `v100:1`.
    #[serde(default = "Default::default")]
    pub gpu: Option<String>,
    #[serde(default = "Default::default")]
    pub memory: Option<String>,
    #[serde(default = "Default::default")]
    pub time: Option<String>,
    #[serde(default = "Default::default")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default = "Default::default")]
    pub modules: Vec<String>,
    #[serde(default = "Default::default")]
    pub data_dir: PathBuf,
    #[serde(default = "EnvironmentConfig::default_data_dir_var")]
    pub data_dir_var: String,
    #[serde(default = "Default::default")]
    pub variables: BTreeMap<String, String>,
    #[serde(default = "EnvironmentConfig::default_verify_modules")]
    pub verify_modules: bool,
    /// Shell in which `module` is defined.
    #[serde(default = "EnvironmentConfig::default_module_shell")]
    pub module_shell: String,
    #[serde(default = "EnvironmentConfig::default_module_shell_args")]
    pub module_shell_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "Default::default")]
    pub mode: LaunchMode,
    #[serde(default = "SchedulerConfig::default_srun")]
    pub srun: String,
    #[serde(default = "SchedulerConfig::default_sbatch")]
    pub sbatch: String,
    /// Where batch scripts are written before submission.
    #[serde(default = "SchedulerConfig::default_script_dir")]
    pub script_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Run every command through this program, e.g. `python3`.
    #[serde(default = "Default::default")]
    pub interpreter: Option<String>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: None,
            account: Default::default(),
            partition: Default::default(),
            nodes: Self::default_count(),
            tasks_per_node: Self::default_count(),
            cpus_per_task: Self::default_count(),
            gpu: None,
            memory: None,
            time: None,
            output: None,
        }
    }
}

impl JobConfig {
    pub fn default_count() -> i64 {
        1
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            modules: Default::default(),
            data_dir: Default::default(),
            data_dir_var: Self::default_data_dir_var(),
            variables: Default::default(),
            verify_modules: Self::default_verify_modules(),
            module_shell: Self::default_module_shell(),
            module_shell_args: Self::default_module_shell_args(),
        }
    }
}

impl EnvironmentConfig {
    pub fn default_data_dir_var() -> String {
        "DATADIR".to_string()
    }
    pub fn default_verify_modules() -> bool {
        true
    }
    pub fn default_module_shell() -> String {
        "bash".to_string()
    }
    pub fn default_module_shell_args() -> Vec<String> {
        vec!["-lc".to_string()]
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            mode: Default::default(),
            srun: Self::default_srun(),
            sbatch: Self::default_sbatch(),
            script_dir: Self::default_script_dir(),
        }
    }
}

impl SchedulerConfig {
    pub fn default_srun() -> String {
        "srun".to_string()
    }
    pub fn default_sbatch() -> String {
        "sbatch".to_string()
    }
    pub fn default_script_dir() -> PathBuf {
        PathBuf::from(".slaunch")
    }
}

impl LauncherConfig {
    /// Combine the configured resources with the command line into a job spec.
    pub fn job_spec(&self, mut positionals: Vec<String>) -> JobResult<JobSpec> {
        let job = &self.job;
        let (command, args) = match &self.launch.interpreter {
            Some(interpreter) => (interpreter.clone(), positionals),
            None if positionals.is_empty() => {
                return Err(JobException::invalid_spec("command", "is missing"))
            }
            None => {
                let command = positionals.remove(0);
                (command, positionals)
            }
        };
        let time_limit: TimeLimit = job
            .time
            .as_deref()
            .ok_or_else(|| JobException::invalid_spec("time", "is missing"))?
            .parse()?;
        let gpu: Option<GpuResource> = job.gpu.as_deref().map(str::parse).transpose()?;
        let memory: Option<Memory> = job.memory.as_deref().map(str::parse).transpose()?;

        Ok(JobSpec {
            name: job.name.clone(),
            node_count: job.nodes,
            tasks_per_node: job.tasks_per_node,
            cpus_per_task: job.cpus_per_task,
            partition: job.partition.clone(),
            gpu,
            time_limit,
            memory,
            account: job.account.clone(),
            environment_modules: self.environment.modules.clone(),
            data_dir: self.environment.data_dir.clone(),
            environment: self.environment.variables.clone(),
            output: job.output.clone(),
            command,
            args,
        })
    }
}

/// Layered configuration: `config.yaml`, `--config` files, `SLAUNCH__*`
/// environment variables, then `--set` overrides.
pub fn build_config(cli: &Cli) -> anyhow::Result<config::Config> {
    let mut config = config::Config::builder().add_source(
        config::File::with_name("config")
            .required(false)
            .format(config::FileFormat::Yaml),
    );
    for path in &cli.configs {
        config = config.add_source(
            config::File::from(path.as_path())
                .format(config::FileFormat::Yaml)
                .required(true),
        );
    }
    config = config.add_source(
        config::Environment::with_prefix("SLAUNCH")
            .separator("__")
            .try_parsing(true)
            .list_separator(";")
            .with_list_parse_key("environment.modules")
            .with_list_parse_key("environment.module_shell_args"),
    );
    for (key, value) in &cli.overrides {
        config = config.set_override(key.as_str(), value.as_str())?;
    }
    Ok(config.build()?)
}
