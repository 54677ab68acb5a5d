use std::process::Stdio;

use anyhow::{bail, Context};
use async_trait::async_trait;
use domain_job::service::ModuleService;
use tokio::process::Command;

/// Queries Lmod / Environment Modules through a shell, since `module` is a
/// shell function rather than a program.
#[derive(Debug)]
pub struct ShellModuleService {
    shell: String,
    shell_args: Vec<String>,
}

impl ShellModuleService {
    pub fn new(shell: String, shell_args: Vec<String>) -> Self {
        Self { shell, shell_args }
    }
}

impl Default for ShellModuleService {
    fn default() -> Self {
        Self::new("bash".to_string(), vec!["-lc".to_string()])
    }
}

#[async_trait]
impl ModuleService for ShellModuleService {
    async fn is_available(&self, module: &str) -> anyhow::Result<bool> {
        let status = Command::new(&self.shell)
            .args(&self.shell_args)
            .arg(r#"module is-avail "$1""#)
            .arg("slaunch")
            .arg(module)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .with_context(|| format!("Unable to spawn `{}`", self.shell))?;
        availability(status.code())
    }
}

fn availability(code: Option<i32>) -> anyhow::Result<bool> {
    match code {
        Some(0) => Ok(true),
        Some(1) => Ok(false),
        Some(127) => bail!("No module system found: `module` is not a command"),
        Some(code) => bail!("`module is-avail` exit with {code}"),
        None => bail!("`module is-avail` was killed by a signal"),
    }
}
