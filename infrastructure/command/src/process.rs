use anyhow::Context;
use async_trait::async_trait;
use domain_job::{
    model::vo::{ExitStatus, Invocation},
    service::ProcessService,
};
use tokio::process::Command;

/// Spawns invocations on the local host, stdio inherited.
#[derive(Debug, Default)]
pub struct TokioProcessService;

#[async_trait]
impl ProcessService for TokioProcessService {
    async fn run(&self, invocation: &Invocation) -> anyhow::Result<ExitStatus> {
        tracing::debug!("Spawning {invocation}");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(&invocation.envs)
            .status()
            .await
            .with_context(|| format!("Unable to spawn `{}`", invocation.program))?;
        Ok(convert_status(status))
    }
}

fn convert_status(status: std::process::ExitStatus) -> ExitStatus {
    if let Some(code) = status.code() {
        return ExitStatus::from_code(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitStatus::from_signal(signal);
        }
    }
    ExitStatus::from_code(1)
}
