use async_trait::async_trait;

use crate::model::vo::{ExitStatus, Invocation};

#[async_trait]
pub trait ProcessService: Send + Sync {
    /// Spawn with inherited stdio and wait for the exit status.
    async fn run(&self, invocation: &Invocation) -> anyhow::Result<ExitStatus>;
}
