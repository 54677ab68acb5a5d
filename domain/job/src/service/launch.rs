use async_trait::async_trait;

use crate::exception::JobResult;
use crate::model::vo::{EnvMap, ExitStatus, LaunchPlan, SubmissionRequest};

#[async_trait]
pub trait LaunchService: Send + Sync {
    /// Resolve what would be run, without running it.
    async fn prepare(
        &self,
        request: &SubmissionRequest,
        env: &EnvMap,
        command: &str,
        args: &[String],
    ) -> JobResult<LaunchPlan>;

    /// Run `command` with `args` under the scheduler and wait for it.
    /// A nonzero status is returned as is, not as an error.
    async fn launch(
        &self,
        request: &SubmissionRequest,
        env: &EnvMap,
        command: &str,
        args: &[String],
    ) -> JobResult<ExitStatus>;
}
