use async_trait::async_trait;

use crate::exception::JobResult;
use crate::model::{
    entity::JobSpec,
    vo::{ExitStatus, LaunchPlan},
};

#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// Validate, build the request, prepare the environment and launch.
    /// Fails with `LaunchFailure` when the command exits nonzero.
    async fn submit(&self, spec: JobSpec) -> JobResult<ExitStatus>;

    /// Same sequence as `submit`, stopping before anything is executed.
    async fn plan(&self, spec: &JobSpec) -> JobResult<LaunchPlan>;
}
