use std::sync::Arc;

use async_trait::async_trait;
use domain_job::{
    exception::{JobException, JobResult},
    model::{
        entity::JobSpec,
        vo::{ExitStatus, LaunchPlan},
    },
    service::{EnvironmentService, LaunchService, RequestService, SubmissionService},
};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct SubmissionServiceImpl {
    request_service: Arc<dyn RequestService>,
    environment_service: Arc<dyn EnvironmentService>,
    launch_service: Arc<dyn LaunchService>,
}

#[async_trait]
impl SubmissionService for SubmissionServiceImpl {
    #[tracing::instrument(skip_all, fields(job = spec.name.as_deref().unwrap_or_default()))]
    async fn submit(&self, spec: JobSpec) -> JobResult<ExitStatus> {
        let request = self.request_service.build_request(&spec)?;
        tracing::debug!("Resource request: {:?}", request.flags());
        let env = self.environment_service.prepare_environment(&spec).await?;
        let JobSpec { command, args, .. } = spec;
        let status = self.launch_service.launch(&request, &env, &command, &args).await?;
        if !status.success() {
            return Err(JobException::LaunchFailure {
                command,
                code: status.code(),
            });
        }
        Ok(status)
    }

    async fn plan(&self, spec: &JobSpec) -> JobResult<LaunchPlan> {
        let request = self.request_service.build_request(spec)?;
        let env = self.environment_service.prepare_environment(spec).await?;
        self.launch_service.prepare(&request, &env, &spec.command, &spec.args).await
    }
}
