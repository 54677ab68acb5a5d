use async_trait::async_trait;
use mockall::mock;

use crate::{
    exception::JobResult,
    model::{
        entity::JobSpec,
        vo::{EnvMap, ExitStatus, Invocation, LaunchPlan, SubmissionRequest},
    },
    service::{EnvironmentService, LaunchService, ModuleService, ProcessService, RequestService},
};

mock! {
    pub ModuleService {}
    #[async_trait]
    impl ModuleService for ModuleService {
        async fn is_available(&self, module: &str) -> anyhow::Result<bool>;
    }
}

mock! {
    pub ProcessService {}
    #[async_trait]
    impl ProcessService for ProcessService {
        async fn run(&self, invocation: &Invocation) -> anyhow::Result<ExitStatus>;
    }
}

mock! {
    pub RequestService {}
    impl RequestService for RequestService {
        fn build_request(&self, spec: &JobSpec) -> JobResult<SubmissionRequest>;
    }
}

mock! {
    pub EnvironmentService {}
    #[async_trait]
    impl EnvironmentService for EnvironmentService {
        async fn prepare_environment(&self, spec: &JobSpec) -> JobResult<EnvMap>;
    }
}

mock! {
    pub LaunchService {}
    #[async_trait]
    impl LaunchService for LaunchService {
        async fn prepare(
            &self,
            request: &SubmissionRequest,
            env: &EnvMap,
            command: &str,
            args: &[String],
        ) -> JobResult<LaunchPlan>;
        async fn launch(
            &self,
            request: &SubmissionRequest,
            env: &EnvMap,
            command: &str,
            args: &[String],
        ) -> JobResult<ExitStatus>;
    }
}
