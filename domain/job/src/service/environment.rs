use async_trait::async_trait;

use crate::exception::JobResult;
use crate::model::{entity::JobSpec, vo::EnvMap};

#[async_trait]
pub trait EnvironmentService: Send + Sync {
    /// Collect the variables and modules the launched command needs,
    /// checking that every module can be loaded.
    async fn prepare_environment(&self, spec: &JobSpec) -> JobResult<EnvMap>;
}
