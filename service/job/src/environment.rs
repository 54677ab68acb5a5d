use std::sync::Arc;

use async_trait::async_trait;
use domain_job::{
    exception::{JobException, JobResult},
    model::{
        entity::JobSpec,
        vo::{env::is_env_name, EnvMap},
    },
    service::{EnvironmentService, ModuleService},
};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct EnvironmentServiceImpl {
    module_service: Arc<dyn ModuleService>,
    /// Variable the training program reads its data directory from.
    #[builder(default = "DATADIR".to_string(), setter(into))]
    data_dir_var: String,
    #[builder(default = true)]
    verify_modules: bool,
}

#[async_trait]
impl EnvironmentService for EnvironmentServiceImpl {
    #[tracing::instrument(skip_all, fields(modules = ?spec.environment_modules))]
    async fn prepare_environment(&self, spec: &JobSpec) -> JobResult<EnvMap> {
        if !is_env_name(&self.data_dir_var) {
            return Err(JobException::environment(format!(
                "`{}` is not a valid variable name for the data directory",
                self.data_dir_var
            )));
        }
        let mut env = EnvMap::default();
        for (key, value) in &spec.environment {
            if !is_env_name(key) {
                return Err(JobException::environment(format!(
                    "`{key}` is not a valid variable name"
                )));
            }
            env.set(key, value);
        }
        // The data directory wins over an extra variable of the same name.
        env.set(&self.data_dir_var, spec.data_dir.to_string_lossy());

        if !spec.data_dir.exists() {
            tracing::warn!(
                "Data directory {} is not visible from this host.",
                spec.data_dir.display()
            );
        }

        for module in &spec.environment_modules {
            if module.trim().is_empty() {
                return Err(JobException::environment("an empty module name was requested"));
            }
            if self.verify_modules {
                match self.module_service.is_available(module).await {
                    Ok(true) => tracing::debug!("Module {module} is available."),
                    Ok(false) => {
                        return Err(JobException::environment(format!(
                            "module `{module}` is not available"
                        )))
                    }
                    Err(e) => {
                        return Err(JobException::environment(format!(
                            "unable to query module `{module}`: {e:#}"
                        )))
                    }
                }
            }
            env.modules.push(module.clone());
        }
        Ok(env)
    }
}
