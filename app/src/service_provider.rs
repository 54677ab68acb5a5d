use std::sync::Arc;

use domain_job::model::vo::LaunchMode;
use infrastructure_command::{ShellModuleService, TokioProcessService};
use service_job::{
    EnvironmentServiceImpl, LaunchServiceImpl, RequestServiceImpl, SubmissionServiceImpl,
};

use crate::config::LauncherConfig;

/// Wire the submission pipeline for an already resolved launch mode.
pub fn submission_service(config: &LauncherConfig, mode: LaunchMode) -> SubmissionServiceImpl {
    let module_service = Arc::new(ShellModuleService::new(
        config.environment.module_shell.clone(),
        config.environment.module_shell_args.clone(),
    ));
    let environment_service = EnvironmentServiceImpl::builder()
        .module_service(module_service)
        .data_dir_var(config.environment.data_dir_var.clone())
        .verify_modules(config.environment.verify_modules)
        .build();
    let launch_service = LaunchServiceImpl::builder()
        .process_service(Arc::new(TokioProcessService))
        .mode(mode)
        .srun(config.scheduler.srun.clone())
        .sbatch(config.scheduler.sbatch.clone())
        .shell(config.environment.module_shell.clone())
        .script_dir(config.scheduler.script_dir.clone())
        .build();
    SubmissionServiceImpl::builder()
        .request_service(Arc::new(RequestServiceImpl))
        .environment_service(Arc::new(environment_service))
        .launch_service(Arc::new(launch_service))
        .build()
}
