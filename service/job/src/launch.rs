use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use domain_job::{
    exception::{JobException, JobResult},
    model::vo::{
        shell_quote, EnvMap, ExitStatus, Invocation, LaunchMode, LaunchPlan, SubmissionRequest,
    },
    service::{LaunchService, ProcessService},
};
use indoc::formatdoc;
use typed_builder::TypedBuilder;

/// Runs commands as SLURM job steps, or submits them as batch jobs and waits
/// for them.
#[derive(TypedBuilder)]
pub struct LaunchServiceImpl {
    process_service: Arc<dyn ProcessService>,
    /// Must already be resolved; `Auto` is treated as `Submit`.
    #[builder(default)]
    mode: LaunchMode,
    #[builder(default = "srun".to_string(), setter(into))]
    srun: String,
    #[builder(default = "sbatch".to_string(), setter(into))]
    sbatch: String,
    /// Login shell used to load environment modules for a job step.
    #[builder(default = "bash".to_string(), setter(into))]
    shell: String,
    #[builder(default = PathBuf::from(".slaunch"), setter(into))]
    script_dir: PathBuf,
}

impl LaunchServiceImpl {
    fn step_invocation(
        &self,
        request: &SubmissionRequest,
        env: &EnvMap,
        command: &str,
        args: &[String],
    ) -> Invocation {
        let step = Invocation::new(&self.srun)
            .args(request.flags())
            .arg(command)
            .args(args.iter().cloned());
        let invocation = if env.has_modules() {
            // `module` is a shell function, so it only exists inside a login shell.
            Invocation::new(&self.shell)
                .arg("-lc")
                .arg(format!("{} && exec \"$@\"", module_load(&env.modules)))
                .arg("slaunch")
                .arg(step.program)
                .args(step.args)
        } else {
            step
        };
        invocation.envs(env.vars.clone())
    }

    fn gen_script(&self, request: &SubmissionRequest, env: &EnvMap, step: &Invocation) -> String {
        let header = request.sbatch_header();
        let mut body = env
            .vars
            .iter()
            .map(|(k, v)| format!("export {k}={}", shell_quote(v)))
            .collect::<Vec<_>>();
        if env.has_modules() {
            body.push(module_load(&env.modules));
        }
        body.push(step.command_line());
        let body = body.join("\n");
        formatdoc! {r#"
            #!/bin/bash
            {header}

            {body}
        "#}
    }
}

fn module_load(modules: &[String]) -> String {
    std::iter::once("module load".to_string())
        .chain(modules.iter().map(|m| shell_quote(m)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl LaunchService for LaunchServiceImpl {
    async fn prepare(
        &self,
        request: &SubmissionRequest,
        env: &EnvMap,
        command: &str,
        args: &[String],
    ) -> JobResult<LaunchPlan> {
        match self.mode {
            LaunchMode::Step => Ok(LaunchPlan::Step {
                invocation: self.step_invocation(request, env, command, args),
            }),
            LaunchMode::Submit | LaunchMode::Auto => {
                // Inside the batch script the step inherits the allocation.
                let step = Invocation::new(&self.srun)
                    .arg(command)
                    .args(args.iter().cloned());
                let script = self.gen_script(request, env, &step);
                let script_path = self
                    .script_dir
                    .join(format!("slaunch-{}.sh", uuid::Uuid::new_v4()));
                let invocation = Invocation::new(&self.sbatch)
                    .arg("--wait")
                    .arg(script_path.to_string_lossy())
                    .envs(env.vars.clone());
                Ok(LaunchPlan::Submit {
                    script_path,
                    script,
                    invocation,
                })
            }
        }
    }

    #[tracing::instrument(skip_all, fields(mode = ?self.mode, command = %command))]
    async fn launch(
        &self,
        request: &SubmissionRequest,
        env: &EnvMap,
        command: &str,
        args: &[String],
    ) -> JobResult<ExitStatus> {
        let plan = self.prepare(request, env, command, args).await?;
        if let LaunchPlan::Submit {
            script_path,
            script,
            ..
        } = &plan
        {
            tokio::fs::create_dir_all(&self.script_dir)
                .await
                .with_context(|| format!("Unable to create {}", self.script_dir.display()))?;
            tokio::fs::write(script_path, script)
                .await
                .with_context(|| format!("Unable to write {}", script_path.display()))?;
            tracing::info!("Batch script written to {}.", script_path.display());
        }
        let invocation = plan.invocation();
        tracing::info!("Launching {}", invocation.command_line());
        let result = self.process_service.run(invocation).await;
        // `sbatch --wait` has returned, the job no longer reads its script.
        if let LaunchPlan::Submit { script_path, .. } = &plan {
            if let Err(e) = tokio::fs::remove_file(script_path).await {
                tracing::warn!("Unable to remove {}: {e}", script_path.display());
            }
        }
        match result {
            Ok(status) => {
                tracing::info!("{} finished with {status}.", invocation.program);
                Ok(status)
            }
            Err(e) => {
                tracing::error!("Unable to start {}: {e:#}", invocation.program);
                Err(JobException::LaunchFailure {
                    command: invocation.program.clone(),
                    code: ExitStatus::NOT_FOUND.code(),
                })
            }
        }
    }
}
