use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use domain_job::{
    exception::JobException,
    mock::{
        MockEnvironmentService, MockLaunchService, MockModuleService, MockProcessService,
        MockRequestService,
    },
    model::{
        entity::JobSpec,
        vo::{Directive, EnvMap, ExitStatus, Invocation, LaunchMode, LaunchPlan, SubmissionRequest},
    },
    service::{EnvironmentService, LaunchService, RequestService, SubmissionService},
};
use service_job::{
    EnvironmentServiceImpl, LaunchServiceImpl, RequestServiceImpl, SubmissionServiceImpl,
};

fn train_args() -> Vec<String> {
    ["train.py", "--epochs", "5"].map(String::from).to_vec()
}

fn dvc_spec() -> JobSpec {
    JobSpec::builder()
        .name("dvc")
        .node_count(1)
        .tasks_per_node(2)
        .cpus_per_task(10)
        .partition("gpu")
        .gpu("v100:2".parse().unwrap())
        .time_limit("00:15:00".parse().unwrap())
        .memory("64G".parse().unwrap())
        .account("project_2000859")
        .data_dir("/scratch/project_2000859/extracted")
        .command("python3")
        .args(train_args())
        .build()
}

fn capturing_process(
    status: i32,
) -> (MockProcessService, Arc<Mutex<Option<Invocation>>>) {
    let captured = Arc::new(Mutex::new(None));
    let mut process = MockProcessService::new();
    let sink = captured.clone();
    process.expect_run().times(1).returning(move |invocation| {
        *sink.lock().unwrap() = Some(invocation.clone());
        Ok(ExitStatus::from_code(status))
    });
    (process, captured)
}

/// Records the batch script `sbatch` was given while it still exists.
fn script_reading_process() -> (MockProcessService, Arc<Mutex<Option<(Invocation, String)>>>) {
    let captured = Arc::new(Mutex::new(None));
    let mut process = MockProcessService::new();
    let sink = captured.clone();
    process.expect_run().times(1).returning(move |invocation| {
        let script = std::fs::read_to_string(&invocation.args[1])?;
        *sink.lock().unwrap() = Some((invocation.clone(), script));
        Ok(ExitStatus::SUCCESS)
    });
    (process, captured)
}

fn available_modules() -> MockModuleService {
    let mut modules = MockModuleService::new();
    modules.expect_is_available().returning(|_| Ok(true));
    modules
}

#[test]
fn test_build_request_keeps_requested_fields() {
    let request = RequestServiceImpl.build_request(&dvc_spec()).unwrap();
    assert_eq!(
        request.directives,
        vec![
            Directive::JobName("dvc".to_string()),
            Directive::Account("project_2000859".to_string()),
            Directive::Partition("gpu".to_string()),
            Directive::Nodes(1),
            Directive::TasksPerNode(2),
            Directive::CpusPerTask(10),
            Directive::Gres("v100:2".parse().unwrap()),
            Directive::Memory("64G".parse().unwrap()),
            Directive::Time("00:15:00".parse().unwrap()),
        ]
    );
    assert_eq!(
        request.flags(),
        [
            "--job-name=dvc",
            "--account=project_2000859",
            "--partition=gpu",
            "--nodes=1",
            "--ntasks-per-node=2",
            "--cpus-per-task=10",
            "--gres=gpu:v100:2",
            "--mem=64G",
            "--time=00:15:00",
        ]
    );
}

#[test]
fn test_build_request_skips_absent_optionals() {
    let spec = JobSpec::builder()
        .node_count(2)
        .tasks_per_node(4)
        .cpus_per_task(1)
        .partition("small")
        .time_limit("1-00:00:00".parse().unwrap())
        .account("project_1")
        .data_dir("/data")
        .command("hostname")
        .build();
    let request = RequestServiceImpl.build_request(&spec).unwrap();
    assert!(request.get("gres").is_none());
    assert!(request.get("mem").is_none());
    assert!(request.get("job-name").is_none());
    assert_eq!(request.get("nodes"), Some(&Directive::Nodes(2)));
}

#[test]
fn test_build_request_rejects_non_positive_counts() {
    let cases = [
        ("nodes", JobSpec { node_count: 0, ..dvc_spec() }),
        ("nodes", JobSpec { node_count: -3, ..dvc_spec() }),
        ("cpus_per_task", JobSpec { cpus_per_task: 0, ..dvc_spec() }),
        ("cpus_per_task", JobSpec { cpus_per_task: -1, ..dvc_spec() }),
        ("tasks_per_node", JobSpec { tasks_per_node: 0, ..dvc_spec() }),
    ];
    for (expected, spec) in cases {
        match RequestServiceImpl.build_request(&spec) {
            Err(JobException::InvalidSpec { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected InvalidSpec for {expected}, got {other:?}"),
        }
    }
}

#[test]
fn test_build_request_rejects_missing_fields() {
    let cases = [
        ("partition", JobSpec { partition: String::new(), ..dvc_spec() }),
        ("account", JobSpec { account: " ".to_string(), ..dvc_spec() }),
        ("command", JobSpec { command: String::new(), ..dvc_spec() }),
        ("data_dir", JobSpec { data_dir: Default::default(), ..dvc_spec() }),
        ("time", JobSpec { time_limit: "0".parse().unwrap(), ..dvc_spec() }),
    ];
    for (expected, spec) in cases {
        match RequestServiceImpl.build_request(&spec) {
            Err(JobException::InvalidSpec { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected InvalidSpec for {expected}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_prepare_environment_sets_data_dir_and_modules() {
    let spec = JobSpec {
        environment_modules: vec!["tensorflow/2.0.0".to_string()],
        environment: BTreeMap::from([("TF_CPP_MIN_LOG_LEVEL".to_string(), "3".to_string())]),
        ..dvc_spec()
    };
    let service = EnvironmentServiceImpl::builder()
        .module_service(Arc::new(available_modules()))
        .build();
    let env = service.prepare_environment(&spec).await.unwrap();
    assert_eq!(env.get("DATADIR"), Some("/scratch/project_2000859/extracted"));
    assert_eq!(env.get("TF_CPP_MIN_LOG_LEVEL"), Some("3"));
    assert_eq!(env.modules, ["tensorflow/2.0.0"]);
}

#[tokio::test]
async fn test_prepare_environment_uses_configured_variable() {
    let service = EnvironmentServiceImpl::builder()
        .module_service(Arc::new(MockModuleService::new()))
        .data_dir_var("TRAIN_DATA")
        .build();
    let env = service.prepare_environment(&dvc_spec()).await.unwrap();
    assert_eq!(env.get("TRAIN_DATA"), Some("/scratch/project_2000859/extracted"));
    assert!(env.get("DATADIR").is_none());
}

#[tokio::test]
async fn test_prepare_environment_fails_on_unavailable_module() {
    let mut modules = MockModuleService::new();
    modules
        .expect_is_available()
        .withf(|m| m.to_string() == "tensorflow/9.9")
        .returning(|_| Ok(false));
    let spec = JobSpec {
        environment_modules: vec!["tensorflow/9.9".to_string()],
        ..dvc_spec()
    };
    let service = EnvironmentServiceImpl::builder()
        .module_service(Arc::new(modules))
        .build();
    let result = service.prepare_environment(&spec).await;
    assert!(matches!(result, Err(JobException::EnvironmentError { .. })));
}

#[tokio::test]
async fn test_prepare_environment_fails_without_module_system() {
    let mut modules = MockModuleService::new();
    modules
        .expect_is_available()
        .returning(|_| Err(anyhow::anyhow!("module: command not found")));
    let spec = JobSpec {
        environment_modules: vec!["tensorflow".to_string()],
        ..dvc_spec()
    };
    let service = EnvironmentServiceImpl::builder()
        .module_service(Arc::new(modules))
        .build();
    let result = service.prepare_environment(&spec).await;
    assert!(matches!(result, Err(JobException::EnvironmentError { .. })));
}

#[tokio::test]
async fn test_prepare_environment_skips_verification_when_disabled() {
    let spec = JobSpec {
        environment_modules: vec!["tensorflow".to_string()],
        ..dvc_spec()
    };
    let service = EnvironmentServiceImpl::builder()
        .module_service(Arc::new(MockModuleService::new()))
        .verify_modules(false)
        .build();
    let env = service.prepare_environment(&spec).await.unwrap();
    assert_eq!(env.modules, ["tensorflow"]);
}

#[tokio::test]
async fn test_launch_step_forwards_args_in_order() {
    let (process, captured) = capturing_process(0);
    let service = LaunchServiceImpl::builder()
        .process_service(Arc::new(process))
        .mode(LaunchMode::Step)
        .build();
    let request = RequestServiceImpl.build_request(&dvc_spec()).unwrap();
    let mut env = EnvMap::default();
    env.set("DATADIR", "/scratch/data");
    let args = ["train.py", "--epochs", "5", "--name", "run one"].map(String::from);

    let status = service.launch(&request, &env, "python3", &args).await.unwrap();
    assert_eq!(status, ExitStatus::SUCCESS);

    let invocation = captured.lock().unwrap().take().unwrap();
    assert_eq!(invocation.program, "srun");
    let flags = request.flags();
    assert_eq!(invocation.args[..flags.len()], flags[..]);
    assert_eq!(invocation.args[flags.len()], "python3");
    assert_eq!(invocation.args[flags.len() + 1..], args[..]);
    assert_eq!(invocation.envs.get("DATADIR").map(String::as_str), Some("/scratch/data"));
}

#[tokio::test]
async fn test_launch_step_loads_modules_in_login_shell() {
    let (process, captured) = capturing_process(0);
    let service = LaunchServiceImpl::builder()
        .process_service(Arc::new(process))
        .mode(LaunchMode::Step)
        .build();
    let request = RequestServiceImpl.build_request(&dvc_spec()).unwrap();
    let env = EnvMap {
        modules: vec!["tensorflow/2.0.0".to_string()],
        ..Default::default()
    };
    service.launch(&request, &env, "python3", &train_args()).await.unwrap();

    let invocation = captured.lock().unwrap().take().unwrap();
    assert_eq!(invocation.program, "bash");
    assert_eq!(
        invocation.args[..4],
        ["-lc", "module load tensorflow/2.0.0 && exec \"$@\"", "slaunch", "srun"]
    );
    assert_eq!(invocation.args[invocation.args.len() - 3..], train_args()[..]);
}

#[tokio::test]
async fn test_launch_submit_writes_batch_script() {
    let dir = tempfile::tempdir().unwrap();
    let script_dir = dir.path().join("scripts");
    let (process, captured) = script_reading_process();
    let service = LaunchServiceImpl::builder()
        .process_service(Arc::new(process))
        .mode(LaunchMode::Submit)
        .script_dir(script_dir.clone())
        .build();
    let request = RequestServiceImpl.build_request(&dvc_spec()).unwrap();
    let mut env = EnvMap {
        modules: vec!["tensorflow/2.0.0".to_string()],
        ..Default::default()
    };
    env.set("DATADIR", "/scratch/project_2000859/extracted");
    let args = ["train.py", "--epochs", "5", "--name", "run one", "--note", "it's"].map(String::from);

    service.launch(&request, &env, "python3", &args).await.unwrap();

    let (invocation, script) = captured.lock().unwrap().take().unwrap();
    assert_eq!(invocation.program, "sbatch");
    assert_eq!(invocation.args[0], "--wait");
    assert_eq!(
        script,
        indoc::indoc! {r#"
            #!/bin/bash
            #SBATCH --job-name=dvc
            #SBATCH --account=project_2000859
            #SBATCH --partition=gpu
            #SBATCH --nodes=1
            #SBATCH --ntasks-per-node=2
            #SBATCH --cpus-per-task=10
            #SBATCH --gres=gpu:v100:2
            #SBATCH --mem=64G
            #SBATCH --time=00:15:00

            export DATADIR=/scratch/project_2000859/extracted
            module load tensorflow/2.0.0
            srun python3 train.py --epochs 5 --name 'run one' --note 'it'\''s'
        "#}
    );
    assert!(!std::path::Path::new(&invocation.args[1]).exists());
    assert_eq!(std::fs::read_dir(&script_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn test_launch_submit_script_without_environment() {
    let dir = tempfile::tempdir().unwrap();
    let (process, captured) = script_reading_process();
    let service = LaunchServiceImpl::builder()
        .process_service(Arc::new(process))
        .mode(LaunchMode::Submit)
        .script_dir(dir.path())
        .build();
    let request = SubmissionRequest::new(vec![Directive::Nodes(1), Directive::Time("10".parse().unwrap())]);

    service.launch(&request, &EnvMap::default(), "hostname", &[]).await.unwrap();

    let (_, script) = captured.lock().unwrap().take().unwrap();
    assert_eq!(
        script,
        indoc::indoc! {"
            #!/bin/bash
            #SBATCH --nodes=1
            #SBATCH --time=10

            srun hostname
        "}
    );
}

#[tokio::test]
async fn test_launch_reports_spawn_failure() {
    let mut process = MockProcessService::new();
    process
        .expect_run()
        .returning(|_| Err(anyhow::anyhow!("No such file or directory")));
    let service = LaunchServiceImpl::builder()
        .process_service(Arc::new(process))
        .mode(LaunchMode::Step)
        .build();
    let request = RequestServiceImpl.build_request(&dvc_spec()).unwrap();
    let result = service.launch(&request, &EnvMap::default(), "python3", &[]).await;
    match result {
        Err(e @ JobException::LaunchFailure { .. }) => assert_eq!(e.exit_code(), 127),
        other => panic!("expected LaunchFailure, got {other:?}"),
    }
}

fn submission_service(process: MockProcessService) -> SubmissionServiceImpl {
    SubmissionServiceImpl::builder()
        .request_service(Arc::new(RequestServiceImpl))
        .environment_service(Arc::new(
            EnvironmentServiceImpl::builder()
                .module_service(Arc::new(available_modules()))
                .build(),
        ))
        .launch_service(Arc::new(
            LaunchServiceImpl::builder()
                .process_service(Arc::new(process))
                .mode(LaunchMode::Step)
                .build(),
        ))
        .build()
}

#[tokio::test]
async fn test_submit_exit_status_is_the_commands() {
    for code in [1, 3, 137] {
        let (process, _) = capturing_process(code);
        match submission_service(process).submit(dvc_spec()).await {
            Err(e @ JobException::LaunchFailure { .. }) => assert_eq!(e.exit_code(), code),
            other => panic!("expected LaunchFailure, got {other:?}"),
        }
    }
    let (process, captured) = capturing_process(0);
    let status = submission_service(process).submit(dvc_spec()).await.unwrap();
    assert_eq!(status.code(), 0);
    let invocation = captured.lock().unwrap().take().unwrap();
    assert!(invocation.args.ends_with(&train_args()));
}

#[tokio::test]
async fn test_submit_stops_on_invalid_spec() {
    let mut process = MockProcessService::new();
    process.expect_run().never();
    let spec = JobSpec {
        node_count: 0,
        ..dvc_spec()
    };
    let result = submission_service(process).submit(spec).await;
    assert!(matches!(result, Err(JobException::InvalidSpec { .. })));
}

#[tokio::test]
async fn test_plan_does_not_execute() {
    let mut process = MockProcessService::new();
    process.expect_run().never();
    let plan = submission_service(process).plan(&dvc_spec()).await.unwrap();
    match plan {
        LaunchPlan::Step { invocation } => {
            assert_eq!(invocation.program, "srun");
            assert!(invocation.args.ends_with(&train_args()));
        }
        other => panic!("expected a job step, got {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_turns_nonzero_status_into_launch_failure() {
    let mut requests = MockRequestService::new();
    requests
        .expect_build_request()
        .times(1)
        .returning(|_| Ok(SubmissionRequest::new(vec![Directive::Nodes(1)])));
    let mut environments = MockEnvironmentService::new();
    environments
        .expect_prepare_environment()
        .times(1)
        .returning(|_| Ok(EnvMap::default()));
    let mut launches = MockLaunchService::new();
    launches
        .expect_launch()
        .withf(|_, _, command, args| command.to_string() == "python3" && args.to_vec() == train_args())
        .times(1)
        .returning(|_, _, _, _| Ok(ExitStatus::from_code(2)));
    let service = SubmissionServiceImpl::builder()
        .request_service(Arc::new(requests))
        .environment_service(Arc::new(environments))
        .launch_service(Arc::new(launches))
        .build();

    match service.submit(dvc_spec()).await {
        Err(JobException::LaunchFailure { command, code }) => {
            assert_eq!(command, "python3");
            assert_eq!(code, 2);
        }
        other => panic!("expected LaunchFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_stops_on_environment_error() {
    let mut requests = MockRequestService::new();
    requests
        .expect_build_request()
        .returning(|_| Ok(SubmissionRequest::default()));
    let mut environments = MockEnvironmentService::new();
    environments
        .expect_prepare_environment()
        .returning(|_| Err(JobException::environment("module `tensorflow` is not available")));
    let mut launches = MockLaunchService::new();
    launches.expect_launch().never();
    launches.expect_prepare().never();
    let service = SubmissionServiceImpl::builder()
        .request_service(Arc::new(requests))
        .environment_service(Arc::new(environments))
        .launch_service(Arc::new(launches))
        .build();

    let result = service.submit(dvc_spec()).await;
    assert!(matches!(result, Err(JobException::EnvironmentError { .. })));
    let result = service.plan(&dvc_spec()).await;
    assert!(matches!(result, Err(JobException::EnvironmentError { .. })));
}
