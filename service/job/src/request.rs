use domain_job::{
    exception::{JobException, JobResult},
    model::{
        entity::JobSpec,
        vo::{Directive, SubmissionRequest},
    },
    service::RequestService,
};

#[derive(Default)]
pub struct RequestServiceImpl;

fn positive(field: &str, value: i64) -> JobResult<u32> {
    if value <= 0 {
        return Err(JobException::invalid_spec(field, format!("must be positive, got {value}")));
    }
    u32::try_from(value)
        .map_err(|_| JobException::invalid_spec(field, format!("{value} is out of range")))
}

fn present(field: &str, value: &str) -> JobResult<String> {
    if value.trim().is_empty() {
        return Err(JobException::invalid_spec(field, "is missing"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(JobException::invalid_spec(field, format!("`{value}` contains whitespace")));
    }
    Ok(value.to_string())
}

impl RequestService for RequestServiceImpl {
    fn build_request(&self, spec: &JobSpec) -> JobResult<SubmissionRequest> {
        let nodes = positive("nodes", spec.node_count)?;
        let tasks_per_node = positive("tasks_per_node", spec.tasks_per_node)?;
        let cpus_per_task = positive("cpus_per_task", spec.cpus_per_task)?;
        let partition = present("partition", &spec.partition)?;
        let account = present("account", &spec.account)?;
        if spec.time_limit.seconds() == Some(0) {
            return Err(JobException::invalid_spec("time", "must be longer than zero"));
        }
        if spec.command.trim().is_empty() {
            return Err(JobException::invalid_spec("command", "is missing"));
        }
        if spec.data_dir.as_os_str().is_empty() {
            return Err(JobException::invalid_spec("data_dir", "is missing"));
        }

        let mut directives = Vec::with_capacity(10);
        if let Some(name) = &spec.name {
            directives.push(Directive::JobName(present("name", name)?));
        }
        directives.extend([
            Directive::Account(account),
            Directive::Partition(partition),
            Directive::Nodes(nodes),
            Directive::TasksPerNode(tasks_per_node),
            Directive::CpusPerTask(cpus_per_task),
        ]);
        if let Some(gpu) = &spec.gpu {
            directives.push(Directive::Gres(gpu.clone()));
        }
        if let Some(memory) = &spec.memory {
            directives.push(Directive::Memory(memory.clone()));
        }
        directives.push(Directive::Time(spec.time_limit.clone()));
        if let Some(output) = &spec.output {
            directives.push(Directive::Output(present("output", output)?));
        }
        Ok(SubmissionRequest::new(directives))
    }
}
