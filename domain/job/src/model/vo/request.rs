use std::fmt;

use super::{GpuResource, Memory, TimeLimit};

/// One scheduler resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    JobName(String),
    Account(String),
    Partition(String),
    Nodes(u32),
    TasksPerNode(u32),
    CpusPerTask(u32),
    Gres(GpuResource),
    Memory(Memory),
    Time(TimeLimit),
    Output(String),
}

impl Directive {
    /// Long option name understood by both `srun` and `sbatch`.
    pub fn option(&self) -> &'static str {
        match self {
            Directive::JobName(_) => "job-name",
            Directive::Account(_) => "account",
            Directive::Partition(_) => "partition",
            Directive::Nodes(_) => "nodes",
            Directive::TasksPerNode(_) => "ntasks-per-node",
            Directive::CpusPerTask(_) => "cpus-per-task",
            Directive::Gres(_) => "gres",
            Directive::Memory(_) => "mem",
            Directive::Time(_) => "time",
            Directive::Output(_) => "output",
        }
    }

    pub fn value(&self) -> String {
        match self {
            Directive::JobName(x)
            | Directive::Account(x)
            | Directive::Partition(x)
            | Directive::Output(x) => x.clone(),
            Directive::Nodes(x) | Directive::TasksPerNode(x) | Directive::CpusPerTask(x) => {
                x.to_string()
            }
            Directive::Gres(x) => x.to_string(),
            Directive::Memory(x) => x.to_string(),
            Directive::Time(x) => x.to_string(),
        }
    }

    /// `--<option>=<value>`
    pub fn flag(&self) -> String {
        format!("--{}={}", self.option(), self.value())
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flag())
    }
}

/// Scheduler-native rendering of a job spec's resource requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub directives: Vec<Directive>,
}

impl SubmissionRequest {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self { directives }
    }

    /// Command line flags for `srun`.
    pub fn flags(&self) -> Vec<String> {
        self.directives.iter().map(Directive::flag).collect()
    }

    /// `#SBATCH` header lines for a batch script.
    pub fn sbatch_header(&self) -> String {
        self.directives
            .iter()
            .map(|d| format!("#SBATCH {}", d.flag()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn get(&self, option: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.option() == option)
    }
}
