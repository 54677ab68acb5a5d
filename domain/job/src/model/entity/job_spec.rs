use std::collections::BTreeMap;
use std::path::PathBuf;

use typed_builder::TypedBuilder;

use crate::model::vo::{GpuResource, Memory, TimeLimit};

/// Everything needed to run one training job on the cluster.
///
/// Counts are signed so that a non-positive request coming from
/// configuration survives until validation rejects it.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct JobSpec {
    #[builder(default, setter(strip_option, into))]
    pub name: Option<String>,
    pub node_count: i64,
    pub tasks_per_node: i64,
    pub cpus_per_task: i64,
    #[builder(setter(into))]
    pub partition: String,
    #[builder(default, setter(strip_option))]
    pub gpu: Option<GpuResource>,
    pub time_limit: TimeLimit,
    #[builder(default, setter(strip_option))]
    pub memory: Option<Memory>,
    #[builder(setter(into))]
    pub account: String,
    /// Loaded in order before the command starts.
    #[builder(default)]
    pub environment_modules: Vec<String>,
    #[builder(setter(into))]
    pub data_dir: PathBuf,
    /// Extra variables exported next to the data directory.
    #[builder(default)]
    pub environment: BTreeMap<String, String>,
    /// Standard output path pattern, e.g. `slurm-%j.out`.
    #[builder(default, setter(strip_option, into))]
    pub output: Option<String>,
    #[builder(setter(into))]
    pub command: String,
    #[builder(default)]
    pub args: Vec<String>,
}
