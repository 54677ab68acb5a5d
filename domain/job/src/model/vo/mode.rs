use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Invocation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// `Step` inside an allocation, `Submit` outside of one.
    #[default]
    Auto,
    /// Run the command as a job step with `srun`.
    Step,
    /// Write a batch script and submit it with `sbatch --wait`.
    Submit,
}

impl LaunchMode {
    pub fn resolve(self, in_allocation: bool) -> Self {
        match self {
            LaunchMode::Auto if in_allocation => LaunchMode::Step,
            LaunchMode::Auto => LaunchMode::Submit,
            mode => mode,
        }
    }
}

/// What the launcher is about to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    Step {
        invocation: Invocation,
    },
    Submit {
        script_path: PathBuf,
        script: String,
        invocation: Invocation,
    },
}

impl LaunchPlan {
    pub fn invocation(&self) -> &Invocation {
        match self {
            LaunchPlan::Step { invocation } | LaunchPlan::Submit { invocation, .. } => invocation,
        }
    }
}

impl fmt::Display for LaunchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchPlan::Step { invocation } => writeln!(f, "{invocation}"),
            LaunchPlan::Submit {
                script_path,
                script,
                invocation,
            } => {
                writeln!(f, "# {}", script_path.display())?;
                writeln!(f, "{}", script.trim_end())?;
                writeln!(f, "# submitted with:")?;
                writeln!(f, "{invocation}")
            }
        }
    }
}
