use thiserror::Error;

pub type JobResult<T> = Result<T, JobException>;

#[derive(Error, Debug)]
pub enum JobException {
    #[error("Invalid job spec field `{field}`: {reason}.")]
    InvalidSpec { field: String, reason: String },

    #[error("Environment setup failed: {reason}.")]
    EnvironmentError { reason: String },

    #[error("Launched command `{command}` exited with status {code}.")]
    LaunchFailure { command: String, code: i32 },

    #[error("Job internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl JobException {
    pub fn invalid_spec(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn environment(reason: impl Into<String>) -> Self {
        Self::EnvironmentError {
            reason: reason.into(),
        }
    }

    /// Process exit code reported for this failure.
    ///
    /// A launch failure carries the child's own status so the overall run
    /// exits exactly like the launched command. Launcher-side failures use the
    /// `sysexits.h` codes.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidSpec { .. } => 78,
            Self::EnvironmentError { .. } => 69,
            Self::LaunchFailure { code, .. } => *code,
            Self::InternalError { .. } => 70,
        }
    }
}

impl From<anyhow::Error> for JobException {
    fn from(e: anyhow::Error) -> Self {
        JobException::InternalError { source: e }
    }
}
