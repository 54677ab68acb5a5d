use std::fmt;

/// Exit status of a launched process, as a shell would report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus(i32);

impl ExitStatus {
    pub const SUCCESS: Self = Self(0);
    /// Reported when the launcher binary itself cannot be started.
    pub const NOT_FOUND: Self = Self(127);

    pub fn from_code(code: i32) -> Self {
        Self(code)
    }

    /// A process killed by signal `n` exits with `128 + n`.
    pub fn from_signal(signal: i32) -> Self {
        Self(128 + signal)
    }

    pub fn code(&self) -> i32 {
        self.0
    }

    pub fn success(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit status: {}", self.0)
    }
}
