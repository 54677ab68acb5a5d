use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::exception::JobException;

static MEMORY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<n>\d+)(?P<unit>[KkMmGgTt])?$").unwrap());

/// Memory per node in SLURM `--mem` syntax, e.g. `64G`. Without a unit the
/// scheduler reads megabytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    raw: String,
}

impl FromStr for Memory {
    type Err = JobException;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = |reason: &str| JobException::invalid_spec("memory", format!("`{raw}` {reason}"));
        let caps = MEMORY
            .captures(raw)
            .ok_or_else(|| invalid("is not a SLURM memory size"))?;
        let n: u64 = caps["n"].parse().map_err(|_| invalid("is too large"))?;
        let mebibytes = match caps.name("unit").map(|u| u.as_str().to_ascii_uppercase()) {
            Some(u) if u == "K" => Some(n.div_ceil(1024)),
            Some(u) if u == "G" => n.checked_mul(1024),
            Some(u) if u == "T" => n.checked_mul(1024 * 1024),
            _ => Some(n),
        }
        .ok_or_else(|| invalid("is too large"))?;
        if mebibytes == 0 {
            return Err(invalid("requests no memory"));
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
