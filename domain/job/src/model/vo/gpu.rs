use std::fmt;
use std::str::FromStr;

use crate::exception::JobException;

/// A generic GPU resource request, `gpu:[<type>:]<count>` in `--gres` syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuResource {
    /// GPU model, e.g. `v100`. `None` lets the scheduler pick any model.
    pub kind: Option<String>,
    pub count: u32,
}

impl GpuResource {
    pub fn new(kind: Option<String>, count: u32) -> Self {
        Self { kind, count }
    }
}

impl FromStr for GpuResource {
    type Err = JobException;

    /// Accepts `2`, `v100:2` and `gpu:v100:2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| JobException::invalid_spec("gpu", format!("`{s}` {reason}"));
        let s = s.trim();
        let rest = s.strip_prefix("gpu:").unwrap_or(s);
        let (kind, count) = match rest.rsplit_once(':') {
            Some((kind, count)) => (Some(kind), count),
            None => (None, rest),
        };
        if let Some(kind) = kind {
            if kind.is_empty() || kind.contains(|c: char| c.is_whitespace() || c == ':') {
                return Err(invalid("has an invalid GPU type"));
            }
        }
        let count: u32 = count
            .parse()
            .map_err(|_| invalid("does not end with a GPU count"))?;
        if count == 0 {
            return Err(invalid("requests zero GPUs"));
        }
        Ok(Self {
            kind: kind.map(ToOwned::to_owned),
            count,
        })
    }
}

impl fmt::Display for GpuResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "gpu:{kind}:{}", self.count),
            None => write!(f, "gpu:{}", self.count),
        }
    }
}
