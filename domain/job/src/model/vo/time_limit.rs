use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::exception::JobException;

static DAYS_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<d>\d+)-(?P<h>\d+)(?::(?P<m>\d+)(?::(?P<s>\d+))?)?$").unwrap()
});
static CLOCK_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<a>\d+)(?::(?P<b>\d+)(?::(?P<c>\d+))?)?$").unwrap());

/// Wall-clock time limit in SLURM `--time` syntax.
///
/// The original text is what gets rendered, the parsed length is only used
/// for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimit {
    raw: String,
    seconds: Option<u64>,
}

impl TimeLimit {
    /// `None` for `UNLIMITED` / `INFINITE`.
    pub fn seconds(&self) -> Option<u64> {
        self.seconds
    }
}

/// `None` when the captured number does not fit.
fn num(caps: &regex::Captures, name: &str) -> Option<u64> {
    match caps.name(name) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(0),
    }
}

/// Sum of `value * unit` over all parts, `None` on overflow.
fn total(parts: &[(Option<u64>, u64)]) -> Option<u64> {
    parts.iter().try_fold(0u64, |acc, (value, unit)| {
        acc.checked_add((*value)?.checked_mul(*unit)?)
    })
}

impl FromStr for TimeLimit {
    type Err = JobException;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.eq_ignore_ascii_case("UNLIMITED") || raw.eq_ignore_ascii_case("INFINITE") {
            return Ok(Self {
                raw: raw.to_string(),
                seconds: None,
            });
        }
        let invalid = |reason: &str| JobException::invalid_spec("time", format!("`{raw}` {reason}"));
        let parsed = if let Some(caps) = DAYS_FORM.captures(raw) {
            total(&[
                (num(&caps, "d"), 86400),
                (num(&caps, "h"), 3600),
                (num(&caps, "m"), 60),
                (num(&caps, "s"), 1),
            ])
        } else if let Some(caps) = CLOCK_FORM.captures(raw) {
            // `M`, `M:S` or `H:M:S`
            let (a, b, c) = (num(&caps, "a"), num(&caps, "b"), num(&caps, "c"));
            match (caps.name("b"), caps.name("c")) {
                (None, _) => total(&[(a, 60)]),
                (Some(_), None) => total(&[(a, 60), (b, 1)]),
                (Some(_), Some(_)) => total(&[(a, 3600), (b, 60), (c, 1)]),
            }
        } else {
            return Err(invalid("is not a SLURM time limit"));
        };
        let seconds = parsed.ok_or_else(|| invalid("is too large"))?;
        Ok(Self {
            raw: raw.to_string(),
            seconds: Some(seconds),
        })
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
