use std::collections::BTreeMap;

/// Environment handed to the launched command: variables to export and
/// environment modules to load before it starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMap {
    pub vars: BTreeMap<String, String>,
    pub modules: Vec<String>,
}

impl EnvMap {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn has_modules(&self) -> bool {
        !self.modules.is_empty()
    }
}

/// Whether `name` can be used as a shell variable name.
pub fn is_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
