use async_trait::async_trait;

/// Environment module system of the host (Lmod or Environment Modules).
#[async_trait]
pub trait ModuleService: Send + Sync {
    /// Err when the module system itself cannot be queried.
    async fn is_available(&self, module: &str) -> anyhow::Result<bool>;
}
