pub mod env;
pub mod exit;
pub mod gpu;
pub mod invocation;
pub mod memory;
pub mod mode;
pub mod request;
pub mod time_limit;

#[rustfmt::skip]
pub use self::{
    env::EnvMap,
    exit::ExitStatus,
    gpu::GpuResource,
    invocation::{shell_quote, Invocation},
    memory::Memory,
    mode::{LaunchMode, LaunchPlan},
    request::{Directive, SubmissionRequest},
    time_limit::TimeLimit,
};
