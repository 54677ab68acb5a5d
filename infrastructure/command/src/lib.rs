//! Commands to interact with infrastructure
mod module;
mod process;

pub use module::ShellModuleService;
pub use process::TokioProcessService;
