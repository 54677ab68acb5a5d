mod environment;
mod launch;
mod module;
mod process;
mod request;
mod submission;

#[rustfmt::skip]
pub use self::{
    environment::EnvironmentService,
    launch::LaunchService,
    module::ModuleService,
    process::ProcessService,
    request::RequestService,
    submission::SubmissionService,
};
