mod environment;
mod launch;
mod request;
mod submission;

pub use environment::EnvironmentServiceImpl;
pub use launch::LaunchServiceImpl;
pub use request::RequestServiceImpl;
pub use submission::SubmissionServiceImpl;
