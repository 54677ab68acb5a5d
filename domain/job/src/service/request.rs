use crate::exception::JobResult;
use crate::model::{entity::JobSpec, vo::SubmissionRequest};

pub trait RequestService: Send + Sync {
    /// Validate the spec and translate it into scheduler resource requests.
    fn build_request(&self, spec: &JobSpec) -> JobResult<SubmissionRequest>;
}
