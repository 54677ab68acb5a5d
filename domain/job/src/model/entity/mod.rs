pub mod job_spec;

#[rustfmt::skip]
pub use job_spec::JobSpec;
