pub mod job;
pub mod loaders;
pub mod query;
pub mod report;

pub use job::{resolve_program, JobHandle, JobStatus, ResolvedProgram, SubmissionParams};
pub use loaders::{load_queries, load_query, scan_query_files};
pub use query::Query;
pub use report::{BlastJsonReport, ResultRecord};
