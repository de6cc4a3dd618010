pub mod handlers;
pub mod models;
pub mod queue;
pub mod registry;
mod worker;

pub use handlers::{RosterHandler, StatisticsHandler};
pub use models::{
    Job, JobKind, JobPayload, JobRequest, OutputFormat, RequestError, RosterPayload,
    StatisticsPayload, is_cuid,
};
pub use queue::{JobQueue, JobRuntime};
pub use registry::{HandlerRegistry, JobHandler};
