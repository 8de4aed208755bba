//! Node-level actions of the job scheduler.

pub mod action;
pub mod request;
pub mod response;
pub mod stats;

pub use self::action::ScheduledJobsStatsAction;
pub use self::request::ScheduledJobsStatsRequest;
pub use self::response::ScheduledJobsStatsResponse;
pub use self::stats::{FailedNode, JobInfo, JobSweeperMetrics, ScheduledJobStats, ScheduledJobStatus};
