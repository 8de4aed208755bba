//! ScheduledJobsStatsAction - スケジュール済みジョブ統計のアクション定義
//!
//! プロセス内で唯一のハンドルは `ScheduledJobsStatsAction::INSTANCE` です。
//! グローバルな可変状態ではなく、起動時に `ActionRegistry` へ明示的に渡します。

use crate::transport::{ActionType, Reader, Writeable};

use super::response::ScheduledJobsStatsResponse;

/// Descriptor for the cluster-wide scheduled job stats action.
///
/// The private field keeps [`INSTANCE`](Self::INSTANCE) the only value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledJobsStatsAction {
    _private: (),
}

impl ScheduledJobsStatsAction {
    pub const INSTANCE: Self = Self { _private: () };

    pub const NAME: &'static str = "cluster:admin/opendistro/_scheduled_jobs/stats";
}

impl ActionType for ScheduledJobsStatsAction {
    const NAME: &'static str = ScheduledJobsStatsAction::NAME;

    type Response = ScheduledJobsStatsResponse;

    fn response_reader(&self) -> Reader<ScheduledJobsStatsResponse> {
        |input| {
            let mut response = ScheduledJobsStatsResponse::default();
            response.read_from(input)?;
            Ok(response)
        }
    }
}
