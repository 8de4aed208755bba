use crate::transport::{StreamError, StreamInput, StreamOutput, Writeable, read_list, write_list};

use super::stats::{FailedNode, ScheduledJobStats};

/// Aggregated answer to a [`ScheduledJobsStatsRequest`](super::ScheduledJobsStatsRequest).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduledJobsStatsResponse {
    pub cluster_name: String,
    pub nodes: Vec<ScheduledJobStats>,
    pub failures: Vec<FailedNode>,
}

impl ScheduledJobsStatsResponse {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn node(&self, node_id: &str) -> Option<&ScheduledJobStats> {
        self.nodes.iter().find(|n| n.node_id == node_id)
    }
}

impl Writeable for ScheduledJobsStatsResponse {
    fn write_to(&self, out: &mut dyn StreamOutput) -> Result<(), StreamError> {
        out.write_string(&self.cluster_name)?;
        write_list(out, &self.nodes)?;
        write_list(out, &self.failures)
    }

    fn read_from(&mut self, input: &mut dyn StreamInput) -> Result<(), StreamError> {
        self.cluster_name = input.read_string()?;
        self.nodes = read_list(input)?;
        self.failures = read_list(input)?;
        Ok(())
    }
}
