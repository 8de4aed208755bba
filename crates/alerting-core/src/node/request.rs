use crate::transport::{StreamError, StreamInput, StreamOutput, Writeable};

/// Asks a set of nodes for their scheduled job statistics.
///
/// An empty `node_ids` means every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledJobsStatsRequest {
    pub node_ids: Vec<String>,
    pub job_scheduling_metrics: bool,
    pub jobs_info: bool,
}

impl ScheduledJobsStatsRequest {
    pub fn new(node_ids: Vec<String>) -> Self {
        Self {
            node_ids,
            ..Self::default()
        }
    }

    pub fn all_nodes() -> Self {
        Self::default()
    }

    pub fn with_job_scheduling_metrics(mut self, enabled: bool) -> Self {
        self.job_scheduling_metrics = enabled;
        self
    }

    pub fn with_jobs_info(mut self, enabled: bool) -> Self {
        self.jobs_info = enabled;
        self
    }
}

impl Default for ScheduledJobsStatsRequest {
    fn default() -> Self {
        Self {
            node_ids: Vec::new(),
            job_scheduling_metrics: true,
            jobs_info: true,
        }
    }
}

impl Writeable for ScheduledJobsStatsRequest {
    fn write_to(&self, out: &mut dyn StreamOutput) -> Result<(), StreamError> {
        out.write_string_list(&self.node_ids)?;
        out.write_bool(self.job_scheduling_metrics)?;
        out.write_bool(self.jobs_info)
    }

    fn read_from(&mut self, input: &mut dyn StreamInput) -> Result<(), StreamError> {
        self.node_ids = input.read_string_list()?;
        self.job_scheduling_metrics = input.read_bool()?;
        self.jobs_info = input.read_bool()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{BytesStreamInput, BytesStreamOutput};

    #[test]
    fn defaults_ask_for_everything() {
        let req = ScheduledJobsStatsRequest::all_nodes();
        assert!(req.node_ids.is_empty());
        assert!(req.job_scheduling_metrics);
        assert!(req.jobs_info);
    }

    #[test]
    fn request_crosses_the_wire() {
        let req = ScheduledJobsStatsRequest::new(vec!["node-1".to_string(), "node-2".to_string()])
            .with_jobs_info(false);
        let mut out = BytesStreamOutput::new();
        req.write_to(&mut out).unwrap();

        let mut back = ScheduledJobsStatsRequest::default();
        back.read_from(&mut BytesStreamInput::new(out.freeze())).unwrap();
        assert_eq!(back, req);
        assert!(!back.jobs_info);
    }
}
