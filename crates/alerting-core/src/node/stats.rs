//! Per-node scheduled job statistics.
//!
//! Only the shape and the wire form live here; the values are filled in by
//! the job scheduler on each node.

use chrono::{DateTime, Utc};

use crate::transport::{StreamError, StreamInput, StreamOutput, Writeable, read_list, write_list};

/// Whether the job scheduler is running on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduledJobStatus {
    #[default]
    Enabled,
    Disabled,
}

impl ScheduledJobStatus {
    fn ordinal(self) -> u32 {
        match self {
            ScheduledJobStatus::Enabled => 0,
            ScheduledJobStatus::Disabled => 1,
        }
    }

    fn from_ordinal(ordinal: u32) -> Result<Self, StreamError> {
        match ordinal {
            0 => Ok(ScheduledJobStatus::Enabled),
            1 => Ok(ScheduledJobStatus::Disabled),
            _ => Err(StreamError::InvalidOrdinal {
                kind: "ScheduledJobStatus",
                ordinal,
            }),
        }
    }
}

/// Health of the periodic sweep that (re)schedules jobs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobSweeperMetrics {
    pub last_full_sweep_time: DateTime<Utc>,
    pub full_sweep_on_time: bool,
}

impl Writeable for JobSweeperMetrics {
    fn write_to(&self, out: &mut dyn StreamOutput) -> Result<(), StreamError> {
        out.write_i64(self.last_full_sweep_time.timestamp_millis())?;
        out.write_bool(self.full_sweep_on_time)
    }

    fn read_from(&mut self, input: &mut dyn StreamInput) -> Result<(), StreamError> {
        let millis = input.read_i64()?;
        self.last_full_sweep_time =
            DateTime::from_timestamp_millis(millis).ok_or(StreamError::InvalidTimestamp(millis))?;
        self.full_sweep_on_time = input.read_bool()?;
        Ok(())
    }
}

/// One job known to a node's scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobInfo {
    pub index: String,
    pub job_id: String,
    pub descheduled: bool,
}

impl Writeable for JobInfo {
    fn write_to(&self, out: &mut dyn StreamOutput) -> Result<(), StreamError> {
        out.write_string(&self.index)?;
        out.write_string(&self.job_id)?;
        out.write_bool(self.descheduled)
    }

    fn read_from(&mut self, input: &mut dyn StreamInput) -> Result<(), StreamError> {
        self.index = input.read_string()?;
        self.job_id = input.read_string()?;
        self.descheduled = input.read_bool()?;
        Ok(())
    }
}

/// Statistics reported by a single node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduledJobStats {
    pub node_id: String,
    pub status: ScheduledJobStatus,
    /// Present when the request asked for scheduling metrics.
    pub sweeper_metrics: Option<JobSweeperMetrics>,
    /// Present when the request asked for job infos.
    pub job_infos: Option<Vec<JobInfo>>,
}

impl Writeable for ScheduledJobStats {
    fn write_to(&self, out: &mut dyn StreamOutput) -> Result<(), StreamError> {
        out.write_string(&self.node_id)?;
        out.write_vint(self.status.ordinal())?;

        out.write_bool(self.sweeper_metrics.is_some())?;
        if let Some(metrics) = &self.sweeper_metrics {
            metrics.write_to(out)?;
        }

        out.write_bool(self.job_infos.is_some())?;
        if let Some(infos) = &self.job_infos {
            write_list(out, infos)?;
        }
        Ok(())
    }

    fn read_from(&mut self, input: &mut dyn StreamInput) -> Result<(), StreamError> {
        self.node_id = input.read_string()?;
        self.status = ScheduledJobStatus::from_ordinal(input.read_vint()?)?;

        self.sweeper_metrics = if input.read_bool()? {
            let mut metrics = JobSweeperMetrics::default();
            metrics.read_from(input)?;
            Some(metrics)
        } else {
            None
        };

        self.job_infos = if input.read_bool()? {
            Some(read_list(input)?)
        } else {
            None
        };
        Ok(())
    }
}

/// A node that failed to answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FailedNode {
    pub node_id: String,
    pub reason: String,
}

impl Writeable for FailedNode {
    fn write_to(&self, out: &mut dyn StreamOutput) -> Result<(), StreamError> {
        out.write_string(&self.node_id)?;
        out.write_string(&self.reason)
    }

    fn read_from(&mut self, input: &mut dyn StreamInput) -> Result<(), StreamError> {
        self.node_id = input.read_string()?;
        self.reason = input.read_string()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{BytesStreamInput, BytesStreamOutput};

    #[test]
    fn status_is_written_as_ordinal() {
        let stats = ScheduledJobStats {
            node_id: "n".to_string(),
            status: ScheduledJobStatus::Disabled,
            sweeper_metrics: None,
            job_infos: None,
        };
        let mut out = BytesStreamOutput::new();
        stats.write_to(&mut out).unwrap();
        // len(1) 'n' ordinal(1) no-metrics no-infos
        assert_eq!(&out.freeze()[..], &[0x01, b'n', 0x01, 0x00, 0x00]);
    }

    #[test]
    fn unknown_status_ordinal_is_rejected() {
        let mut input = BytesStreamInput::new(vec![0x01, b'n', 0x07]);
        let mut stats = ScheduledJobStats::default();
        assert!(matches!(
            stats.read_from(&mut input),
            Err(StreamError::InvalidOrdinal { ordinal: 7, .. })
        ));
    }

    #[test]
    fn sweep_time_keeps_millisecond_precision() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let metrics = JobSweeperMetrics {
            last_full_sweep_time: at,
            full_sweep_on_time: true,
        };
        let mut out = BytesStreamOutput::new();
        metrics.write_to(&mut out).unwrap();

        let mut back = JobSweeperMetrics::default();
        back.read_from(&mut BytesStreamInput::new(out.freeze())).unwrap();
        assert_eq!(back, metrics);
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        let mut out = BytesStreamOutput::new();
        out.write_i64(i64::MAX).unwrap();
        out.write_bool(false).unwrap();

        let mut metrics = JobSweeperMetrics::default();
        assert!(matches!(
            metrics.read_from(&mut BytesStreamInput::new(out.freeze())),
            Err(StreamError::InvalidTimestamp(i64::MAX))
        ));
    }
}
