//! Per-agent observability (§5): a bounded ring buffer of per-request
//! stage timings, capacity 100 by default, behind a `parking_lot::Mutex`.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTiming {
    pub stage: &'static str,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowMetrics {
    pub trace_id: String,
    pub stage_timings: Vec<StageTiming>,
    pub total_time_ms: f64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub succeeded: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub sample_count: usize,
    pub error_rate: f64,
    pub avg_total_time_ms: f64,
}

/// Fixed-capacity recent-history buffer. Oldest sample is dropped once
/// `capacity` is exceeded — this is a dashboard aid, not an audit log.
pub struct MetricsRegistry {
    buffer: Mutex<VecDeque<WorkflowMetrics>>,
    capacity: usize,
}

impl MetricsRegistry {
    pub fn new(capacity: usize) -> Self {
        MetricsRegistry { buffer: Mutex::new(VecDeque::with_capacity(capacity)), capacity }
    }

    pub fn record(&self, sample: WorkflowMetrics) {
        let mut buffer = self.buffer.lock();
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(sample);
    }

    pub fn recent(&self, limit: usize) -> Vec<WorkflowMetrics> {
        let buffer = self.buffer.lock();
        buffer.iter().rev().take(limit).cloned().collect()
    }

    pub fn summary(&self) -> MetricsSummary {
        let buffer = self.buffer.lock();
        let sample_count = buffer.len();
        if sample_count == 0 {
            return MetricsSummary::default();
        }
        let error_count = buffer.iter().filter(|m| !m.succeeded).count();
        let total: f64 = buffer.iter().map(|m| m.total_time_ms).sum();
        MetricsSummary {
            sample_count,
            error_rate: error_count as f64 / sample_count as f64,
            avg_total_time_ms: total / sample_count as f64,
        }
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        MetricsRegistry::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(succeeded: bool, total_time_ms: f64) -> WorkflowMetrics {
        WorkflowMetrics { trace_id: "t".into(), total_time_ms, succeeded, ..Default::default() }
    }

    #[test]
    fn buffer_evicts_oldest_past_capacity() {
        let registry = MetricsRegistry::new(2);
        registry.record(sample(true, 1.0));
        registry.record(sample(true, 2.0));
        registry.record(sample(true, 3.0));
        let recent = registry.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].total_time_ms, 3.0);
        assert_eq!(recent[1].total_time_ms, 2.0);
    }

    #[test]
    fn summary_reports_error_rate_and_average() {
        let registry = MetricsRegistry::new(10);
        registry.record(sample(true, 10.0));
        registry.record(sample(false, 30.0));
        let summary = registry.summary();
        assert_eq!(summary.sample_count, 2);
        assert_eq!(summary.error_rate, 0.5);
        assert_eq!(summary.avg_total_time_ms, 20.0);
    }
}
