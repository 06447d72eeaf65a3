//! Simulation performance metrics.
//!
//! Derives per-process timings and whole-run statistics from a finished
//! timeline. Nothing here depends on which policy produced the timeline.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Turnaround | completed_at - arrival |
//! | Waiting | turnaround - service |
//! | Response | first_run_at - arrival |
//! | CPU utilization | (total - idle) / total × 100 |
//! | Throughput | processes / total |
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.2: Scheduling Criteria

use serde::{Deserialize, Serialize};

use crate::models::{ProcessState, Timeline};

/// Timing of one completed process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    /// Process identifier.
    pub id: String,
    /// Arrival tick.
    pub arrival: i64,
    /// Total service time.
    pub service: i64,
    /// Tick of the first dispatch.
    pub first_run_at: i64,
    /// Completion tick.
    pub completed_at: i64,
    /// completed_at - arrival.
    pub turnaround_time: i64,
    /// turnaround_time - service.
    pub waiting_time: i64,
    /// first_run_at - arrival. Equals waiting time for non-preemptive runs.
    pub response_time: i64,
    /// Number of separate busy intervals the process occupies.
    pub dispatches: usize,
}

impl ProcessMetrics {
    /// Finalizes metrics for a completed process.
    ///
    /// Returns `None` if the process has not both started and completed.
    pub fn from_state(state: &ProcessState, timeline: &Timeline) -> Option<Self> {
        let first_run_at = state.first_run_at?;
        let completed_at = state.completed_at?;
        let turnaround_time = completed_at - state.arrival();

        Some(Self {
            id: state.id().to_string(),
            arrival: state.arrival(),
            service: state.service(),
            first_run_at,
            completed_at,
            turnaround_time,
            waiting_time: turnaround_time - state.service(),
            response_time: first_run_at - state.arrival(),
            dispatches: timeline.intervals_for_process(state.id()).len(),
        })
    }
}

/// Whole-run statistics.
///
/// Times are in ticks; utilization is a percentage (0..=100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// End of the last interval.
    pub total_time: i64,
    /// Sum of idle interval durations.
    pub idle_time: i64,
    /// Sum of busy interval durations.
    pub busy_time: i64,
    /// Number of processes measured.
    pub process_count: usize,
    /// Direct process-to-process switches in the timeline.
    pub context_switches: usize,
    /// Busy share of the run, in percent.
    pub cpu_utilization: f64,
    /// Completed processes per tick.
    pub throughput: f64,
    /// Mean waiting time.
    pub mean_waiting_time: f64,
    /// Mean turnaround time.
    pub mean_turnaround_time: f64,
    /// Mean response time.
    pub mean_response_time: f64,
}

impl RunSummary {
    /// Computes the summary from a timeline and its per-process metrics.
    ///
    /// A zero-length run reports every ratio and mean as 0.
    pub fn calculate(timeline: &Timeline, processes: &[ProcessMetrics]) -> Self {
        let total_time = timeline.end_time();
        let idle_time = timeline.idle_time();
        let busy_time = total_time - idle_time;
        let count = processes.len();

        let (cpu_utilization, throughput) = if total_time == 0 {
            (0.0, 0.0)
        } else {
            (
                busy_time as f64 / total_time as f64 * 100.0,
                count as f64 / total_time as f64,
            )
        };

        let mean = |f: fn(&ProcessMetrics) -> i64| -> f64 {
            if total_time == 0 || count == 0 {
                0.0
            } else {
                processes.iter().map(f).sum::<i64>() as f64 / count as f64
            }
        };

        Self {
            total_time,
            idle_time,
            busy_time,
            process_count: count,
            context_switches: timeline.context_switches(),
            cpu_utilization,
            throughput,
            mean_waiting_time: mean(|m| m.waiting_time),
            mean_turnaround_time: mean(|m| m.turnaround_time),
            mean_response_time: mean(|m| m.response_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Process;

    fn completed(id: &str, arrival: i64, service: i64, first: i64, done: i64) -> ProcessState {
        let mut s = ProcessState::new(0, &Process::new(id, arrival, service));
        s.remaining = 0;
        s.first_run_at = Some(first);
        s.completed_at = Some(done);
        s
    }

    fn fcfs_pair() -> (Timeline, Vec<ProcessMetrics>) {
        let mut t = Timeline::new();
        t.push_busy("A", 0, 5);
        t.push_busy("B", 5, 8);
        let metrics = vec![
            ProcessMetrics::from_state(&completed("A", 0, 5, 0, 5), &t).unwrap(),
            ProcessMetrics::from_state(&completed("B", 1, 3, 5, 8), &t).unwrap(),
        ];
        (t, metrics)
    }

    #[test]
    fn test_process_metrics() {
        let (_, m) = fcfs_pair();
        assert_eq!(m[1].turnaround_time, 7);
        assert_eq!(m[1].waiting_time, 4);
        assert_eq!(m[1].response_time, 4);
        assert_eq!(m[1].dispatches, 1);
    }

    #[test]
    fn test_incomplete_state_has_no_metrics() {
        let s = ProcessState::new(0, &Process::new("A", 0, 5));
        assert!(ProcessMetrics::from_state(&s, &Timeline::new()).is_none());
    }

    #[test]
    fn test_summary_basic() {
        let (t, m) = fcfs_pair();
        let s = RunSummary::calculate(&t, &m);
        assert_eq!(s.total_time, 8);
        assert_eq!(s.idle_time, 0);
        assert_eq!(s.busy_time, 8);
        assert_eq!(s.context_switches, 1);
        assert!((s.cpu_utilization - 100.0).abs() < 1e-10);
        assert!((s.throughput - 0.25).abs() < 1e-10);
        assert!((s.mean_waiting_time - 2.0).abs() < 1e-10); // (0+4)/2
        assert!((s.mean_turnaround_time - 6.0).abs() < 1e-10); // (5+7)/2
    }

    #[test]
    fn test_summary_with_idle() {
        let mut t = Timeline::new();
        t.push_idle(0, 2);
        t.push_busy("A", 2, 4);
        let m = vec![ProcessMetrics::from_state(&completed("A", 2, 2, 2, 4), &t).unwrap()];

        let s = RunSummary::calculate(&t, &m);
        assert_eq!(s.idle_time, 2);
        assert!((s.cpu_utilization - 50.0).abs() < 1e-10);
        assert!((s.mean_response_time - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_empty_run() {
        let s = RunSummary::calculate(&Timeline::new(), &[]);
        assert_eq!(s.total_time, 0);
        assert_eq!(s.process_count, 0);
        assert!((s.cpu_utilization - 0.0).abs() < 1e-10);
        assert!((s.throughput - 0.0).abs() < 1e-10);
        assert!((s.mean_waiting_time - 0.0).abs() < 1e-10);
    }
}
