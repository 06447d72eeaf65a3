//! Execution timeline model.
//!
//! A timeline is the ordered, gapless sequence of intervals a simulated CPU
//! went through: either idle or running exactly one process.
//!
//! # Invariants
//! - Every interval has `start < end`.
//! - Interval *i* ends where interval *i+1* starts.
//! - Adjacent busy intervals never belong to the same process (they are merged).

use serde::{Deserialize, Serialize};

/// Whether the CPU was in use during an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// No process was running.
    Idle,
    /// One process was running.
    Busy,
}

/// One span of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Idle or busy.
    pub kind: IntervalKind,
    /// Start tick (inclusive).
    pub start: i64,
    /// End tick (exclusive).
    pub end: i64,
    /// Running process, present only for busy intervals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,
}

impl Interval {
    /// Creates an idle interval.
    pub fn idle(start: i64, end: i64) -> Self {
        Self {
            kind: IntervalKind::Idle,
            start,
            end,
            process_id: None,
        }
    }

    /// Creates a busy interval.
    pub fn busy(process_id: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            kind: IntervalKind::Busy,
            start,
            end,
            process_id: Some(process_id.into()),
        }
    }

    /// Length of the interval in ticks.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Whether the CPU was idle.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.kind == IntervalKind::Idle
    }

    /// Whether this interval ran the given process.
    #[inline]
    pub fn runs(&self, process_id: &str) -> bool {
        self.process_id.as_deref() == Some(process_id)
    }
}

/// Append-only sequence of execution intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    intervals: Vec<Interval>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an idle span. Zero-length spans are dropped.
    pub fn push_idle(&mut self, start: i64, end: i64) {
        if end <= start {
            return;
        }
        debug_assert_eq!(start, self.end_time());
        self.intervals.push(Interval::idle(start, end));
    }

    /// Appends a busy span, extending the previous interval when the same
    /// process was already running up to `start`.
    pub fn push_busy(&mut self, process_id: &str, start: i64, end: i64) {
        if end <= start {
            return;
        }
        debug_assert_eq!(start, self.end_time());
        if let Some(last) = self.intervals.last_mut() {
            if last.runs(process_id) && last.end == start {
                last.end = end;
                return;
            }
        }
        self.intervals.push(Interval::busy(process_id, start, end));
    }

    /// All intervals in time order.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Consumes the timeline, returning its intervals.
    pub fn into_intervals(self) -> Vec<Interval> {
        self.intervals
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether no interval has been recorded.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// End of the last interval (0 if empty).
    pub fn end_time(&self) -> i64 {
        self.intervals.last().map(|i| i.end).unwrap_or(0)
    }

    /// Sum of idle interval durations.
    pub fn idle_time(&self) -> i64 {
        self.intervals
            .iter()
            .filter(|i| i.is_idle())
            .map(Interval::duration)
            .sum()
    }

    /// Sum of busy interval durations.
    pub fn busy_time(&self) -> i64 {
        self.intervals
            .iter()
            .filter(|i| !i.is_idle())
            .map(Interval::duration)
            .sum()
    }

    /// Busy intervals of one process.
    pub fn intervals_for_process(&self, process_id: &str) -> Vec<&Interval> {
        self.intervals
            .iter()
            .filter(|i| i.runs(process_id))
            .collect()
    }

    /// Number of times the CPU switched directly from one process to another.
    ///
    /// Idle gaps do not count as a switch.
    pub fn context_switches(&self) -> usize {
        self.intervals
            .windows(2)
            .filter(|w| {
                !w[0].is_idle() && !w[1].is_idle() && w[0].process_id != w[1].process_id
            })
            .count()
    }

    /// Checks the gapless/ordered invariants.
    pub fn is_contiguous(&self) -> bool {
        self.intervals.iter().all(|i| i.start < i.end)
            && self.intervals.windows(2).all(|w| w[0].end == w[1].start)
            && self.intervals.first().map(|i| i.start == 0).unwrap_or(true)
    }
}
