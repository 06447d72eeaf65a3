//! Process (CPU job) model.
//!
//! A process is a single CPU burst known in advance: it becomes eligible at
//! its arrival time and needs `service` units of CPU to finish.
//!
//! # Two Views
//! - [`Process`]: the caller's immutable input record.
//! - [`ProcessState`]: the engine's per-run working copy, created fresh
//!   from the input at the start of every simulation.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5

use serde::{Deserialize, Serialize};

/// A process to be scheduled.
///
/// # Time Representation
/// All times are integer ticks of the virtual clock, starting at t=0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Unique process identifier. Uniqueness is the caller's responsibility.
    pub id: String,
    /// Tick at which the process becomes ready.
    pub arrival: i64,
    /// Total CPU time required.
    pub service: i64,
    /// Static priority for the priority policy (lower = more important).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Lottery tickets. `None` = one ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets: Option<i64>,
}

impl Process {
    /// Creates a new process.
    pub fn new(id: impl Into<String>, arrival: i64, service: i64) -> Self {
        Self {
            id: id.into(),
            arrival,
            service,
            priority: None,
            tickets: None,
        }
    }

    /// Sets the static priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the lottery ticket count.
    pub fn with_tickets(mut self, tickets: i64) -> Self {
        self.tickets = Some(tickets);
        self
    }

    /// Ticket count used by the lottery draw (defaults to 1).
    pub fn ticket_count(&self) -> i64 {
        self.tickets.unwrap_or(1)
    }
}

/// Mutable per-run state of one process.
///
/// # Invariants
/// - `remaining` never increases and never goes below zero.
/// - `first_run_at` and `completed_at` are written at most once.
/// - `arrival <= first_run_at <= completed_at` when set.
#[derive(Debug, Clone)]
pub struct ProcessState {
    /// Position in the caller's input list (final tie-breaker).
    pub index: usize,
    /// Cloned input record.
    pub process: Process,
    /// Service time not yet consumed.
    pub remaining: i64,
    /// Tick of the first dispatch.
    pub first_run_at: Option<i64>,
    /// Tick at which `remaining` reached zero.
    pub completed_at: Option<i64>,
    /// Whether the process has entered the ready set.
    pub admitted: bool,
}

impl ProcessState {
    /// Creates a fresh working copy of an input process.
    pub fn new(index: usize, process: &Process) -> Self {
        Self {
            index,
            remaining: process.service,
            process: process.clone(),
            first_run_at: None,
            completed_at: None,
            admitted: false,
        }
    }

    /// Process identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.process.id
    }

    /// Arrival tick.
    #[inline]
    pub fn arrival(&self) -> i64 {
        self.process.arrival
    }

    /// Total service time.
    #[inline]
    pub fn service(&self) -> i64 {
        self.process.service
    }

    /// Whether the process has finished.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Whether the process is in the ready set.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.admitted && self.remaining > 0
    }

    /// Consumes `amount` ticks of service starting at `now`.
    ///
    /// Records the first dispatch and the completion tick. Returns `true`
    /// when this run finished the process. The caller guarantees
    /// `now + amount` fits in an `i64`.
    pub fn run(&mut self, now: i64, amount: i64) -> bool {
        debug_assert!(amount > 0 && amount <= self.remaining);
        if self.first_run_at.is_none() {
            self.first_run_at = Some(now);
        }
        self.remaining -= amount;
        if self.remaining == 0 {
            self.completed_at = Some(now + amount);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_builder() {
        let p = Process::new("P1", 3, 7).with_priority(2).with_tickets(5);

        assert_eq!(p.id, "P1");
        assert_eq!(p.arrival, 3);
        assert_eq!(p.service, 7);
        assert_eq!(p.priority, Some(2));
        assert_eq!(p.tickets, Some(5));
        assert_eq!(p.ticket_count(), 5);
    }

    #[test]
    fn test_default_tickets() {
        let p = Process::new("P1", 0, 1);
        assert_eq!(p.tickets, None);
        assert_eq!(p.ticket_count(), 1);
    }

    #[test]
    fn test_state_run_to_completion() {
        let p = Process::new("P1", 2, 5);
        let mut s = ProcessState::new(0, &p);
        assert_eq!(s.remaining, 5);
        assert!(!s.is_ready());

        s.admitted = true;
        assert!(s.is_ready());

        assert!(!s.run(4, 2));
        assert_eq!(s.first_run_at, Some(4));
        assert_eq!(s.remaining, 3);

        assert!(s.run(8, 3));
        assert_eq!(s.first_run_at, Some(4)); // Set once
        assert_eq!(s.completed_at, Some(11));
        assert!(s.is_complete());
        assert!(!s.is_ready());
    }

    #[test]
    fn test_state_does_not_touch_input() {
        let p = Process::new("P1", 0, 3);
        let mut s = ProcessState::new(0, &p);
        s.run(0, 3);
        assert_eq!(p.service, 3);
        assert_eq!(s.process, p);
    }

    #[test]
    fn test_process_serde() {
        let p = Process::new("A", 0, 5).with_priority(1);
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("tickets"));

        let back: Process = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);

        let minimal: Process =
            serde_json::from_str(r#"{"id":"B","arrival":2,"service":4}"#).unwrap();
        assert_eq!(minimal.priority, None);
        assert_eq!(minimal.ticket_count(), 1);
    }
}
