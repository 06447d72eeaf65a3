//! Built-in selection strategies.
//!
//! # Categories
//!
//! - **Run to completion**: FCFS, SJF
//! - **Unit-step preemptive**: SRTF, PRIORITY
//! - **Quantum-sliced**: ROUND_ROBIN, LOTTERY
//!
//! # Tie Convention
//! Deterministic rules break ties by earliest arrival, then input order.
//!
//! # References
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.3
//! - Waldspurger & Weihl (1994), "Lottery Scheduling: Flexible
//!   Proportional-Share Resource Management"

use std::collections::VecDeque;
use std::fmt;

use log::trace;
use rand::Rng;

use super::{ReadyView, SelectionStrategy};
use crate::models::ProcessState;

// ======================== Run to completion ========================

/// First-Come, First-Served.
///
/// Dispatches the earliest arrival and lets it run to completion.
#[derive(Debug, Clone, Copy)]
pub struct Fcfs;

impl SelectionStrategy for Fcfs {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn select(&mut self, view: &ReadyView<'_>) -> Option<usize> {
        view.min_by_key(|_| ())
    }

    fn slice(&self, process: &ProcessState) -> i64 {
        process.remaining
    }
}

/// Shortest Job First.
///
/// Dispatches the ready process with the smallest total service time. Once
/// started it is never interrupted, even by a shorter later arrival.
#[derive(Debug, Clone, Copy)]
pub struct Sjf;

impl SelectionStrategy for Sjf {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn select(&mut self, view: &ReadyView<'_>) -> Option<usize> {
        view.min_by_key(|p| p.service())
    }

    fn slice(&self, process: &ProcessState) -> i64 {
        process.remaining
    }
}

// ======================== Unit-step preemptive ========================

/// Shortest Remaining Time First.
///
/// Re-evaluated every tick: a newly arrived process preempts the running
/// one only if its remaining time is strictly smaller, since the running
/// process wins ties on arrival.
#[derive(Debug, Clone, Copy)]
pub struct Srtf;

impl SelectionStrategy for Srtf {
    fn name(&self) -> &'static str {
        "SRTF"
    }

    fn select(&mut self, view: &ReadyView<'_>) -> Option<usize> {
        view.min_by_key(|p| p.remaining)
    }

    fn slice(&self, _process: &ProcessState) -> i64 {
        1
    }
}

/// Preemptive static priority.
///
/// Re-evaluated every tick; lower `priority` values run first. Processes
/// without a priority rank last.
#[derive(Debug, Clone, Copy)]
pub struct PreemptivePriority;

impl SelectionStrategy for PreemptivePriority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn select(&mut self, view: &ReadyView<'_>) -> Option<usize> {
        view.min_by_key(|p| p.process.priority.unwrap_or(i64::MAX))
    }

    fn slice(&self, _process: &ProcessState) -> i64 {
        1
    }
}

// ======================== Quantum-sliced ========================

/// Round Robin.
///
/// Keeps a FIFO ready queue. Processes that arrive during a slice are
/// enqueued before the preempted process goes back to the tail.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    quantum: i64,
    queue: VecDeque<usize>,
}

impl RoundRobin {
    /// Creates a round-robin strategy with the given quantum.
    pub fn new(quantum: i64) -> Self {
        Self {
            quantum,
            queue: VecDeque::new(),
        }
    }

    /// Current queue contents, head first.
    pub fn queue(&self) -> impl Iterator<Item = usize> + '_ {
        self.queue.iter().copied()
    }
}

impl SelectionStrategy for RoundRobin {
    fn name(&self) -> &'static str {
        "ROUND_ROBIN"
    }

    fn admit(&mut self, index: usize) {
        self.queue.push_back(index);
    }

    fn select(&mut self, view: &ReadyView<'_>) -> Option<usize> {
        while let Some(index) = self.queue.pop_front() {
            if view.is_ready(index) {
                return Some(index);
            }
        }
        None
    }

    fn slice(&self, _process: &ProcessState) -> i64 {
        self.quantum
    }

    fn release(&mut self, index: usize, completed: bool) {
        if !completed {
            self.queue.push_back(index);
        }
    }
}

/// Lottery scheduling.
///
/// Every ready process holds `tickets` entries in a virtual pool; one entry
/// is drawn uniformly per dispatch, and the winner runs for one quantum.
/// The random source is injected so runs can be replayed from a seed.
pub struct Lottery<R> {
    quantum: i64,
    rng: R,
}

impl<R: Rng> Lottery<R> {
    /// Creates a lottery strategy drawing from `rng`.
    pub fn new(quantum: i64, rng: R) -> Self {
        Self { quantum, rng }
    }
}

impl<R> fmt::Debug for Lottery<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lottery")
            .field("quantum", &self.quantum)
            .finish_non_exhaustive()
    }
}

impl<R: Rng> SelectionStrategy for Lottery<R> {
    fn name(&self) -> &'static str {
        "LOTTERY"
    }

    fn select(&mut self, view: &ReadyView<'_>) -> Option<usize> {
        // An overflowing pool declines to draw; the engine reports it.
        let pool = view
            .ready()
            .try_fold(0i64, |acc, p| acc.checked_add(p.process.ticket_count()))?;
        if pool <= 0 {
            return None;
        }

        let winner = self.rng.random_range(0..pool);
        trace!("lottery drew ticket {winner} of {pool} at t={}", view.now);

        let mut upper = 0;
        for p in view.ready() {
            upper += p.process.ticket_count();
            if winner < upper {
                return Some(p.index);
            }
        }
        None
    }

    fn slice(&self, _process: &ProcessState) -> i64 {
        self.quantum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Process;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn admitted(input: &[Process]) -> Vec<ProcessState> {
        input
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut s = ProcessState::new(i, p);
                s.admitted = true;
                s
            })
            .collect()
    }

    #[test]
    fn test_fcfs_prefers_earliest_arrival() {
        let s = admitted(&[
            Process::new("late", 2, 1),
            Process::new("early", 0, 9),
            Process::new("early_too", 0, 1),
        ]);
        let view = ReadyView::new(2, &s);
        assert_eq!(Fcfs.select(&view), Some(1));
        assert_eq!(Fcfs.slice(&s[1]), 9);
    }

    #[test]
    fn test_sjf_ordering() {
        let s = admitted(&[
            Process::new("long", 0, 8),
            Process::new("short", 1, 2),
            Process::new("short_later", 2, 2),
        ]);
        let view = ReadyView::new(2, &s);
        // Equal service → earlier arrival
        assert_eq!(Sjf.select(&view), Some(1));
    }

    #[test]
    fn test_srtf_uses_remaining() {
        let mut s = admitted(&[Process::new("A", 0, 8), Process::new("B", 1, 4)]);
        s[0].remaining = 3;
        let view = ReadyView::new(5, &s);
        assert_eq!(Srtf.select(&view), Some(0));
        assert_eq!(Srtf.slice(&s[0]), 1);
    }

    #[test]
    fn test_priority_lower_value_wins() {
        let s = admitted(&[
            Process::new("low", 0, 3).with_priority(5),
            Process::new("high", 1, 3).with_priority(1),
            Process::new("unset", 0, 3),
        ]);
        let view = ReadyView::new(1, &s);
        assert_eq!(PreemptivePriority.select(&view), Some(1));
    }

    #[test]
    fn test_round_robin_requeue() {
        let s = admitted(&[Process::new("A", 0, 5), Process::new("B", 0, 3)]);
        let view = ReadyView::new(0, &s);
        let mut rr = RoundRobin::new(2);
        rr.admit(0);
        rr.admit(1);

        assert_eq!(rr.select(&view), Some(0));
        rr.release(0, false);
        assert_eq!(rr.queue().collect::<Vec<_>>(), vec![1, 0]);

        assert_eq!(rr.select(&view), Some(1));
        rr.release(1, true);
        assert_eq!(rr.queue().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_round_robin_skips_finished() {
        let mut s = admitted(&[Process::new("A", 0, 1), Process::new("B", 0, 1)]);
        s[0].remaining = 0;
        let view = ReadyView::new(1, &s);
        let mut rr = RoundRobin::new(4);
        rr.admit(0);
        rr.admit(1);
        assert_eq!(rr.select(&view), Some(1));
        assert_eq!(rr.select(&view), None);
    }

    #[test]
    fn test_lottery_single_candidate() {
        let s = admitted(&[Process::new("only", 0, 4).with_tickets(3)]);
        let view = ReadyView::new(0, &s);
        let mut lottery = Lottery::new(1, SmallRng::seed_from_u64(42));
        for _ in 0..10 {
            assert_eq!(lottery.select(&view), Some(0));
        }
    }

    #[test]
    fn test_lottery_weighting() {
        let s = admitted(&[
            Process::new("rich", 0, 100).with_tickets(9),
            Process::new("poor", 0, 100).with_tickets(1),
        ]);
        let view = ReadyView::new(0, &s);
        let mut lottery = Lottery::new(1, SmallRng::seed_from_u64(7));

        let rich_wins = (0..1000)
            .filter(|_| lottery.select(&view) == Some(0))
            .count();
        // Expected ~900
        assert!(rich_wins > 800 && rich_wins < 980, "rich won {rich_wins}");
    }

    #[test]
    fn test_lottery_reproducible_from_seed() {
        let s = admitted(&[
            Process::new("A", 0, 10),
            Process::new("B", 0, 10).with_tickets(2),
            Process::new("C", 0, 10).with_tickets(3),
        ]);
        let view = ReadyView::new(0, &s);
        let draw = |seed| {
            let mut lottery = Lottery::new(1, SmallRng::seed_from_u64(seed));
            (0..20).map(|_| lottery.select(&view)).collect::<Vec<_>>()
        };
        assert_eq!(draw(99), draw(99));
    }

    #[test]
    fn test_lottery_overflowing_pool_declines() {
        let s = admitted(&[
            Process::new("A", 0, 1).with_tickets(i64::MAX),
            Process::new("B", 0, 1).with_tickets(i64::MAX),
        ]);
        let view = ReadyView::new(0, &s);
        let mut lottery = Lottery::new(1, SmallRng::seed_from_u64(3));
        assert_eq!(lottery.select(&view), None);
    }

    #[test]
    fn test_lottery_empty_pool() {
        let s: Vec<ProcessState> = Vec::new();
        let view = ReadyView::new(0, &s);
        let mut lottery = Lottery::new(2, SmallRng::seed_from_u64(1));
        assert_eq!(lottery.select(&view), None);
    }
}
