//! Scheduling policies as pluggable selection strategies.
//!
//! Every policy shares one stepping loop (see [`crate::engine`]); what varies
//! is which ready process is dispatched next and for how long. That variation
//! is captured by [`SelectionStrategy`].
//!
//! # Usage
//!
//! ```
//! use cpu_sched_sim::policy::{strategy_for, Policy, PolicyParams};
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let params = PolicyParams::new().with_quantum(2);
//! let strategy = strategy_for(Policy::RoundRobin, &params, SmallRng::seed_from_u64(7));
//! assert_eq!(strategy.map(|s| s.name()), Some("ROUND_ROBIN"));
//! ```
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.3
//! - Waldspurger & Weihl (1994), "Lottery Scheduling"

mod config;
mod context;
pub mod rules;

pub use config::{ParsePolicyError, Policy, PolicyParams};
pub use context::ReadyView;

use rand::Rng;
use std::fmt::Debug;

use crate::models::ProcessState;

/// A dispatch rule plugged into the shared stepping engine.
///
/// # Call Order
/// Per dispatch the engine calls `admit` for every process that became
/// ready (in arrival order, input order on ties), then `select`, then
/// `slice`; after running the chosen process it admits processes that
/// arrived during the slice and finally calls `release`.
pub trait SelectionStrategy: Debug {
    /// Policy name (e.g., "FCFS", "ROUND_ROBIN").
    fn name(&self) -> &'static str;

    /// Notifies the strategy that a process entered the ready set.
    fn admit(&mut self, _index: usize) {}

    /// Chooses the next process to run, or `None` if nothing is ready.
    fn select(&mut self, view: &ReadyView<'_>) -> Option<usize>;

    /// Maximum ticks to grant the selected process in this dispatch.
    ///
    /// The engine clamps the result to the process's remaining time.
    fn slice(&self, process: &ProcessState) -> i64;

    /// Notifies the strategy that a dispatch ended.
    fn release(&mut self, _index: usize, _completed: bool) {}
}

/// Builds the strategy for `policy`.
///
/// `rng` is consumed only by the lottery policy. Returns `None` when a
/// quantum-based policy has no quantum; validated input never hits that case.
pub fn strategy_for<'a, R: Rng + 'a>(
    policy: Policy,
    params: &PolicyParams,
    rng: R,
) -> Option<Box<dyn SelectionStrategy + 'a>> {
    let strategy: Box<dyn SelectionStrategy + 'a> = match policy {
        Policy::Fcfs => Box::new(rules::Fcfs),
        Policy::Sjf => Box::new(rules::Sjf),
        Policy::Srtf => Box::new(rules::Srtf),
        Policy::Priority => Box::new(rules::PreemptivePriority),
        Policy::RoundRobin => Box::new(rules::RoundRobin::new(params.quantum?)),
        Policy::Lottery => Box::new(rules::Lottery::new(params.quantum?, rng)),
    };
    Some(strategy)
}
