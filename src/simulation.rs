//! Top-level simulation entry points.
//!
//! Validates the request, runs the chosen policy through the shared engine,
//! aggregates metrics, and packages everything into one [`SimulationResult`].
//! Every failure comes back as a [`SimulationError`] value; nothing panics
//! across this boundary on bad input.
//!
//! # Example
//!
//! ```
//! use cpu_sched_sim::models::Process;
//! use cpu_sched_sim::policy::{Policy, PolicyParams};
//! use cpu_sched_sim::simulation::simulate;
//!
//! let processes = vec![Process::new("A", 0, 5), Process::new("B", 1, 3)];
//! let result = simulate(&processes, Policy::Fcfs, &PolicyParams::new()).unwrap();
//! assert_eq!(result.total_time, 8);
//! assert_eq!(result.metrics_for("B").map(|m| m.waiting_time), Some(4));
//! ```

use std::fmt;

use log::{error, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, Stepper};
use crate::metrics::{ProcessMetrics, RunSummary};
use crate::models::{Interval, Process, Timeline};
use crate::policy::{strategy_for, Policy, PolicyParams};
use crate::validation::{validate_input, ValidationError, ValidationErrorKind};

/// A complete, serializable simulation request.
///
/// This is the shape an input-collection or persistence layer stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Processes in input order.
    pub processes: Vec<Process>,
    /// Scheduling discipline.
    pub policy: Policy,
    /// Policy parameters.
    #[serde(default)]
    pub params: PolicyParams,
}

impl SimulationRequest {
    /// Creates a request with empty parameters.
    pub fn new(processes: Vec<Process>, policy: Policy) -> Self {
        Self {
            processes,
            policy,
            params: PolicyParams::new(),
        }
    }

    /// Sets the quantum.
    pub fn with_quantum(mut self, quantum: i64) -> Self {
        self.params = self.params.with_quantum(quantum);
        self
    }

    /// Runs the request with an OS-seeded random source.
    pub fn simulate(&self) -> Result<SimulationResult, SimulationError> {
        simulate(&self.processes, self.policy, &self.params)
    }

    /// Runs the request with a caller-supplied random source.
    pub fn simulate_with_rng<R: Rng>(&self, rng: R) -> Result<SimulationResult, SimulationError> {
        simulate_with_rng(&self.processes, self.policy, &self.params, rng)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Policy that produced the run.
    pub policy: Policy,
    /// Quantum used, for quantum-based policies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum: Option<i64>,
    /// End of the last interval.
    pub total_time: i64,
    /// Ordered, gapless execution intervals.
    pub timeline: Timeline,
    /// Per-process metrics, in completion order.
    pub processes: Vec<ProcessMetrics>,
    /// Aggregate statistics.
    pub summary: RunSummary,
}

impl SimulationResult {
    /// Execution intervals in time order.
    pub fn intervals(&self) -> &[Interval] {
        self.timeline.intervals()
    }

    /// Metrics for one process.
    pub fn metrics_for(&self, process_id: &str) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|m| m.id == process_id)
    }
}

/// Why a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationErrorKind {
    /// The caller's input broke a validation rule.
    InvalidInput(ValidationErrorKind),
    /// The engine's bookkeeping became inconsistent mid-run.
    InternalInvariant,
}

/// A failed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationError {
    /// Machine-readable reason.
    pub kind: SimulationErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl SimulationError {
    /// Whether the caller's input was rejected.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self.kind, SimulationErrorKind::InvalidInput(_))
    }

    fn internal(policy: Policy, message: impl fmt::Display) -> Self {
        Self {
            kind: SimulationErrorKind::InternalInvariant,
            message: format!("{policy} simulation aborted: {message}"),
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SimulationError {}

impl From<ValidationError> for SimulationError {
    fn from(err: ValidationError) -> Self {
        Self {
            kind: SimulationErrorKind::InvalidInput(err.kind),
            message: err.message,
        }
    }
}

/// Simulates `processes` under `policy` with an OS-seeded random source.
///
/// Only the lottery policy consumes randomness; use [`simulate_with_rng`]
/// for reproducible lottery runs.
pub fn simulate(
    processes: &[Process],
    policy: Policy,
    params: &PolicyParams,
) -> Result<SimulationResult, SimulationError> {
    simulate_with_rng(processes, policy, params, SmallRng::from_os_rng())
}

/// Simulates `processes` under `policy`, drawing lottery tickets from `rng`.
///
/// # Errors
/// - [`SimulationErrorKind::InvalidInput`] if validation fails; no policy runs.
/// - [`SimulationErrorKind::InternalInvariant`] if the engine aborts.
pub fn simulate_with_rng<R: Rng>(
    processes: &[Process],
    policy: Policy,
    params: &PolicyParams,
    rng: R,
) -> Result<SimulationResult, SimulationError> {
    if let Err(err) = validate_input(processes, policy, params) {
        warn!("{policy} rejected input: {err}");
        return Err(err.into());
    }

    let mut strategy = strategy_for(policy, params, rng)
        .ok_or_else(|| SimulationError::internal(policy, "missing quantum after validation"))?;

    let output = Stepper::new(processes)
        .run(strategy.as_mut())
        .map_err(|err: EngineError| {
            error!("{policy} engine failure: {err}");
            SimulationError::internal(policy, err)
        })?;

    let summary = RunSummary::calculate(&output.timeline, &output.metrics);
    info!(
        "{policy}: {} processes in {} ticks, utilization {:.1}%",
        summary.process_count, summary.total_time, summary.cpu_utilization
    );

    Ok(SimulationResult {
        policy,
        quantum: params.quantum_for(policy),
        total_time: summary.total_time,
        timeline: output.timeline,
        processes: output.metrics,
        summary,
    })
}
