//! Shared discrete-time stepping engine.
//!
//! Every policy runs through the same loop; only the [`SelectionStrategy`]
//! differs.
//!
//! # Algorithm
//!
//! Until every process has completed:
//! 1. Admit every process with `arrival <= clock` into the ready set.
//! 2. Ask the strategy for a ready process. If none is ready, jump the
//!    clock to the next arrival and record the skipped span as idle.
//! 3. Run the chosen process for `min(slice, remaining)` ticks, appending a
//!    busy interval (merged with the previous one if the same process was
//!    already running).
//! 4. Admit processes that arrived during the slice, finalize metrics if
//!    the process completed, and hand the process back to the strategy.
//!
//! # Termination
//! Each step either consumes remaining work or moves the clock forward to
//! a pending arrival; a state where neither is possible aborts the run with
//! an [`EngineError`].

use std::fmt;

use log::debug;

use crate::metrics::ProcessMetrics;
use crate::models::{Process, ProcessState, Timeline};
use crate::policy::{ReadyView, SelectionStrategy};

/// Internal invariant violation detected mid-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    /// Clock value when the violation was detected.
    pub clock: i64,
    /// Human-readable description.
    pub message: String,
}

impl EngineError {
    fn new(clock: i64, message: impl Into<String>) -> Self {
        Self {
            clock,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t={})", self.message, self.clock)
    }
}

impl std::error::Error for EngineError {}

/// Raw output of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Gapless execution timeline.
    pub timeline: Timeline,
    /// Per-process metrics, in completion order.
    pub metrics: Vec<ProcessMetrics>,
}

/// Simulation state threaded through each step.
#[derive(Debug, Clone)]
pub struct Stepper {
    states: Vec<ProcessState>,
    /// Process indices sorted by (arrival, input order).
    arrival_order: Vec<usize>,
    /// Cursor into `arrival_order`: first process not yet admitted.
    next_arrival: usize,
    clock: i64,
    timeline: Timeline,
    metrics: Vec<ProcessMetrics>,
}

impl Stepper {
    /// Creates a stepper over fresh working copies of `processes`.
    ///
    /// The input slice is never mutated.
    pub fn new(processes: &[Process]) -> Self {
        let states = processes
            .iter()
            .enumerate()
            .map(|(i, p)| ProcessState::new(i, p))
            .collect();

        let mut arrival_order: Vec<usize> = (0..processes.len()).collect();
        arrival_order.sort_by_key(|&i| (processes[i].arrival, i));

        Self {
            states,
            arrival_order,
            next_arrival: 0,
            clock: 0,
            timeline: Timeline::new(),
            metrics: Vec::new(),
        }
    }

    /// Current virtual clock.
    pub fn clock(&self) -> i64 {
        self.clock
    }

    /// Working state of every process, in input order.
    pub fn states(&self) -> &[ProcessState] {
        &self.states
    }

    /// Timeline recorded so far.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Whether every process has completed.
    pub fn is_finished(&self) -> bool {
        self.metrics.len() == self.states.len()
    }

    /// Steps until every process has completed.
    pub fn run(mut self, strategy: &mut dyn SelectionStrategy) -> Result<RunOutput, EngineError> {
        while !self.is_finished() {
            self.step(strategy)?;
        }
        Ok(RunOutput {
            timeline: self.timeline,
            metrics: self.metrics,
        })
    }

    /// Performs one dispatch or one idle jump.
    pub fn step(&mut self, strategy: &mut dyn SelectionStrategy) -> Result<(), EngineError> {
        self.admit_arrivals(strategy);

        let view = ReadyView::new(self.clock, &self.states);
        let selected = strategy.select(&view);
        let ready_empty = view.is_empty();

        let index = match selected {
            Some(index) => index,
            None if ready_empty => return self.idle_until_next_arrival(),
            None => {
                return Err(EngineError::new(
                    self.clock,
                    format!("{} selected nothing from a non-empty ready set", strategy.name()),
                ));
            }
        };

        let state = self
            .states
            .get(index)
            .filter(|s| s.is_ready())
            .ok_or_else(|| {
                EngineError::new(
                    self.clock,
                    format!("{} selected process #{index}, which is not ready", strategy.name()),
                )
            })?;

        let slice = strategy.slice(state).min(state.remaining);
        if slice <= 0 {
            return Err(EngineError::new(
                self.clock,
                format!(
                    "{} granted a non-positive slice to '{}'",
                    strategy.name(),
                    state.id()
                ),
            ));
        }

        let start = self.clock;
        let end = start.checked_add(slice).ok_or_else(|| {
            EngineError::new(
                start,
                format!("clock overflow dispatching '{}' for {slice}", state.id()),
            )
        })?;
        debug!(
            "{}: dispatch '{}' at t={start} for {slice} (remaining {})",
            strategy.name(),
            state.id(),
            state.remaining
        );

        self.timeline
            .push_busy(&self.states[index].process.id, start, end);
        let finished = self.states[index].run(start, slice);
        self.clock = end;

        // Arrivals during the slice queue up before the released process.
        self.admit_arrivals(strategy);

        if finished {
            let metrics = ProcessMetrics::from_state(&self.states[index], &self.timeline)
                .ok_or_else(|| {
                    EngineError::new(
                        self.clock,
                        format!("process '{}' finished without timing data", self.states[index].id()),
                    )
                })?;
            debug!("'{}' completed at t={}", metrics.id, metrics.completed_at);
            self.metrics.push(metrics);
        }

        strategy.release(index, finished);
        Ok(())
    }

    fn admit_arrivals(&mut self, strategy: &mut dyn SelectionStrategy) {
        while let Some(&i) = self.arrival_order.get(self.next_arrival) {
            if self.states[i].arrival() > self.clock {
                break;
            }
            self.states[i].admitted = true;
            strategy.admit(i);
            self.next_arrival += 1;
        }
    }

    fn idle_until_next_arrival(&mut self) -> Result<(), EngineError> {
        let next = self
            .arrival_order
            .get(self.next_arrival)
            .map(|&i| self.states[i].arrival())
            .ok_or_else(|| {
                EngineError::new(
                    self.clock,
                    "no process is ready and none remain to arrive",
                )
            })?;

        debug!("idle from t={} to t={next}", self.clock);
        self.timeline.push_idle(self.clock, next);
        self.clock = next;
        Ok(())
    }
}
