//! Policy identifiers and parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A CPU scheduling discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Policy {
    /// First-come, first-served (non-preemptive).
    Fcfs,
    /// Shortest job first (non-preemptive).
    Sjf,
    /// Shortest remaining time first (preemptive SJF).
    Srtf,
    /// Round robin with a fixed quantum.
    RoundRobin,
    /// Static priority, preemptive. Lower value wins.
    Priority,
    /// Ticket-weighted random draw with a fixed quantum.
    Lottery,
}

impl Policy {
    /// All policies, in canonical order.
    pub fn all() -> [Policy; 6] {
        [
            Policy::Fcfs,
            Policy::Sjf,
            Policy::Srtf,
            Policy::RoundRobin,
            Policy::Priority,
            Policy::Lottery,
        ]
    }

    /// Canonical wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Sjf => "SJF",
            Policy::Srtf => "SRTF",
            Policy::RoundRobin => "ROUND_ROBIN",
            Policy::Priority => "PRIORITY",
            Policy::Lottery => "LOTTERY",
        }
    }

    /// Whether a running process can be interrupted before completion.
    pub fn is_preemptive(&self) -> bool {
        !matches!(self, Policy::Fcfs | Policy::Sjf)
    }

    /// Whether the policy needs `PolicyParams::quantum`.
    pub fn requires_quantum(&self) -> bool {
        matches!(self, Policy::RoundRobin | Policy::Lottery)
    }

    /// Whether every process needs a priority value.
    pub fn requires_priority(&self) -> bool {
        matches!(self, Policy::Priority)
    }

    /// Whether two runs on identical input always agree.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, Policy::Lottery)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolicyError(pub String);

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown scheduling policy '{}'", self.0)
    }
}

impl std::error::Error for ParsePolicyError {}

impl FromStr for Policy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "FCFS" | "FIFO" => Ok(Policy::Fcfs),
            "SJF" => Ok(Policy::Sjf),
            "SRTF" => Ok(Policy::Srtf),
            "RR" | "ROUND_ROBIN" | "ROUNDROBIN" => Ok(Policy::RoundRobin),
            "PRIORITY" => Ok(Policy::Priority),
            "LOTTERY" => Ok(Policy::Lottery),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Policy parameter bag.
///
/// Only `quantum` exists today; it is required for round robin and lottery
/// and ignored by every other policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyParams {
    /// Maximum ticks granted per dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum: Option<i64>,
}

impl PolicyParams {
    /// Creates an empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quantum.
    pub fn with_quantum(mut self, quantum: i64) -> Self {
        self.quantum = Some(quantum);
        self
    }

    /// Parameters the lottery policy historically ran with (quantum 1).
    pub fn lottery_default() -> Self {
        Self::new().with_quantum(1)
    }

    /// Quantum to report for `policy`, if it uses one.
    pub fn quantum_for(&self, policy: Policy) -> Option<i64> {
        if policy.requires_quantum() {
            self.quantum
        } else {
            None
        }
    }
}
