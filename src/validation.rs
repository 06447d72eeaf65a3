//! Input validation for simulation runs.
//!
//! Checks structural and policy-specific constraints before any policy
//! runs. Rules are checked in a fixed order and the first failure wins:
//!
//! 1. The process list is non-empty.
//! 2. Every process has a non-empty id, `arrival >= 0`, and `service > 0`,
//!    and the run horizon (last arrival plus total service) fits the clock.
//! 3. Policy fields are well-formed: `priority >= 1` on every process for the
//!    priority policy, `tickets >= 1` where given for the lottery policy (with
//!    a ticket pool that fits an `i64`), and `quantum > 0` for round robin
//!    and lottery.
//!
//! Policies assume validated input and never re-check it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Process;
use crate::policy::{Policy, PolicyParams};

/// Validation result.
pub type ValidationResult = Result<(), ValidationError>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// No processes were supplied.
    EmptyProcessList,
    /// A process id is empty or blank.
    InvalidId,
    /// A process arrives before t=0.
    InvalidArrival,
    /// A process needs no CPU time (or negative time), or the total
    /// simulated time would overflow the clock.
    InvalidService,
    /// The priority policy got a process without a priority.
    MissingPriority,
    /// A priority is below 1.
    InvalidPriority,
    /// A ticket count is below 1, or the ticket pool overflows.
    InvalidTickets,
    /// A quantum-based policy got no quantum.
    MissingQuantum,
    /// The quantum is not positive.
    InvalidQuantum,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates a simulation request.
///
/// # Returns
/// `Ok(())` if every rule passes, otherwise the first violation found.
pub fn validate_input(
    processes: &[Process],
    policy: Policy,
    params: &PolicyParams,
) -> ValidationResult {
    use ValidationErrorKind::*;

    if processes.is_empty() {
        return Err(ValidationError::new(EmptyProcessList, "Process list is empty"));
    }

    for (i, p) in processes.iter().enumerate() {
        if p.id.trim().is_empty() {
            return Err(ValidationError::new(
                InvalidId,
                format!("Process #{} has an empty id", i + 1),
            ));
        }
        if p.arrival < 0 {
            return Err(ValidationError::new(
                InvalidArrival,
                format!(
                    "Process '{}' has arrival time {}; arrival cannot be negative",
                    p.id, p.arrival
                ),
            ));
        }
        if p.service <= 0 {
            return Err(ValidationError::new(
                InvalidService,
                format!(
                    "Process '{}' has service time {}; service must be greater than zero",
                    p.id, p.service
                ),
            ));
        }
    }

    // Every clock value stays below last arrival + total service.
    let last_arrival = processes.iter().map(|p| p.arrival).max().unwrap_or(0);
    let horizon = processes
        .iter()
        .try_fold(last_arrival, |acc, p| acc.checked_add(p.service));
    if horizon.is_none() {
        return Err(ValidationError::new(
            InvalidService,
            format!(
                "Last arrival {last_arrival} plus total service time exceeds the clock range"
            ),
        ));
    }

    for p in processes {
        if policy.requires_priority() {
            match p.priority {
                None => {
                    return Err(ValidationError::new(
                        MissingPriority,
                        format!("Process '{}' has no priority", p.id),
                    ));
                }
                Some(prio) if prio < 1 => {
                    return Err(ValidationError::new(
                        InvalidPriority,
                        format!(
                            "Process '{}' has priority {prio}; priority must be at least 1",
                            p.id
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
        if policy == Policy::Lottery {
            if let Some(tickets) = p.tickets.filter(|&t| t < 1) {
                return Err(ValidationError::new(
                    InvalidTickets,
                    format!(
                        "Process '{}' has {tickets} tickets; ticket count must be at least 1",
                        p.id
                    ),
                ));
            }
        }
    }

    if policy == Policy::Lottery {
        let pool = processes
            .iter()
            .try_fold(0i64, |acc, p| acc.checked_add(p.ticket_count()));
        if pool.is_none() {
            return Err(ValidationError::new(
                InvalidTickets,
                "Total ticket count exceeds the supported range",
            ));
        }
    }

    if policy.requires_quantum() {
        match params.quantum {
            None => {
                return Err(ValidationError::new(
                    MissingQuantum,
                    format!("{policy} requires a quantum"),
                ));
            }
            Some(q) if q <= 0 => {
                return Err(ValidationError::new(
                    InvalidQuantum,
                    format!("Quantum {q} is invalid; quantum must be greater than zero"),
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}
