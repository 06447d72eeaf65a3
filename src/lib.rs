//! Discrete-time CPU scheduling simulator.
//!
//! Simulates what an idealized single-processor scheduler would do with a
//! known-in-advance set of CPU bursts, producing an execution timeline and
//! the usual performance metrics. Rendering, input collection, and storage
//! are left to the caller.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Process`, `ProcessState`, `Interval`, `Timeline`
//! - **`validation`**: Input checks run before any policy (first failure wins)
//! - **`policy`**: `Policy` identifiers, `PolicyParams`, and the
//!   `SelectionStrategy` rules (FCFS, SJF, SRTF, round robin, priority, lottery)
//! - **`engine`**: The shared stepping loop every policy runs through
//! - **`metrics`**: Per-process timings and the run summary
//! - **`simulation`**: `simulate` entry points and the result/error records
//!
//! # Architecture
//!
//! One engine, many strategies: idle-time accounting, interval merging, and
//! metric finalization live in [`engine::Stepper`]; a policy only decides
//! which ready process runs next and for how long.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4
//! - Waldspurger & Weihl (1994), "Lottery Scheduling"

pub mod engine;
pub mod metrics;
pub mod models;
pub mod policy;
pub mod simulation;
pub mod validation;

pub use simulation::{simulate, simulate_with_rng, SimulationError, SimulationResult};
