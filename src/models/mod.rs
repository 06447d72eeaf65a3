//! CPU scheduling domain models.
//!
//! Provides the data types shared by every policy: the process input record,
//! its per-run working state, and the execution timeline a run produces.
//!
//! # Domain Mappings
//!
//! | cpu-sched-sim | Operating System |
//! |---------------|------------------|
//! | Process | Task / thread burst |
//! | Interval | Gantt chart block |
//! | Timeline | Dispatch trace |

mod process;
mod timeline;

pub use process::{Process, ProcessState};
pub use timeline::{Interval, IntervalKind, Timeline};
