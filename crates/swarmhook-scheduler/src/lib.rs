//! Interval job scheduling for swarmhook.
//!
//! Keeps every pending firing in one time-ordered queue and runs them from a
//! single background task. Suited to a handful of coarse jobs (periods of
//! seconds to minutes), not thousands.

pub mod queue;
pub mod scheduler;
mod worker;

pub use queue::{Firing, FiringQueue};
pub use scheduler::IntervalScheduler;
