//! Adaptive time continuation.
//!
//! Wraps any [`SearchAlgorithm`](crate::algorithm::SearchAlgorithm) that
//! keeps an [`EpsilonBoxArchive`](crate::archive::EpsilonBoxArchive) and
//! periodically checks whether the archive is still growing. When progress
//! stalls (or a rebuild is overdue) the population is resized in proportion
//! to the archive and refilled from perturbed archive members plus a share
//! of fresh random solutions.
//!
//! # Key Types
//!
//! - [`ContinuationConfig`]: window sizes, injection rate, population bounds
//! - [`AdaptiveContinuation`]: the wrapper itself
//! - [`ContinuationState`]: counters and the history of [`ResizeEvent`]s
//!
//! # References
//!
//! - Goldberg (1998), "The Design of Innovation: Lessons from Genetic
//!   Algorithms, Lessons for the Real World"
//! - Srivastava (2002), "Time Continuation in Genetic Algorithms"
//! - Kollat & Reed (2006), "Comparing State-of-the-Art Evolutionary
//!   Multi-Objective Algorithms for Long-Term Groundwater Monitoring Design"

mod config;
mod runner;
mod state;

pub use config::{ContinuationConfig, FrequencyType};
pub use runner::AdaptiveContinuation;
pub use state::{ContinuationState, ResizeEvent};
