//! NSGA-II and the ε-NSGA-II preset.
//!
//! # Key Types
//!
//! - [`Nsga2Config`]: population size, selection, parallelism, seed
//! - [`Nsga2`]: the step-wise generational loop
//! - [`EpsilonNsga2`]: [`Nsga2`] with an ε-box archive under
//!   [`AdaptiveContinuation`](crate::continuation::AdaptiveContinuation)
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//!   Algorithm: NSGA-II"
//! - Kollat & Reed (2006), "Comparing State-of-the-Art Evolutionary
//!   Multi-Objective Algorithms for Long-Term Groundwater Monitoring Design"

mod config;
mod epsilon;
mod runner;

pub use config::Nsga2Config;
pub use epsilon::{epsilon_nsga2, epsilon_nsga2_with, EpsilonNsga2, EpsilonNsga2Config};
pub use runner::Nsga2;
