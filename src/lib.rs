//! Multi-objective evolutionary search with ε-dominance archiving and
//! adaptive time continuation.
//!
//! - **Dominance**: Pareto and ε-box comparators with constraint precedence
//!   ([`dominance`]).
//! - **Ranking**: non-dominated sorting, crowding distance, and NSGA-II
//!   truncation ([`ranking`]).
//! - **Archive**: a bounded-resolution Pareto set, one solution per ε-box
//!   ([`archive`]).
//! - **Continuation**: population restarts driven by archive progress
//!   ([`continuation`]).
//! - **NSGA-II**: an inner algorithm and the ε-NSGA-II preset ([`nsga2`]).
//!
//! Every objective is minimized. Constraint values are violations: zero is
//! satisfied, any nonzero value is a violation of that magnitude.
//!
//! # Quick start
//!
//! ```
//! use rand::Rng;
//! use u_moea::nsga2::{epsilon_nsga2, EpsilonNsga2Config};
//! use u_moea::operators::{CompoundVariation, PolynomialMutation, SimulatedBinaryCrossover};
//! use u_moea::{Evaluation, Problem, SearchAlgorithm, Solution};
//!
//! struct Schaffer;
//!
//! impl Problem for Schaffer {
//!     type Decision = Vec<f64>;
//!
//!     fn number_of_objectives(&self) -> usize { 2 }
//!
//!     fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<Vec<f64>> {
//!         Solution::new(vec![rng.random_range(-10.0..10.0)])
//!     }
//!
//!     fn evaluate(&self, x: &Vec<f64>) -> Evaluation {
//!         Evaluation::new(vec![x[0] * x[0], (x[0] - 2.0) * (x[0] - 2.0)])
//!     }
//! }
//!
//! let bounds = vec![(-10.0, 10.0)];
//! let variation = CompoundVariation::new(
//!     SimulatedBinaryCrossover::new(bounds.clone()),
//!     PolynomialMutation::new(bounds.clone()),
//! );
//! let config = EpsilonNsga2Config::new(vec![0.1])
//!     .with_population_size(20)
//!     .with_seed(42);
//! let mut algorithm = epsilon_nsga2(Schaffer, variation, bounds, config).unwrap();
//! algorithm.run(2_000).unwrap();
//! assert!(!algorithm.archive().unwrap().is_empty());
//! ```

pub mod algorithm;
pub mod archive;
pub mod continuation;
pub mod dominance;
pub mod error;
pub mod nsga2;
pub mod operators;
pub mod problem;
pub mod random;
pub mod ranking;
pub mod solution;

pub use algorithm::{RunResult, SearchAlgorithm};
pub use archive::EpsilonBoxArchive;
pub use dominance::{Dominance, DominanceComparator, EpsilonBoxDominance, Epsilons, ParetoDominance};
pub use error::{MoeaError, MoeaResult};
pub use problem::Problem;
pub use solution::{Evaluation, Population, Solution};
