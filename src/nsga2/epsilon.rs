//! The ε-NSGA-II preset: NSGA-II with an ε-box archive under adaptive
//! continuation.

use super::config::Nsga2Config;
use super::runner::Nsga2;
use crate::archive::EpsilonBoxArchive;
use crate::continuation::{AdaptiveContinuation, ContinuationConfig};
use crate::dominance::Epsilons;
use crate::error::MoeaResult;
use crate::operators::{UniformMutation, Variation};
use crate::problem::Problem;

/// NSGA-II wrapped in adaptive continuation.
///
/// `M` is the perturbation applied to archive samples on a restart.
pub type EpsilonNsga2<P, V, M = UniformMutation> = AdaptiveContinuation<Nsga2<P, V>, M>;

/// Combined configuration for [`EpsilonNsga2`].
///
/// # Example
///
/// ```
/// use u_moea::nsga2::EpsilonNsga2Config;
///
/// let config = EpsilonNsga2Config::new(vec![0.01, 0.01])
///     .with_window_size(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.nsga2.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonNsga2Config {
    /// Box widths per objective. A single value applies to every objective.
    pub epsilons: Vec<f64>,

    pub nsga2: Nsga2Config,

    pub continuation: ContinuationConfig,
}

impl EpsilonNsga2Config {
    /// Uses the default NSGA-II and continuation parameters.
    pub fn new(epsilons: Vec<f64>) -> Self {
        Self {
            epsilons,
            nsga2: Nsga2Config::default(),
            continuation: ContinuationConfig::default(),
        }
    }

    pub fn with_nsga2(mut self, nsga2: Nsga2Config) -> Self {
        self.nsga2 = nsga2;
        self
    }

    pub fn with_continuation(mut self, continuation: ContinuationConfig) -> Self {
        self.continuation = continuation;
        self
    }

    /// Sets the initial population size.
    ///
    /// The continuation lower bound is kept at or below it.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.nsga2.population_size = n;
        self.continuation.minimum_population_size = self.continuation.minimum_population_size.min(n);
        self
    }

    pub fn with_window_size(mut self, n: usize) -> Self {
        self.continuation.window_size = n;
        self
    }

    /// Seeds both the inner algorithm and the restart draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.nsga2.seed = Some(seed);
        self.continuation.seed = Some(seed.wrapping_add(1));
        self
    }

    /// Validates all three parts.
    pub fn validate(&self) -> MoeaResult<()> {
        Epsilons::new(self.epsilons.clone())?;
        self.nsga2.validate()?;
        self.continuation.validate()
    }
}

/// Builds ε-NSGA-II with an explicit perturbation operator.
pub fn epsilon_nsga2_with<P, V, M>(
    problem: P,
    variation: V,
    perturbation: M,
    config: EpsilonNsga2Config,
) -> MoeaResult<EpsilonNsga2<P, V, M>>
where
    P: Problem,
    V: Variation<P::Decision>,
    M: Variation<P::Decision>,
{
    config.validate()?;
    let epsilons = Epsilons::new(config.epsilons)?;
    let archive = EpsilonBoxArchive::with_dimensions(
        epsilons,
        problem.number_of_objectives(),
        problem.number_of_constraints(),
    )?;
    let inner = Nsga2::new(problem, variation, config.nsga2)?.with_archive(archive);
    AdaptiveContinuation::new(inner, config.continuation, perturbation)
}

/// Builds ε-NSGA-II for real-valued decisions.
///
/// Restarts perturb archive samples with uniform mutation at rate 1.0, so
/// every injected solution is resampled within `bounds`.
///
/// # Errors
///
/// [`MoeaError::Configuration`](crate::MoeaError::Configuration) if any part
/// of `config` is invalid.
pub fn epsilon_nsga2<P, V>(
    problem: P,
    variation: V,
    bounds: Vec<(f64, f64)>,
    config: EpsilonNsga2Config,
) -> MoeaResult<EpsilonNsga2<P, V>>
where
    P: Problem<Decision = Vec<f64>>,
    V: Variation<Vec<f64>>,
{
    epsilon_nsga2_with(problem, variation, UniformMutation::new(bounds, 1.0), config)
}
