//! NSGA-II configuration.
//!
//! [`Nsga2Config`] holds the parameters of the generational loop.

use crate::error::{MoeaError, MoeaResult};
use crate::operators::Selection;

/// Configuration for NSGA-II.
///
/// # Defaults
///
/// ```
/// use u_moea::nsga2::Nsga2Config;
/// use u_moea::operators::Selection;
///
/// let config = Nsga2Config::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.selection, Selection::Tournament(2));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moea::nsga2::Nsga2Config;
///
/// let config = Nsga2Config::default()
///     .with_population_size(64)
///     .with_tournament_size(3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Nsga2Config {
    /// Initial population size.
    ///
    /// Adaptive continuation may change the live size later; each generation
    /// keeps the size the population had when the generation started.
    pub population_size: usize,

    /// Parent selection. Tournament size 2 is the classic binary tournament.
    pub selection: Selection,

    /// Whether to evaluate offspring in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for Nsga2Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            selection: Selection::Tournament(2),
            parallel: false,
            seed: None,
        }
    }
}

impl Nsga2Config {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Shorthand for `with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.selection = Selection::Tournament(k);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`MoeaError::Configuration`] describing the first invalid parameter.
    pub fn validate(&self) -> MoeaResult<()> {
        if self.population_size < 2 {
            return Err(MoeaError::Configuration(format!(
                "population_size must be >= 2, got {}",
                self.population_size
            )));
        }
        if let Selection::Tournament(k) = self.selection {
            if k == 0 {
                return Err(MoeaError::config("tournament size must be positive"));
            }
        }
        Ok(())
    }
}
