//! Adaptive continuation configuration.
//!
//! [`ContinuationConfig`] holds every parameter of the check-and-resize loop.

use crate::error::{MoeaError, MoeaResult};

/// What the check window counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyType {
    /// Objective function evaluations.
    Evaluations,

    /// Invocations of `step`.
    #[default]
    Steps,
}

/// Configuration for adaptive time continuation.
///
/// # Defaults
///
/// ```
/// use u_moea::continuation::{ContinuationConfig, FrequencyType};
///
/// let config = ContinuationConfig::default();
/// assert_eq!(config.window_size, 100);
/// assert_eq!(config.max_window_size, 100);
/// assert_eq!(config.frequency_type, FrequencyType::Steps);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moea::continuation::{ContinuationConfig, FrequencyType};
///
/// let config = ContinuationConfig::default()
///     .with_window_size(50)
///     .with_max_window_size(4)
///     .with_injection_rate(0.5)
///     .with_population_bounds(20, 2000)
///     .with_frequency_type(FrequencyType::Evaluations);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationConfig {
    /// Steps or evaluations between two checks.
    pub window_size: usize,

    /// Checks without a resize after which a resize is forced.
    pub max_window_size: usize,

    /// Fraction of a rebuilt population filled with fresh random solutions
    /// (0.0–1.0). The rest is derived from the archive.
    pub injection_rate: f64,

    /// Lower bound on the rebuilt population size.
    pub minimum_population_size: usize,

    /// Upper bound on the rebuilt population size.
    pub maximum_population_size: usize,

    /// Unit of `window_size`.
    pub frequency_type: FrequencyType,

    /// Lower clamp on `current / previous` archive size.
    pub min_growth_factor: f64,

    /// Upper clamp on `current / previous` archive size.
    pub max_growth_factor: f64,

    /// Random seed for the rebuild draws.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for ContinuationConfig {
    fn default() -> Self {
        Self {
            window_size: 100,
            max_window_size: 100,
            injection_rate: 0.25,
            minimum_population_size: 100,
            maximum_population_size: 10_000,
            frequency_type: FrequencyType::Steps,
            min_growth_factor: 0.5,
            max_growth_factor: 2.0,
            seed: None,
        }
    }
}

impl ContinuationConfig {
    /// Sets the check window.
    pub fn with_window_size(mut self, n: usize) -> Self {
        self.window_size = n;
        self
    }

    /// Sets the number of checks after which a resize is forced.
    pub fn with_max_window_size(mut self, n: usize) -> Self {
        self.max_window_size = n;
        self
    }

    /// Sets the injection rate.
    pub fn with_injection_rate(mut self, rate: f64) -> Self {
        self.injection_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets both population bounds.
    pub fn with_population_bounds(mut self, minimum: usize, maximum: usize) -> Self {
        self.minimum_population_size = minimum;
        self.maximum_population_size = maximum;
        self
    }

    /// Sets the unit of the check window.
    pub fn with_frequency_type(mut self, frequency_type: FrequencyType) -> Self {
        self.frequency_type = frequency_type;
        self
    }

    /// Sets the clamp range of the growth factor.
    pub fn with_growth_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_growth_factor = min;
        self.max_growth_factor = max;
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
        if self.window_size == 0 {
            return Err(MoeaError::config("window_size must be positive"));
        }
        if self.max_window_size == 0 {
            return Err(MoeaError::config("max_window_size must be positive"));
        }
        if self.minimum_population_size == 0 {
            return Err(MoeaError::config("minimum_population_size must be positive"));
        }
        if self.maximum_population_size < self.minimum_population_size {
            return Err(MoeaError::Configuration(format!(
                "maximum_population_size ({}) must be >= minimum_population_size ({})",
                self.maximum_population_size, self.minimum_population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.injection_rate) {
            return Err(MoeaError::Configuration(format!(
                "injection_rate must be in [0, 1], got {}",
                self.injection_rate
            )));
        }
        let growth_ok = self.min_growth_factor.is_finite()
            && self.max_growth_factor.is_finite()
            && self.min_growth_factor > 0.0
            && self.min_growth_factor <= 1.0
            && self.max_growth_factor >= 1.0;
        if !growth_ok {
            return Err(MoeaError::Configuration(format!(
                "growth bounds must satisfy 0 < min <= 1 <= max, got [{}, {}]",
                self.min_growth_factor, self.max_growth_factor
            )));
        }
        Ok(())
    }
}
