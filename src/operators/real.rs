//! Real-valued variation operators.
//!
//! All operators act on `Vec<f64>` decisions and keep every variable within
//! its `(lower, upper)` bound.

use super::{offspring, Variation};
use crate::solution::Solution;
use rand::Rng;

/// Simulated Binary Crossover (SBX).
///
/// Produces two children whose spread around the parents follows a
/// polynomial distribution controlled by `distribution_index` (larger =
/// children closer to parents).
///
/// # Algorithm (Deb & Agrawal, 1995)
///
/// With probability `probability`, for each variable (itself with
/// probability 0.5) and distinct parent values `y1 < y2`:
///
/// 1. `beta = 1 + 2 * (y1 - lower) / (y2 - y1)`, `alpha = 2 - beta^-(η+1)`
/// 2. draw `u`; `betaq = (u*alpha)^(1/(η+1))` if `u <= 1/alpha`, else
///    `(1 / (2 - u*alpha))^(1/(η+1))`
/// 3. `c1 = 0.5 * (y1 + y2 - betaq * (y2 - y1))`, symmetric for `c2` with
///    the upper bound
#[derive(Debug, Clone)]
pub struct SimulatedBinaryCrossover {
    bounds: Vec<(f64, f64)>,
    probability: f64,
    distribution_index: f64,
}

impl SimulatedBinaryCrossover {
    /// SBX with probability 1.0 and distribution index 15.
    ///
    /// # Panics
    /// Panics if any lower bound is above its upper bound or not finite.
    pub fn new(bounds: Vec<(f64, f64)>) -> Self {
        check_bounds(&bounds);
        Self {
            bounds,
            probability: 1.0,
            distribution_index: 15.0,
        }
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn with_distribution_index(mut self, eta: f64) -> Self {
        self.distribution_index = eta.max(0.0);
        self
    }
}

impl Variation<Vec<f64>> for SimulatedBinaryCrossover {
    fn arity(&self) -> usize {
        2
    }

    fn evolve<R: Rng>(&self, parents: &[&Solution<Vec<f64>>], rng: &mut R) -> Vec<Solution<Vec<f64>>> {
        let mut c1 = offspring(parents[0]);
        let mut c2 = offspring(parents[1]);

        if rng.random_range(0.0..1.0) < self.probability {
            let eta = self.distribution_index;
            let x1 = c1.variables_mut();
            let x2 = c2.variables_mut();
            for ((a, b), &(lower, upper)) in x1.iter_mut().zip(x2.iter_mut()).zip(self.bounds.iter()) {
                if rng.random_bool(0.5) && (*a - *b).abs() > 1e-14 {
                    let (y1, y2) = sbx_pair(*a, *b, lower, upper, eta, rng);
                    if rng.random_bool(0.5) {
                        *a = y2;
                        *b = y1;
                    } else {
                        *a = y1;
                        *b = y2;
                    }
                }
            }
        }

        vec![c1, c2]
    }
}

fn sbx_pair<R: Rng>(a: f64, b: f64, lower: f64, upper: f64, eta: f64, rng: &mut R) -> (f64, f64) {
    let (y1, y2) = if a < b { (a, b) } else { (b, a) };
    let dy = y2 - y1;
    let u: f64 = rng.random_range(0.0..1.0);
    let exponent = 1.0 / (eta + 1.0);

    let spread = |beta: f64| {
        let alpha = 2.0 - beta.powf(-(eta + 1.0));
        if u <= 1.0 / alpha {
            (u * alpha).powf(exponent)
        } else {
            (1.0 / (2.0 - u * alpha)).powf(exponent)
        }
    };

    let betaq = spread(1.0 + 2.0 * (y1 - lower) / dy);
    let c1 = 0.5 * ((y1 + y2) - betaq * dy);
    let betaq = spread(1.0 + 2.0 * (upper - y2) / dy);
    let c2 = 0.5 * ((y1 + y2) + betaq * dy);

    (c1.clamp(lower, upper), c2.clamp(lower, upper))
}

/// Polynomial Mutation (PM).
///
/// Perturbs each variable with probability `probability` by a bounded
/// polynomial step. The default probability is `1 / n` for `n` variables.
#[derive(Debug, Clone)]
pub struct PolynomialMutation {
    bounds: Vec<(f64, f64)>,
    probability: f64,
    distribution_index: f64,
}

impl PolynomialMutation {
    /// PM with probability `1 / n` and distribution index 20.
    ///
    /// # Panics
    /// Panics if any lower bound is above its upper bound or not finite.
    pub fn new(bounds: Vec<(f64, f64)>) -> Self {
        check_bounds(&bounds);
        let probability = 1.0 / bounds.len().max(1) as f64;
        Self {
            bounds,
            probability,
            distribution_index: 20.0,
        }
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn with_distribution_index(mut self, eta: f64) -> Self {
        self.distribution_index = eta.max(0.0);
        self
    }
}

impl Variation<Vec<f64>> for PolynomialMutation {
    fn arity(&self) -> usize {
        1
    }

    fn evolve<R: Rng>(&self, parents: &[&Solution<Vec<f64>>], rng: &mut R) -> Vec<Solution<Vec<f64>>> {
        let mut child = offspring(parents[0]);
        let eta = self.distribution_index;
        let exponent = 1.0 / (eta + 1.0);

        for (x, &(lower, upper)) in child.variables_mut().iter_mut().zip(self.bounds.iter()) {
            let dx = upper - lower;
            if dx <= 0.0 || rng.random_range(0.0..1.0) >= self.probability {
                continue;
            }

            let u: f64 = rng.random_range(0.0..1.0);
            let delta = if u < 0.5 {
                let bl = (*x - lower) / dx;
                let b = 2.0 * u + (1.0 - 2.0 * u) * (1.0 - bl).powf(eta + 1.0);
                b.powf(exponent) - 1.0
            } else {
                let bu = (upper - *x) / dx;
                let b = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * (1.0 - bu).powf(eta + 1.0);
                1.0 - b.powf(exponent)
            };
            *x = (*x + delta * dx).clamp(lower, upper);
        }

        vec![child]
    }
}

/// Uniform Mutation (UM).
///
/// Replaces each variable, with probability `probability`, by a uniform
/// draw from its bounds. With probability 1.0 this is a full restart of the
/// decision, which is how ε-NSGA-II perturbs archive samples by default.
#[derive(Debug, Clone)]
pub struct UniformMutation {
    bounds: Vec<(f64, f64)>,
    probability: f64,
}

impl UniformMutation {
    /// # Panics
    /// Panics if any lower bound is above its upper bound or not finite.
    pub fn new(bounds: Vec<(f64, f64)>, probability: f64) -> Self {
        check_bounds(&bounds);
        Self {
            bounds,
            probability: probability.clamp(0.0, 1.0),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Variation<Vec<f64>> for UniformMutation {
    fn arity(&self) -> usize {
        1
    }

    fn evolve<R: Rng>(&self, parents: &[&Solution<Vec<f64>>], rng: &mut R) -> Vec<Solution<Vec<f64>>> {
        let mut child = offspring(parents[0]);
        for (x, &(lower, upper)) in child.variables_mut().iter_mut().zip(self.bounds.iter()) {
            if rng.random_range(0.0..1.0) < self.probability {
                *x = rng.random_range(lower..=upper);
            }
        }
        vec![child]
    }
}

/// Rejects inverted or non-finite variable bounds.
fn check_bounds(bounds: &[(f64, f64)]) {
    for (i, &(lower, upper)) in bounds.iter().enumerate() {
        assert!(
            lower.is_finite() && upper.is_finite(),
            "bounds of variable {i} must be finite"
        );
        assert!(lower <= upper, "lower bound above upper for variable {i}");
    }
}
