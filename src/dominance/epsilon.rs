//! ε-box discretization and ε-dominance.

use super::{componentwise_dominance, constraint_dominance, validate_pair, Dominance, DominanceComparator};
use crate::error::{MoeaError, MoeaResult};
use crate::solution::Solution;

/// Per-objective box widths.
///
/// When there are fewer widths than objectives, the last width is repeated
/// for the remaining objectives. A single value therefore applies to every
/// objective.
///
/// # Example
///
/// ```
/// use u_moea::dominance::Epsilons;
///
/// let eps = Epsilons::new(vec![0.1, 0.5]).unwrap();
/// assert_eq!(eps.get(0), 0.1);
/// assert_eq!(eps.get(1), 0.5);
/// assert_eq!(eps.get(7), 0.5); // repeated
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Epsilons {
    values: Vec<f64>,
}

impl Epsilons {
    /// Creates box widths.
    ///
    /// # Errors
    ///
    /// [`MoeaError::Configuration`] if `values` is empty or contains a
    /// non-positive or non-finite width.
    pub fn new(values: Vec<f64>) -> MoeaResult<Self> {
        if values.is_empty() {
            return Err(MoeaError::config("epsilon vector must not be empty"));
        }
        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(MoeaError::Configuration(format!(
                "epsilon[{i}] must be positive and finite, got {v}"
            )));
        }
        Ok(Self { values })
    }

    /// The same width for every objective.
    pub fn uniform(epsilon: f64) -> MoeaResult<Self> {
        Self::new(vec![epsilon])
    }

    /// Width for objective `i`.
    pub fn get(&self, i: usize) -> f64 {
        self.values[i.min(self.values.len() - 1)]
    }

    /// The widths as configured (not expanded).
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// The box containing `objectives`: `floor(objectives[i] / epsilon[i])`.
    pub fn box_key(&self, objectives: &[f64]) -> BoxKey {
        BoxKey(
            objectives
                .iter()
                .enumerate()
                .map(|(i, &v)| (v / self.get(i)).floor() as i64)
                .collect(),
        )
    }

    /// Euclidean distance from the box's lower (ideal) corner to `objectives`.
    pub fn corner_distance(&self, key: &BoxKey, objectives: &[f64]) -> f64 {
        objectives
            .iter()
            .zip(key.0.iter())
            .enumerate()
            .map(|(i, (&v, &k))| {
                let d = v - k as f64 * self.get(i);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// Integer box coordinates, one per objective.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxKey(pub Vec<i64>);

impl BoxKey {
    /// The box coordinates.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Pareto dominance between two boxes (minimization).
    pub fn dominance(&self, other: &BoxKey) -> Dominance {
        componentwise_dominance(&self.0, &other.0)
    }
}

/// Pareto dominance on ε-box indices with constraint precedence.
///
/// Solutions in the same box are [`Dominance::Neither`]; the archive
/// resolves them with a distance tie-break.
///
/// # Example
///
/// ```
/// use u_moea::dominance::{Dominance, DominanceComparator, EpsilonBoxDominance, Epsilons};
/// use u_moea::Solution;
///
/// let cmp = EpsilonBoxDominance::new(Epsilons::uniform(1.0).unwrap());
/// let a = Solution::with_objectives((), vec![0.2, 0.9]);
/// let b = Solution::with_objectives((), vec![0.8, 1.5]);
/// // Boxes (0, 0) and (0, 1).
/// assert_eq!(cmp.compare(&a, &b).unwrap(), Dominance::Left);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonBoxDominance {
    epsilons: Epsilons,
}

impl EpsilonBoxDominance {
    pub fn new(epsilons: Epsilons) -> Self {
        Self { epsilons }
    }

    pub fn epsilons(&self) -> &Epsilons {
        &self.epsilons
    }
}

impl DominanceComparator for EpsilonBoxDominance {
    fn compare<D>(&self, a: &Solution<D>, b: &Solution<D>) -> MoeaResult<Dominance> {
        validate_pair(a, b)?;
        if let Some(result) = constraint_dominance(a, b) {
            return Ok(result);
        }
        let ka = self.epsilons.box_key(a.objectives());
        let kb = self.epsilons.box_key(b.objectives());
        Ok(ka.dominance(&kb))
    }
}
