//! Solutions and populations.
//!
//! A [`Solution`] pairs an opaque decision value with its objective vector,
//! its constraint violations, and a small typed record of attributes that
//! ranking and selection write while an algorithm runs.

use crate::error::{ensure_finite, ensure_len, MoeaResult};

/// Objective and constraint values produced by evaluating a decision.
///
/// All objectives are **minimized**. A constraint value of `0.0` means the
/// constraint is satisfied; any other value is a violation magnitude (its
/// absolute value is used).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    /// Objective values, lower is better.
    pub objectives: Vec<f64>,

    /// Constraint violation magnitudes, `0.0` when satisfied.
    pub constraints: Vec<f64>,
}

impl Evaluation {
    /// An evaluation for an unconstrained problem.
    pub fn new(objectives: Vec<f64>) -> Self {
        Self {
            objectives,
            constraints: Vec::new(),
        }
    }

    /// An evaluation with constraint violations.
    pub fn with_constraints(objectives: Vec<f64>, constraints: Vec<f64>) -> Self {
        Self {
            objectives,
            constraints,
        }
    }
}

/// Attributes written by ranking and diversity components.
///
/// `None` means the value has not been computed for the current population.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attributes {
    /// Non-dominated front index (0 = Pareto front).
    pub rank: Option<usize>,

    /// Crowding distance within the solution's front.
    pub crowding_distance: Option<f64>,
}

/// A candidate solution.
///
/// The decision type `D` is opaque to the ranking, archive, and continuation
/// components; only [`Problem`](crate::problem::Problem) and
/// [`Variation`](crate::operators::Variation) implementations look inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<D> {
    variables: D,
    objectives: Vec<f64>,
    constraints: Vec<f64>,
    attributes: Attributes,
}

impl<D> Solution<D> {
    /// Creates an unevaluated solution.
    pub fn new(variables: D) -> Self {
        Self {
            variables,
            objectives: Vec::new(),
            constraints: Vec::new(),
            attributes: Attributes::default(),
        }
    }

    /// Creates an already-evaluated solution.
    pub fn evaluated(variables: D, evaluation: Evaluation) -> Self {
        Self {
            variables,
            objectives: evaluation.objectives,
            constraints: evaluation.constraints,
            attributes: Attributes::default(),
        }
    }

    /// Creates an evaluated, unconstrained solution from raw objectives.
    pub fn with_objectives(variables: D, objectives: Vec<f64>) -> Self {
        Self::evaluated(variables, Evaluation::new(objectives))
    }

    pub fn variables(&self) -> &D {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut D {
        &mut self.variables
    }

    pub fn into_variables(self) -> D {
        self.variables
    }

    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    pub fn constraints(&self) -> &[f64] {
        &self.constraints
    }

    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }

    /// Whether objective values have been assigned.
    pub fn is_evaluated(&self) -> bool {
        !self.objectives.is_empty()
    }

    /// Stores an evaluation, clearing attributes derived from the old values.
    pub fn set_evaluation(&mut self, evaluation: Evaluation) {
        self.objectives = evaluation.objectives;
        self.constraints = evaluation.constraints;
        self.attributes = Attributes::default();
    }

    /// Drops objectives, constraints, and attributes.
    ///
    /// Used on offspring copied from an evaluated parent.
    pub fn clear_evaluation(&mut self) {
        self.objectives.clear();
        self.constraints.clear();
        self.attributes = Attributes::default();
    }

    /// Sum of absolute constraint violations.
    pub fn aggregate_violation(&self) -> f64 {
        aggregate_violation(&self.constraints)
    }

    pub fn is_feasible(&self) -> bool {
        self.constraints.iter().all(|&c| c == 0.0)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn rank(&self) -> Option<usize> {
        self.attributes.rank
    }

    pub fn set_rank(&mut self, rank: usize) {
        self.attributes.rank = Some(rank);
    }

    pub fn crowding_distance(&self) -> Option<f64> {
        self.attributes.crowding_distance
    }

    pub fn set_crowding_distance(&mut self, distance: f64) {
        self.attributes.crowding_distance = Some(distance);
    }

    /// Checks objective and constraint lengths and finiteness.
    pub fn validate(&self, objectives: usize, constraints: usize) -> MoeaResult<()> {
        ensure_len("objectives", objectives, self.objectives.len())?;
        ensure_len("constraints", constraints, self.constraints.len())?;
        ensure_finite("objective", &self.objectives)?;
        ensure_finite("constraint", &self.constraints)
    }
}

/// Sum of absolute constraint violations.
pub fn aggregate_violation(constraints: &[f64]) -> f64 {
    constraints.iter().map(|c| c.abs()).sum()
}

/// An owned collection of solutions.
///
/// Order carries no meaning except as the tie order for ranking: solutions
/// in the same front are reported in population order.
#[derive(Debug, Clone, PartialEq)]
pub struct Population<D> {
    solutions: Vec<Solution<D>>,
}

impl<D> Default for Population<D> {
    fn default() -> Self {
        Self {
            solutions: Vec::new(),
        }
    }
}

impl<D> Population<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            solutions: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn push(&mut self, solution: Solution<D>) {
        self.solutions.push(solution);
    }

    pub fn clear(&mut self) {
        self.solutions.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Solution<D>> {
        self.solutions.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Solution<D>> {
        self.solutions.iter_mut()
    }

    pub fn as_slice(&self) -> &[Solution<D>] {
        &self.solutions
    }

    pub fn as_mut_slice(&mut self) -> &mut [Solution<D>] {
        &mut self.solutions
    }

    pub fn into_vec(self) -> Vec<Solution<D>> {
        self.solutions
    }

    /// Objective vectors in population order.
    pub fn objectives(&self) -> Vec<Vec<f64>> {
        self.solutions.iter().map(|s| s.objectives.clone()).collect()
    }
}

impl<D> From<Vec<Solution<D>>> for Population<D> {
    fn from(solutions: Vec<Solution<D>>) -> Self {
        Self { solutions }
    }
}

impl<D> FromIterator<Solution<D>> for Population<D> {
    fn from_iter<I: IntoIterator<Item = Solution<D>>>(iter: I) -> Self {
        Self {
            solutions: iter.into_iter().collect(),
        }
    }
}

impl<D> Extend<Solution<D>> for Population<D> {
    fn extend<I: IntoIterator<Item = Solution<D>>>(&mut self, iter: I) {
        self.solutions.extend(iter);
    }
}

impl<D> std::ops::Index<usize> for Population<D> {
    type Output = Solution<D>;

    fn index(&self, index: usize) -> &Solution<D> {
        &self.solutions[index]
    }
}

impl<D> std::ops::IndexMut<usize> for Population<D> {
    fn index_mut(&mut self, index: usize) -> &mut Solution<D> {
        &mut self.solutions[index]
    }
}

impl<'a, D> IntoIterator for &'a Population<D> {
    type Item = &'a Solution<D>;
    type IntoIter = std::slice::Iter<'a, Solution<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

impl<D> IntoIterator for Population<D> {
    type Item = Solution<D>;
    type IntoIter = std::vec::IntoIter<Solution<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.into_iter()
    }
}
