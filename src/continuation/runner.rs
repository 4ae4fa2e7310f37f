//! The adaptive continuation wrapper.

use super::config::{ContinuationConfig, FrequencyType};
use super::state::{ContinuationState, ResizeEvent};
use crate::algorithm::SearchAlgorithm;
use crate::archive::EpsilonBoxArchive;
use crate::error::{MoeaError, MoeaResult};
use crate::operators::Variation;
use crate::problem::Problem;
use crate::random::rng_from_option;
use crate::solution::{Population, Solution};
use rand::rngs::StdRng;
use rand::Rng;

type DecisionOf<A> = <<A as SearchAlgorithm>::Problem as Problem>::Decision;

/// Wraps a search algorithm and rebuilds its population when the archive
/// stops growing.
///
/// Every `window_size` steps (or evaluations) the archive size is compared
/// to the size seen at the previous check. No growth, or `max_window_size`
/// checks without a rebuild, triggers a rebuild:
///
/// 1. `growth = clamp(current / previous, min_growth_factor, max_growth_factor)`
/// 2. `new_size = clamp(round(old_size * growth), minimum, maximum)`
/// 3. `floor(injection_rate * new_size)` fresh random solutions
/// 4. the rest: archive members drawn uniformly with replacement, each batch
///    of `arity` parents passed through the perturbation operator
///
/// The wrapper is itself a [`SearchAlgorithm`], so it can be run with the
/// same budget loop as the algorithm it wraps.
///
/// # Usage
///
/// ```ignore
/// let nsga2 = Nsga2::new(problem, sbx_pm, Nsga2Config::default())?
///     .with_archive(EpsilonBoxArchive::from_epsilons(vec![0.01])?);
/// let mut algorithm = AdaptiveContinuation::new(
///     nsga2,
///     ContinuationConfig::default().with_seed(42),
///     UniformMutation::new(bounds, 0.1),
/// )?;
/// algorithm.run(100_000)?;
/// ```
#[derive(Debug)]
pub struct AdaptiveContinuation<A, V> {
    inner: A,
    config: ContinuationConfig,
    perturbation: V,
    rng: StdRng,
    state: ContinuationState,
}

impl<A, V> AdaptiveContinuation<A, V>
where
    A: SearchAlgorithm,
    V: Variation<DecisionOf<A>>,
{
    /// Wraps `inner`.
    ///
    /// # Errors
    ///
    /// [`MoeaError::Configuration`] if the config is invalid, the
    /// perturbation operator takes no parents, or `inner` has no archive.
    pub fn new(inner: A, config: ContinuationConfig, perturbation: V) -> MoeaResult<Self> {
        config.validate()?;
        if perturbation.arity() == 0 {
            return Err(MoeaError::config("perturbation operator must take at least one parent"));
        }
        let archive_size = inner
            .archive()
            .ok_or_else(|| MoeaError::config("adaptive continuation requires an archive"))?
            .len();

        let state = ContinuationState::new(archive_size, inner.evaluations());
        let rng = rng_from_option(config.seed);
        Ok(Self {
            inner,
            config,
            perturbation,
            rng,
            state,
        })
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }

    pub fn config(&self) -> &ContinuationConfig {
        &self.config
    }

    /// Operator applied to archive samples on restart.
    pub fn perturbation(&self) -> &V {
        &self.perturbation
    }

    pub fn state(&self) -> &ContinuationState {
        &self.state
    }

    /// Compares archive growth against the previous check and rebuilds the
    /// population when it stalled or when a rebuild is overdue.
    ///
    /// Called by [`step`](SearchAlgorithm::step) once per window.
    fn check(&mut self) -> MoeaResult<()> {
        self.state.checks += 1;
        self.state.checks_since_resize += 1;

        let current = self.archive_len();
        let previous = self.state.previous_archive_size;
        let stalled = current <= previous;
        let forced = !stalled && self.state.checks_since_resize >= self.config.max_window_size;

        tracing::debug!(
            check = self.state.checks,
            archive_size = current,
            previous_archive_size = previous,
            stalled,
            forced,
            "continuation check"
        );

        if stalled || forced {
            self.resize(current, forced)
        } else {
            self.state.previous_archive_size = current;
            Ok(())
        }
    }

    fn resize(&mut self, current: usize, forced: bool) -> MoeaResult<()> {
        let previous = self.state.previous_archive_size;
        let growth_factor = if previous == 0 {
            self.config.max_growth_factor
        } else {
            (current as f64 / previous as f64)
                .clamp(self.config.min_growth_factor, self.config.max_growth_factor)
        };

        let old_population_size = self.inner.population().len();
        let new_population_size = ((old_population_size as f64 * growth_factor).round() as usize)
            .clamp(
                self.config.minimum_population_size,
                self.config.maximum_population_size,
            );
        let injected = (self.config.injection_rate * new_population_size as f64).floor() as usize;

        let solutions = self.rebuild(new_population_size, injected)?;
        self.inner.replace_population(solutions)?;

        let event = ResizeEvent {
            check: self.state.checks,
            previous_archive_size: previous,
            archive_size: current,
            growth_factor,
            old_population_size,
            new_population_size,
            injected,
            forced,
        };
        tracing::info!(
            check = event.check,
            old_population_size,
            new_population_size,
            injected,
            forced,
            "continuation resized population"
        );

        self.state.resizes.push(event);
        self.state.checks_since_resize = 0;
        self.state.previous_archive_size = self.archive_len();
        self.state.last_evaluations = self.inner.evaluations();
        Ok(())
    }

    /// Draws the rebuilt population: `injected` random solutions first, then
    /// perturbed archive samples.
    fn rebuild(&mut self, size: usize, injected: usize) -> MoeaResult<Vec<Solution<DecisionOf<A>>>> {
        let mut solutions = Vec::with_capacity(size);
        for _ in 0..injected {
            solutions.push(self.inner.problem().create_solution(&mut self.rng));
        }

        let members: Vec<&Solution<DecisionOf<A>>> = self
            .inner
            .archive()
            .map(|archive| archive.iter().collect())
            .unwrap_or_default();
        let arity = self.perturbation.arity();

        while solutions.len() < size {
            if members.is_empty() {
                solutions.push(self.inner.problem().create_solution(&mut self.rng));
                continue;
            }

            let parents: Vec<&Solution<DecisionOf<A>>> = (0..arity)
                .map(|_| members[self.rng.random_range(0..members.len())])
                .collect();
            let children = self.perturbation.evolve(&parents, &mut self.rng);
            if children.is_empty() {
                solutions.push(self.inner.problem().create_solution(&mut self.rng));
                continue;
            }
            for child in children {
                if solutions.len() >= size {
                    break;
                }
                solutions.push(child);
            }
        }

        Ok(solutions)
    }

    /// `new` checked that the archive exists, and [`SearchAlgorithm::archive`]
    /// never drops it afterwards.
    fn archive_len(&self) -> usize {
        self.inner.archive().map_or(0, EpsilonBoxArchive::len)
    }
}

impl<A, V> SearchAlgorithm for AdaptiveContinuation<A, V>
where
    A: SearchAlgorithm,
    V: Variation<DecisionOf<A>>,
{
    type Problem = A::Problem;

    fn problem(&self) -> &Self::Problem {
        self.inner.problem()
    }

    fn step(&mut self) -> MoeaResult<()> {
        self.inner.step()?;

        let evaluations = self.inner.evaluations();
        self.state.counter += match self.config.frequency_type {
            FrequencyType::Steps => 1,
            FrequencyType::Evaluations => evaluations.saturating_sub(self.state.last_evaluations),
        };
        self.state.last_evaluations = evaluations;

        tracing::trace!(counter = self.state.counter, evaluations, "continuation step");

        if self.state.counter >= self.config.window_size {
            self.state.counter = 0;
            self.check()?;
        }
        Ok(())
    }

    fn evaluations(&self) -> usize {
        self.inner.evaluations()
    }

    fn steps(&self) -> usize {
        self.inner.steps()
    }

    fn population(&self) -> &Population<DecisionOf<A>> {
        self.inner.population()
    }

    fn archive(&self) -> Option<&EpsilonBoxArchive<DecisionOf<A>>> {
        self.inner.archive()
    }

    fn replace_population(&mut self, solutions: Vec<Solution<DecisionOf<A>>>) -> MoeaResult<()> {
        self.inner.replace_population(solutions)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dominance::Epsilons;
    use crate::operators::UniformMutation;
    use crate::problem::evaluate_solution;
    use crate::solution::Evaluation;

    // ---- A scripted inner algorithm ----

    struct Line;

    impl Problem for Line {
        type Decision = Vec<f64>;

        fn number_of_objectives(&self) -> usize {
            2
        }

        fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<Vec<f64>> {
            Solution::new(vec![rng.random_range(0.0..1.0)])
        }

        fn evaluate(&self, x: &Vec<f64>) -> Evaluation {
            Evaluation::new(vec![x[0], 1.0 - x[0]])
        }
    }

    /// Either keeps the archive static or feeds it one new box per step.
    struct Scripted {
        problem: Line,
        population: Population<Vec<f64>>,
        archive: Option<EpsilonBoxArchive<Vec<f64>>>,
        grow: bool,
        evaluations_per_step: usize,
        evaluations: usize,
        steps: usize,
    }

    impl Scripted {
        fn new(grow: bool) -> Self {
            let mut archive = EpsilonBoxArchive::new(Epsilons::uniform(1e-6).unwrap());
            let mut population = Population::new();
            for i in 0..10 {
                let x = i as f64 / 10.0;
                let s = Solution::with_objectives(vec![x], vec![x, 1.0 - x]);
                archive.add(s.clone()).unwrap();
                population.push(s);
            }
            Self {
                problem: Line,
                population,
                archive: Some(archive),
                grow,
                evaluations_per_step: 1,
                evaluations: 0,
                steps: 0,
            }
        }
    }

    impl SearchAlgorithm for Scripted {
        type Problem = Line;

        fn problem(&self) -> &Line {
            &self.problem
        }

        fn step(&mut self) -> MoeaResult<()> {
            self.steps += 1;
            self.evaluations += self.evaluations_per_step;
            if self.grow {
                // Points on the line x + y = 1 never dominate each other.
                let x = 0.05 + self.steps as f64 * 1e-3;
                if let Some(archive) = self.archive.as_mut() {
                    archive.add(Solution::with_objectives(vec![x], vec![x, 1.0 - x]))?;
                }
            }
            Ok(())
        }

        fn evaluations(&self) -> usize {
            self.evaluations
        }

        fn steps(&self) -> usize {
            self.steps
        }

        fn population(&self) -> &Population<Vec<f64>> {
            &self.population
        }

        fn archive(&self) -> Option<&EpsilonBoxArchive<Vec<f64>>> {
            self.archive.as_ref()
        }

        fn replace_population(&mut self, solutions: Vec<Solution<Vec<f64>>>) -> MoeaResult<()> {
            let mut population = Population::from(solutions);
            for s in population.iter_mut() {
                if !s.is_evaluated() {
                    evaluate_solution(&self.problem, s)?;
                    self.evaluations += 1;
                }
            }
            self.population = population;
            Ok(())
        }
    }

    fn wrap(inner: Scripted, config: ContinuationConfig) -> AdaptiveContinuation<Scripted, UniformMutation> {
        AdaptiveContinuation::new(inner, config.with_seed(7), UniformMutation::new(vec![(0.0, 1.0)], 0.5))
            .unwrap()
    }

    #[test]
    fn test_missing_archive_is_configuration_error() {
        let mut inner = Scripted::new(false);
        inner.archive = None;
        let result = AdaptiveContinuation::new(
            inner,
            ContinuationConfig::default(),
            UniformMutation::new(vec![(0.0, 1.0)], 1.0),
        );
        assert!(matches!(result, Err(MoeaError::Configuration(_))));
    }

    #[test]
    fn test_invalid_config_rejected_eagerly() {
        let result = AdaptiveContinuation::new(
            Scripted::new(false),
            ContinuationConfig::default().with_window_size(0),
            UniformMutation::new(vec![(0.0, 1.0)], 1.0),
        );
        assert!(matches!(result, Err(MoeaError::Configuration(_))));
    }

    #[test]
    fn test_no_check_before_window() {
        let config = ContinuationConfig::default().with_window_size(5).with_population_bounds(4, 40);
        let mut algo = wrap(Scripted::new(false), config);
        for _ in 0..4 {
            algo.step().unwrap();
        }
        assert_eq!(algo.state().checks, 0);
        assert_eq!(algo.state().counter, 4);
        algo.step().unwrap();
        assert_eq!(algo.state().checks, 1);
        assert_eq!(algo.state().counter, 0);
    }

    #[test]
    fn test_stalled_archive_triggers_resize() {
        let config = ContinuationConfig::default()
            .with_window_size(100)
            .with_max_window_size(3)
            .with_population_bounds(4, 40);
        let mut algo = wrap(Scripted::new(false), config);

        for _ in 0..300 {
            algo.step().unwrap();
        }

        assert_eq!(algo.state().checks, 3);
        // Static archive: every check rebuilds, the third one included.
        assert_eq!(algo.state().number_of_resizes(), 3);
        let last = algo.state().last_resize().unwrap();
        assert_eq!(last.check, 3);
        assert!(!last.forced);
        assert!((last.growth_factor - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_growing_archive_forced_resize() {
        let config = ContinuationConfig::default()
            .with_window_size(100)
            .with_max_window_size(3)
            .with_population_bounds(4, 40);
        let mut algo = wrap(Scripted::new(true), config);

        for _ in 0..200 {
            algo.step().unwrap();
        }
        assert_eq!(algo.state().checks, 2);
        assert_eq!(algo.state().number_of_resizes(), 0);

        for _ in 0..100 {
            algo.step().unwrap();
        }
        assert_eq!(algo.state().checks, 3);
        assert_eq!(algo.state().number_of_resizes(), 1);
        let event = algo.state().last_resize().unwrap();
        assert!(event.forced);
        assert_eq!(event.check, 3);
        assert_eq!(algo.state().checks_since_resize, 0);
    }

    #[test]
    fn test_resize_sizes_and_injection() {
        let config = ContinuationConfig::default()
            .with_window_size(1)
            .with_injection_rate(0.25)
            .with_population_bounds(4, 40);
        let mut algo = wrap(Scripted::new(false), config);

        algo.step().unwrap();
        let event = *algo.state().last_resize().unwrap();
        // Stalled: growth clamps to 1.0, size stays 10.
        assert_eq!(event.old_population_size, 10);
        assert_eq!(event.new_population_size, 10);
        assert_eq!(event.injected, 2);
        assert_eq!(algo.population().len(), 10);
        assert!(algo.population().iter().all(|s| s.is_evaluated()));
        // The rebuild evaluated all ten newcomers.
        assert_eq!(algo.evaluations(), 1 + 10);
    }

    #[test]
    fn test_population_bounds_clamp() {
        let config = ContinuationConfig::default()
            .with_window_size(1)
            .with_population_bounds(16, 40);
        let mut algo = wrap(Scripted::new(false), config);
        algo.step().unwrap();
        assert_eq!(algo.population().len(), 16);

        let config = ContinuationConfig::default()
            .with_window_size(1)
            .with_population_bounds(2, 6);
        let mut algo = wrap(Scripted::new(false), config);
        algo.step().unwrap();
        assert_eq!(algo.population().len(), 6);
    }

    #[test]
    fn test_growth_factor_clamped() {
        // The archive doubles between checks; growth is capped at 1.5.
        let config = ContinuationConfig::default()
            .with_window_size(20)
            .with_max_window_size(1)
            .with_growth_bounds(0.5, 1.5)
            .with_population_bounds(4, 100);
        let mut algo = wrap(Scripted::new(true), config);
        for _ in 0..20 {
            algo.step().unwrap();
        }
        let event = *algo.state().last_resize().unwrap();
        assert!(event.forced);
        assert_eq!(event.previous_archive_size, 10);
        assert_eq!(event.archive_size, 30);
        assert!((event.growth_factor - 1.5).abs() < 1e-12);
        assert_eq!(event.new_population_size, 15);
    }

    #[test]
    fn test_evaluation_frequency() {
        let mut inner = Scripted::new(true);
        inner.evaluations_per_step = 10;
        let config = ContinuationConfig::default()
            .with_window_size(25)
            .with_frequency_type(FrequencyType::Evaluations)
            .with_population_bounds(4, 40);
        let mut algo = wrap(inner, config);

        algo.step().unwrap();
        algo.step().unwrap();
        assert_eq!(algo.state().checks, 0);
        algo.step().unwrap();
        assert_eq!(algo.state().checks, 1);
    }

    #[test]
    fn test_run_forwards_budget() {
        let config = ContinuationConfig::default().with_window_size(10).with_population_bounds(4, 40);
        let mut algo = wrap(Scripted::new(true), config);
        let result = algo.run(50).unwrap();
        assert!(result.evaluations >= 50);
        assert!(!result.cancelled);
        assert_eq!(result.steps, algo.inner().steps);
    }
}
