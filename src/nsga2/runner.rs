//! NSGA-II generational loop.
//!
//! [`Nsga2`] runs one generation per [`step`](SearchAlgorithm::step):
//! selection → variation → evaluation → archive → environmental selection.

use super::config::Nsga2Config;
use crate::algorithm::SearchAlgorithm;
use crate::archive::EpsilonBoxArchive;
use crate::error::{MoeaError, MoeaResult};
use crate::operators::Variation;
use crate::problem::{evaluate_all, Problem};
use crate::random::rng_from_option;
use crate::ranking::truncate;
use crate::solution::{Population, Solution};
use rand::rngs::StdRng;

/// Step-wise NSGA-II with an optional ε-box archive.
///
/// Every evaluated solution, initial or offspring, is offered to the
/// archive when one is attached.
///
/// # Usage
///
/// ```ignore
/// let bounds = vec![(0.0, 1.0); 30];
/// let variation = CompoundVariation::new(
///     SimulatedBinaryCrossover::new(bounds.clone()),
///     PolynomialMutation::new(bounds),
/// );
/// let mut nsga2 = Nsga2::new(Zdt1, variation, Nsga2Config::default().with_seed(42))?;
/// nsga2.run(25_000)?;
/// ```
#[derive(Debug)]
pub struct Nsga2<P: Problem, V> {
    problem: P,
    variation: V,
    config: Nsga2Config,
    population: Population<P::Decision>,
    archive: Option<EpsilonBoxArchive<P::Decision>>,
    rng: StdRng,
    evaluations: usize,
    steps: usize,
    initialized: bool,
}

impl<P, V> Nsga2<P, V>
where
    P: Problem,
    V: Variation<P::Decision>,
{
    /// Creates the algorithm. No evaluation happens until the first step.
    ///
    /// # Errors
    ///
    /// [`MoeaError::Configuration`] if the config is invalid or the
    /// variation operator takes no parents.
    pub fn new(problem: P, variation: V, config: Nsga2Config) -> MoeaResult<Self> {
        config.validate()?;
        if variation.arity() == 0 {
            return Err(MoeaError::config("variation operator must take at least one parent"));
        }
        let rng = rng_from_option(config.seed);
        Ok(Self {
            problem,
            variation,
            config,
            population: Population::new(),
            archive: None,
            rng,
            evaluations: 0,
            steps: 0,
            initialized: false,
        })
    }

    /// Attaches an external archive.
    pub fn with_archive(mut self, archive: EpsilonBoxArchive<P::Decision>) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn config(&self) -> &Nsga2Config {
        &self.config
    }

    /// Detaches and returns the archive.
    pub fn into_archive(self) -> Option<EpsilonBoxArchive<P::Decision>> {
        self.archive
    }

    fn initialize(&mut self) -> MoeaResult<()> {
        let initial: Vec<Solution<P::Decision>> = (0..self.config.population_size)
            .map(|_| self.problem.create_solution(&mut self.rng))
            .collect();
        self.install(initial)?;

        tracing::debug!(
            population_size = self.population.len(),
            archive_size = self.archive.as_ref().map(EpsilonBoxArchive::len),
            "nsga2 initialized"
        );
        Ok(())
    }

    fn generation(&mut self) -> MoeaResult<()> {
        let target = self.population.len();
        let arity = self.variation.arity();
        let selection = self.config.selection;

        let mut offspring = Vec::with_capacity(target);
        while offspring.len() < target {
            let parents: Vec<&Solution<P::Decision>> = (0..arity)
                .map(|_| &self.population[selection.select(self.population.as_slice(), &mut self.rng)])
                .collect();
            let children = self.variation.evolve(&parents, &mut self.rng);
            if children.is_empty() {
                offspring.push(self.problem.create_solution(&mut self.rng));
                continue;
            }
            let room = target - offspring.len();
            offspring.extend(children.into_iter().take(room));
        }

        let offspring = self.evaluate_and_archive(offspring)?;
        self.population.extend(offspring);
        truncate(&mut self.population, target)?;

        tracing::trace!(
            step = self.steps + 1,
            evaluations = self.evaluations,
            "nsga2 generation"
        );
        Ok(())
    }

    /// Evaluates what still needs it, archives every newcomer, and returns
    /// the solutions with evaluated ones first.
    fn evaluate_and_archive(
        &mut self,
        solutions: Vec<Solution<P::Decision>>,
    ) -> MoeaResult<Vec<Solution<P::Decision>>> {
        let (mut fresh, mut ready): (Vec<_>, Vec<_>) =
            solutions.into_iter().partition(|s| !s.is_evaluated());

        evaluate_all(&self.problem, &mut fresh, self.config.parallel)?;
        self.evaluations += fresh.len();

        ready.append(&mut fresh);
        if let Some(archive) = self.archive.as_mut() {
            for s in &ready {
                archive.add(s.clone())?;
            }
        }
        Ok(ready)
    }

    /// Makes `solutions` the population and recomputes rank and crowding.
    fn install(&mut self, solutions: Vec<Solution<P::Decision>>) -> MoeaResult<()> {
        let solutions = self.evaluate_and_archive(solutions)?;
        let size = solutions.len();
        self.population = Population::from(solutions);
        truncate(&mut self.population, size)?;
        self.initialized = true;
        Ok(())
    }
}

impl<P, V> SearchAlgorithm for Nsga2<P, V>
where
    P: Problem,
    V: Variation<P::Decision>,
{
    type Problem = P;

    fn problem(&self) -> &P {
        &self.problem
    }

    fn step(&mut self) -> MoeaResult<()> {
        if self.initialized {
            self.generation()?;
        } else {
            self.initialize()?;
        }
        self.steps += 1;
        Ok(())
    }

    fn evaluations(&self) -> usize {
        self.evaluations
    }

    fn steps(&self) -> usize {
        self.steps
    }

    fn population(&self) -> &Population<P::Decision> {
        &self.population
    }

    fn archive(&self) -> Option<&EpsilonBoxArchive<P::Decision>> {
        self.archive.as_ref()
    }

    /// # Panics
    /// Panics if `solutions` is empty.
    fn replace_population(&mut self, solutions: Vec<Solution<P::Decision>>) -> MoeaResult<()> {
        assert!(!solutions.is_empty(), "replacement population must not be empty");
        self.install(solutions)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dominance::{pareto_dominance, Dominance};
    use crate::operators::{CompoundVariation, PolynomialMutation, SimulatedBinaryCrossover};
    use crate::solution::Evaluation;
    use rand::Rng;

    // ---- Test problem: Schaffer N.1 over a box ----

    struct Schaffer;

    impl Problem for Schaffer {
        type Decision = Vec<f64>;

        fn number_of_objectives(&self) -> usize {
            2
        }

        fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<Vec<f64>> {
            Solution::new(vec![rng.random_range(-5.0..5.0)])
        }

        fn evaluate(&self, x: &Vec<f64>) -> Evaluation {
            Evaluation::new(vec![x[0] * x[0], (x[0] - 2.0) * (x[0] - 2.0)])
        }
    }

    type Sbx = CompoundVariation<SimulatedBinaryCrossover, PolynomialMutation>;

    fn variation() -> Sbx {
        let bounds = vec![(-5.0, 5.0)];
        CompoundVariation::new(
            SimulatedBinaryCrossover::new(bounds.clone()),
            PolynomialMutation::new(bounds),
        )
    }

    fn nsga2(size: usize, seed: u64) -> Nsga2<Schaffer, Sbx> {
        let config = Nsga2Config::default().with_population_size(size).with_seed(seed);
        Nsga2::new(Schaffer, variation(), config).unwrap()
    }

    // ---- Construction ----

    #[test]
    fn test_invalid_config_rejected() {
        let config = Nsga2Config::default().with_population_size(0);
        assert!(matches!(
            Nsga2::new(Schaffer, variation(), config),
            Err(MoeaError::Configuration(_))
        ));
    }

    // ---- Stepping ----

    #[test]
    fn test_first_step_initializes() {
        let mut algo = nsga2(20, 42);
        assert!(algo.population().is_empty());

        algo.step().unwrap();
        assert_eq!(algo.population().len(), 20);
        assert_eq!(algo.evaluations(), 20);
        assert_eq!(algo.steps(), 1);
        assert!(algo.population().iter().all(|s| s.rank().is_some()));
        assert!(algo.population().iter().all(|s| s.crowding_distance().is_some()));
    }

    #[test]
    fn test_generation_keeps_size() {
        let mut algo = nsga2(20, 42);
        for _ in 0..5 {
            algo.step().unwrap();
        }
        assert_eq!(algo.population().len(), 20);
        assert_eq!(algo.evaluations(), 100);
        assert_eq!(algo.steps(), 5);
    }

    #[test]
    fn test_converges_towards_front() {
        let mut algo = nsga2(40, 7);
        algo.run(4_000).unwrap();
        // The Pareto set of Schaffer N.1 is x in [0, 2].
        let inside = algo
            .population()
            .iter()
            .filter(|s| (-0.05..=2.05).contains(&s.variables()[0]))
            .count();
        assert!(inside >= 36, "only {inside} of 40 near the Pareto set");
    }

    #[test]
    fn test_seed_reproducible() {
        let mut a = nsga2(16, 11);
        let mut b = nsga2(16, 11);
        a.run(160).unwrap();
        b.run(160).unwrap();
        assert_eq!(a.population().objectives(), b.population().objectives());
    }

    // ---- Archive ----

    #[test]
    fn test_archive_receives_every_evaluation() {
        let archive = EpsilonBoxArchive::from_epsilons(vec![0.05]).unwrap();
        let mut algo = nsga2(20, 3).with_archive(archive);
        algo.run(400).unwrap();

        let archive = algo.archive().unwrap();
        assert!(!archive.is_empty());
        let members: Vec<_> = archive.iter().collect();
        for a in &members {
            for b in &members {
                if !std::ptr::eq(*a, *b) {
                    assert_ne!(pareto_dominance(a.objectives(), b.objectives()), Dominance::Left);
                }
            }
        }
        assert!(archive.improvements() > 0);
    }

    // ---- Population replacement ----

    #[test]
    fn test_replace_population_evaluates_newcomers() {
        let mut algo = nsga2(10, 5).with_archive(EpsilonBoxArchive::from_epsilons(vec![0.1]).unwrap());
        algo.step().unwrap();
        assert_eq!(algo.evaluations(), 10);

        let mut newcomers: Vec<_> = (0..4).map(|i| Solution::new(vec![i as f64 * 0.5])).collect();
        newcomers.push(Solution::with_objectives(vec![1.0], vec![1.0, 1.0]));
        algo.replace_population(newcomers).unwrap();

        assert_eq!(algo.population().len(), 5);
        assert_eq!(algo.evaluations(), 14);
        assert!(algo.population().iter().all(|s| s.is_evaluated() && s.rank().is_some()));

        // Later generations use the replaced size.
        algo.step().unwrap();
        assert_eq!(algo.population().len(), 5);
        assert_eq!(algo.evaluations(), 19);
    }

    #[test]
    fn test_replace_population_before_first_step() {
        let mut algo = nsga2(10, 5);
        algo.replace_population(vec![Solution::new(vec![0.0]), Solution::new(vec![1.0])])
            .unwrap();
        algo.step().unwrap();
        // Already initialized: the step is a generation on two solutions.
        assert_eq!(algo.population().len(), 2);
        assert_eq!(algo.evaluations(), 4);
    }

    #[test]
    #[should_panic(expected = "replacement population must not be empty")]
    fn test_replace_population_empty_panics() {
        let mut algo = nsga2(10, 5);
        let _ = algo.replace_population(Vec::new());
    }

    // ---- Degenerate variation ----

    /// Takes one parent and never returns a child.
    struct Barren;

    impl Variation<Vec<f64>> for Barren {
        fn arity(&self) -> usize {
            1
        }

        fn evolve<R: Rng>(&self, _parents: &[&Solution<Vec<f64>>], _rng: &mut R) -> Vec<Solution<Vec<f64>>> {
            Vec::new()
        }
    }

    #[test]
    fn test_barren_variation_falls_back_to_random() {
        let config = Nsga2Config::default().with_population_size(8).with_seed(4);
        let mut algo = Nsga2::new(Schaffer, Barren, config)
            .unwrap()
            .with_archive(EpsilonBoxArchive::from_epsilons(vec![0.1]).unwrap());
        algo.step().unwrap();
        algo.step().unwrap();
        algo.step().unwrap();

        assert_eq!(algo.population().len(), 8);
        assert_eq!(algo.evaluations(), 24);
        assert!(algo.population().iter().all(|s| s.is_evaluated()));
    }
}
