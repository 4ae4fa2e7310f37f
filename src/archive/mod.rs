//! ε-box dominance archive.
//!
//! An [`EpsilonBoxArchive`] is the external memory of an algorithm: it keeps
//! the best known trade-offs, independent of the evolving population.
//! Objective space is cut into boxes of width `epsilon[i]`; each box holds at
//! most one representative, and no member ε-dominates another.
//!
//! # Insertion rule
//!
//! 1. Compute the newcomer's box key
//! 2. If the box is occupied, keep whichever of the two has the smaller
//!    aggregate constraint violation, then the one closer to the box's lower
//!    corner; the incumbent wins exact ties
//! 3. Otherwise reject the newcomer if any member ε-dominates it
//! 4. Otherwise evict every member the newcomer ε-dominates and insert it
//!
//! # References
//!
//! - Laumanns et al. (2002), "Combining Convergence and Diversity in
//!   Evolutionary Multiobjective Optimization"
//! - Kollat & Reed (2006), "Comparing state-of-the-art evolutionary
//!   multi-objective algorithms for long-term groundwater monitoring design"

mod snapshot;

pub use snapshot::{ArchiveEntry, ArchiveSnapshot};

use crate::dominance::{BoxKey, Dominance, DominanceComparator, EpsilonBoxDominance, Epsilons};
use crate::error::{ensure_finite, ensure_len, MoeaError, MoeaResult};
use crate::solution::Solution;
use std::collections::BTreeMap;

/// Bounded archive of ε-non-dominated solutions.
///
/// Members are stored by box key and iterate in key order, which keeps runs
/// reproducible under a fixed seed.
///
/// # Example
///
/// ```
/// use u_moea::archive::EpsilonBoxArchive;
/// use u_moea::dominance::Epsilons;
/// use u_moea::Solution;
///
/// let mut archive = EpsilonBoxArchive::new(Epsilons::uniform(1.0).unwrap());
///
/// assert!(archive.add(Solution::with_objectives((), vec![0.9, 0.9])).unwrap());
/// // Same box, closer to the corner: replaces the incumbent.
/// assert!(archive.add(Solution::with_objectives((), vec![0.1, 0.1])).unwrap());
/// // A different, non-dominated box: both stay.
/// assert!(archive.add(Solution::with_objectives((), vec![2.0, -1.0])).unwrap());
///
/// assert_eq!(archive.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct EpsilonBoxArchive<D> {
    comparator: EpsilonBoxDominance,
    members: BTreeMap<BoxKey, Solution<D>>,
    objectives: Option<usize>,
    constraints: Option<usize>,
    improvements: usize,
    dominating_improvements: usize,
}

impl<D> EpsilonBoxArchive<D> {
    /// Creates an empty archive.
    ///
    /// Objective and constraint counts are fixed by the first solution added.
    pub fn new(epsilons: Epsilons) -> Self {
        Self {
            comparator: EpsilonBoxDominance::new(epsilons),
            members: BTreeMap::new(),
            objectives: None,
            constraints: None,
            improvements: 0,
            dominating_improvements: 0,
        }
    }

    /// Creates an empty archive with fixed dimensionality.
    pub fn with_dimensions(epsilons: Epsilons, objectives: usize, constraints: usize) -> MoeaResult<Self> {
        if objectives == 0 {
            return Err(MoeaError::config("archive needs at least one objective"));
        }
        let mut archive = Self::new(epsilons);
        archive.objectives = Some(objectives);
        archive.constraints = Some(constraints);
        Ok(archive)
    }

    /// Creates an archive from raw widths.
    ///
    /// # Errors
    ///
    /// [`MoeaError::Configuration`] for malformed epsilons.
    pub fn from_epsilons(epsilons: Vec<f64>) -> MoeaResult<Self> {
        Ok(Self::new(Epsilons::new(epsilons)?))
    }

    /// Offers a solution to the archive.
    ///
    /// Returns `true` if the archive changed.
    ///
    /// # Errors
    ///
    /// - [`MoeaError::DimensionMismatch`] if the solution's objective or
    ///   constraint count differs from the archive's
    /// - [`MoeaError::Numeric`] on NaN or infinite values
    pub fn add(&mut self, solution: Solution<D>) -> MoeaResult<bool> {
        self.check(&solution)?;
        let key = self.comparator.epsilons().box_key(solution.objectives());

        let occupied = self
            .members
            .get(&key)
            .map(|incumbent| self.challenger_wins(&key, incumbent, &solution));

        if let Some(wins) = occupied {
            if !wins {
                return Ok(false);
            }
            let evicted = self.evict_dominated_by(&solution, Some(&key))?;
            self.members.insert(key, solution);
            self.record_improvement(evicted);
            return Ok(true);
        }

        for member in self.members.values() {
            if self.comparator.compare(member, &solution)? == Dominance::Left {
                return Ok(false);
            }
        }

        let evicted = self.evict_dominated_by(&solution, None)?;
        self.members.insert(key, solution);
        self.record_improvement(evicted);
        Ok(true)
    }

    /// Adds every solution, returning how many additions changed the archive.
    pub fn extend_from<I>(&mut self, solutions: I) -> MoeaResult<usize>
    where
        I: IntoIterator<Item = Solution<D>>,
    {
        let mut changed = 0;
        for solution in solutions {
            if self.add(solution)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Alias of [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether the archive has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the archive holds a member with the same box, objectives, and
    /// constraint violations as `solution`.
    pub fn contains(&self, solution: &Solution<D>) -> bool {
        let key = self.comparator.epsilons().box_key(solution.objectives());
        self.members.get(&key).is_some_and(|m| {
            m.objectives() == solution.objectives() && m.constraints() == solution.constraints()
        })
    }

    /// Iterates members in box-key order.
    ///
    /// Each call starts a fresh pass; the archive cannot be modified while an
    /// iterator is alive.
    pub fn iter(&self) -> impl Iterator<Item = &Solution<D>> + '_ {
        self.members.values()
    }

    /// Iterates `(box key, member)` pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&BoxKey, &Solution<D>)> + '_ {
        self.members.iter()
    }

    /// Box keys of all members, in order.
    pub fn box_keys(&self) -> Vec<BoxKey> {
        self.members.keys().cloned().collect()
    }

    /// The box containing `objectives` under this archive's epsilons.
    pub fn box_key(&self, objectives: &[f64]) -> BoxKey {
        self.comparator.epsilons().box_key(objectives)
    }

    /// Box widths used for keying.
    pub fn epsilons(&self) -> &Epsilons {
        self.comparator.epsilons()
    }

    /// The ε-dominance comparator used for insertion.
    pub fn comparator(&self) -> &EpsilonBoxDominance {
        &self.comparator
    }

    /// Number of `add` calls that changed the archive.
    pub fn improvements(&self) -> usize {
        self.improvements
    }

    /// Number of `add` calls whose newcomer evicted at least one member by
    /// ε-dominance.
    pub fn dominating_improvements(&self) -> usize {
        self.dominating_improvements
    }

    /// Objective count, once known.
    pub fn number_of_objectives(&self) -> Option<usize> {
        self.objectives
    }

    /// Removes every member. Dimensionality and counters are kept.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Consumes the archive, returning members in key order.
    pub fn into_solutions(self) -> Vec<Solution<D>> {
        self.members.into_values().collect()
    }

    /// Validates `solution` and fixes dimensionality on first use.
    fn check(&mut self, solution: &Solution<D>) -> MoeaResult<()> {
        let m = solution.objectives().len();
        let c = solution.constraints().len();
        match self.objectives {
            Some(expected) => ensure_len("objectives", expected, m)?,
            None if m == 0 => return Err(MoeaError::DimensionMismatch {
                what: "objectives",
                expected: 1,
                actual: 0,
            }),
            None => {}
        }
        if let Some(expected) = self.constraints {
            ensure_len("constraints", expected, c)?;
        }
        ensure_finite("objective", solution.objectives())?;
        ensure_finite("constraint", solution.constraints())?;

        self.objectives.get_or_insert(m);
        self.constraints.get_or_insert(c);
        Ok(())
    }

    /// Same-box preference: feasibility first, then corner distance.
    fn challenger_wins(&self, key: &BoxKey, incumbent: &Solution<D>, challenger: &Solution<D>) -> bool {
        let vi = incumbent.aggregate_violation();
        let vc = challenger.aggregate_violation();
        if vc != vi {
            return vc < vi;
        }
        let eps = self.comparator.epsilons();
        eps.corner_distance(key, challenger.objectives()) < eps.corner_distance(key, incumbent.objectives())
    }

    /// Removes members ε-dominated by `solution`, skipping `skip`.
    fn evict_dominated_by(&mut self, solution: &Solution<D>, skip: Option<&BoxKey>) -> MoeaResult<usize> {
        let mut dominated = Vec::new();
        for (key, member) in &self.members {
            if Some(key) == skip {
                continue;
            }
            if self.comparator.compare(solution, member)? == Dominance::Left {
                dominated.push(key.clone());
            }
        }
        for key in &dominated {
            self.members.remove(key);
        }
        if !dominated.is_empty() {
            tracing::debug!(
                evicted = dominated.len(),
                archive_size = self.members.len() + 1,
                "archive newcomer evicted dominated members"
            );
        }
        Ok(dominated.len())
    }

    fn record_improvement(&mut self, evicted: usize) {
        self.improvements += 1;
        if evicted > 0 {
            self.dominating_improvements += 1;
        }
    }
}

impl<'a, D> IntoIterator for &'a EpsilonBoxArchive<D> {
    type Item = &'a Solution<D>;
    type IntoIter = std::collections::btree_map::Values<'a, BoxKey, Solution<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.values()
    }
}

// ============================================================================
// Tests
// ============================================================================
