//! Archive snapshots for checkpointing.
//!
//! A snapshot is the archive's epsilons plus its members in box-key order.
//! With the `serde` feature the snapshot types derive `Serialize` and
//! `Deserialize`; the storage format is left to the caller.

use super::EpsilonBoxArchive;
use crate::dominance::Epsilons;
use crate::error::MoeaResult;
use crate::solution::{Evaluation, Solution};

/// One archived solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchiveEntry<D> {
    pub variables: D,
    pub objectives: Vec<f64>,
    pub constraints: Vec<f64>,
}

/// Externalized archive state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchiveSnapshot<D> {
    /// Box widths as configured.
    pub epsilons: Vec<f64>,

    /// Members in box-key order.
    pub entries: Vec<ArchiveEntry<D>>,
}

impl<D: Clone> EpsilonBoxArchive<D> {
    /// Captures the current members.
    pub fn snapshot(&self) -> ArchiveSnapshot<D> {
        ArchiveSnapshot {
            epsilons: self.epsilons().as_slice().to_vec(),
            entries: self
                .iter()
                .map(|s| ArchiveEntry {
                    variables: s.variables().clone(),
                    objectives: s.objectives().to_vec(),
                    constraints: s.constraints().to_vec(),
                })
                .collect(),
        }
    }
}

impl<D> EpsilonBoxArchive<D> {
    /// Rebuilds an archive from a snapshot.
    ///
    /// Entries are re-added in order, so a snapshot of a valid archive yields
    /// the same box keys and representatives.
    ///
    /// # Errors
    ///
    /// Configuration, dimension, or numeric errors from malformed input.
    pub fn from_snapshot(snapshot: ArchiveSnapshot<D>) -> MoeaResult<Self> {
        let mut archive = Self::new(Epsilons::new(snapshot.epsilons)?);
        archive.extend_from(snapshot.entries.into_iter().map(|e| {
            Solution::evaluated(e.variables, Evaluation::with_constraints(e.objectives, e.constraints))
        }))?;
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoeaError;

    fn filled() -> EpsilonBoxArchive<Vec<f64>> {
        let mut archive = EpsilonBoxArchive::from_epsilons(vec![0.1, 0.2]).unwrap();
        for i in 0..20 {
            let x = i as f64 / 19.0;
            archive
                .add(Solution::with_objectives(vec![x], vec![x, 1.0 - x.sqrt()]))
                .unwrap();
        }
        archive
    }

    #[test]
    fn test_snapshot_round_trip() {
        let archive = filled();
        let snapshot = archive.snapshot();
        assert_eq!(snapshot.entries.len(), archive.len());

        let rebuilt = EpsilonBoxArchive::from_snapshot(snapshot).unwrap();
        assert_eq!(rebuilt.box_keys(), archive.box_keys());
        for (a, b) in archive.iter().zip(rebuilt.iter()) {
            assert_eq!(a.variables(), b.variables());
            for (x, y) in a.objectives().iter().zip(b.objectives()) {
                assert!((x - y).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_snapshot_rejects_bad_epsilons() {
        let snapshot: ArchiveSnapshot<()> = ArchiveSnapshot {
            epsilons: vec![0.0],
            entries: Vec::new(),
        };
        assert!(matches!(
            EpsilonBoxArchive::from_snapshot(snapshot),
            Err(MoeaError::Configuration(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_json_round_trip() {
        let archive = filled();
        let json = serde_json::to_string(&archive.snapshot()).unwrap();
        let parsed: ArchiveSnapshot<Vec<f64>> = serde_json::from_str(&json).unwrap();
        let rebuilt = EpsilonBoxArchive::from_snapshot(parsed).unwrap();
        assert_eq!(rebuilt.box_keys(), archive.box_keys());
        assert_eq!(rebuilt.len(), archive.len());
    }
}
