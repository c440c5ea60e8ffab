//! Per-protein shared-peptide burden
//!
//! A protein that leaks several of its peptides into the shared set is
//! hard to discriminate between the two organisms; the burden table makes
//! that visible as the fraction of the protein's tryptic fragments that
//! are non-discriminatory.

use crate::overlap::Analysis;
use crate::proteome::{Organism, Pair};
use fnv::FnvHashMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A protein accession that could not be attributed to either organism.
///
/// This indicates inconsistency between the digest sources and the shared
/// set (e.g. a stale reloaded analysis) and must never be masked; the
/// whole burden analysis is aborted.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UnknownProteinError {
    pub protein: String,
}

impl fmt::Display for UnknownProteinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "protein `{}` is present in neither organism's digest",
            self.protein
        )
    }
}

impl std::error::Error for UnknownProteinError {}

/// Shared-peptide burden for one protein
#[derive(Clone, Debug, Serialize)]
pub struct ProteinBurden {
    pub protein: Arc<String>,
    pub organism: Organism,
    /// Distinct shared peptides this protein contributes
    pub shared: usize,
    /// All of the protein's records in its own organism's digest,
    /// counting internally-duplicated cleavage products
    pub total: usize,
    /// shared / total as a percentage, rounded to 2 decimal places
    pub fraction: f64,
}

/// Compute the burden for every protein contributing at least two distinct
/// shared peptides. Output order is unspecified beyond being deterministic
/// for a given analysis; ranking is left to presentation.
pub fn analyze(analysis: &Analysis) -> Result<Vec<ProteinBurden>, UnknownProteinError> {
    let mut counts: FnvHashMap<&Arc<String>, usize> = FnvHashMap::default();
    for peptide in &analysis.shared {
        for (protein, _) in &peptide.occurrences {
            *counts.entry(protein).or_default() += 1;
        }
    }

    let ids = Pair::new(
        analysis.proteomes.a.protein_ids(),
        analysis.proteomes.b.protein_ids(),
    );

    let mut burdens = Vec::new();
    for (protein, shared) in counts {
        if shared < 2 {
            continue;
        }

        let organism = if ids.a.contains(protein.as_str()) {
            Organism::A
        } else if ids.b.contains(protein.as_str()) {
            Organism::B
        } else {
            return Err(UnknownProteinError {
                protein: protein.to_string(),
            });
        };

        let total = analysis.proteomes[organism].peptides_for(protein);
        let fraction = (shared as f64 / total as f64 * 10_000.0).round() / 100.0;

        burdens.push(ProteinBurden {
            protein: Arc::clone(protein),
            organism,
            shared,
            total,
            fraction,
        });
    }
    burdens.sort_by(|x, y| x.protein.cmp(&y.protein));

    Ok(burdens)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::proteome::{PeptideRecord, ProteomeDataset};

    fn record(protein: &str, peptide: &str, organism: Organism) -> PeptideRecord {
        PeptideRecord {
            protein: Arc::new(protein.into()),
            peptide: peptide.into(),
            organism,
        }
    }

    /// P1 has 10 peptides in organism A, 3 of which collide with B
    #[test]
    fn fraction_of_shared_peptides() {
        let mut a_records = vec![
            record("P1", "AAK", Organism::A),
            record("P1", "CCK", Organism::A),
            record("P1", "DDK", Organism::A),
        ];
        for i in 0..7 {
            a_records.push(record("P1", &format!("FILLER{}K", i), Organism::A));
        }
        let b_records = vec![
            record("Q1", "AAK", Organism::B),
            record("Q1", "CCK", Organism::B),
            record("Q2", "DDK", Organism::B),
        ];

        let analysis = Analysis::intersect(
            ProteomeDataset::new(Organism::A, "a", a_records),
            ProteomeDataset::new(Organism::B, "b", b_records),
        );
        let burdens = analyze(&analysis).unwrap();

        let p1 = burdens
            .iter()
            .find(|burden| burden.protein.as_str() == "P1")
            .unwrap();
        assert_eq!(p1.organism, Organism::A);
        assert_eq!(p1.shared, 3);
        assert_eq!(p1.total, 10);
        assert_eq!(p1.fraction, 30.00);

        // Q1 contributes two shared peptides out of its two
        let q1 = burdens
            .iter()
            .find(|burden| burden.protein.as_str() == "Q1")
            .unwrap();
        assert_eq!(q1.organism, Organism::B);
        assert_eq!(q1.shared, 2);
        assert_eq!(q1.fraction, 100.00);

        // Q2 contributes a single shared peptide and is below the threshold
        assert!(burdens.iter().all(|burden| burden.protein.as_str() != "Q2"));
    }

    #[test]
    fn no_overlap_means_no_burdens() {
        let analysis = Analysis::intersect(
            ProteomeDataset::new(Organism::A, "a", vec![record("P1", "AAK", Organism::A)]),
            ProteomeDataset::new(Organism::B, "b", vec![record("Q1", "BBK", Organism::B)]),
        );
        assert!(analyze(&analysis).unwrap().is_empty());
    }

    #[test]
    fn unknown_protein_is_fatal() {
        let analysis = Analysis::intersect(
            ProteomeDataset::new(
                Organism::A,
                "a",
                vec![record("P1", "AAK", Organism::A), record("P1", "CCK", Organism::A)],
            ),
            ProteomeDataset::new(
                Organism::B,
                "b",
                vec![record("Q1", "AAK", Organism::B), record("Q1", "CCK", Organism::B)],
            ),
        );

        // Simulate drift between the shared set and the digests
        let mut stale = analysis.clone();
        for peptide in &mut stale.shared {
            peptide.occurrences[0].0 = Arc::new("GHOST".into());
        }

        let err = analyze(&stale).unwrap_err();
        assert_eq!(err.protein, "GHOST");
    }

    #[test]
    fn rounded_to_two_decimals() {
        // 2 shared of 3 total = 66.666..% -> 66.67
        let analysis = Analysis::intersect(
            ProteomeDataset::new(
                Organism::A,
                "a",
                vec![
                    record("P1", "AAK", Organism::A),
                    record("P1", "CCK", Organism::A),
                    record("P1", "DDK", Organism::A),
                ],
            ),
            ProteomeDataset::new(
                Organism::B,
                "b",
                vec![record("Q1", "AAK", Organism::B), record("Q2", "CCK", Organism::B)],
            ),
        );

        let burdens = analyze(&analysis).unwrap();
        let p1 = burdens
            .iter()
            .find(|burden| burden.protein.as_str() == "P1")
            .unwrap();
        assert_eq!(p1.fraction, 66.67);
    }
}
