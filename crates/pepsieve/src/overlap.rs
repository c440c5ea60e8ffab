//! Cross-proteome intersection
//!
//! Peptides unique within each organism are pooled; a sequence seen more
//! than once in the pool is unique within its own organism but collides
//! with the other, so it cannot discriminate between the two.

use crate::proteome::{Organism, Pair, ProteomeDataset};
use fnv::{FnvHashMap, FnvHashSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A peptide sequence present in both organisms' unique record sets,
/// with every (protein, organism) occurrence that produced it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SharedPeptide {
    pub sequence: String,
    pub occurrences: Vec<(Arc<String>, Organism)>,
}

/// The complete intersection analysis for one pair of proteomes.
///
/// This aggregate is the unit persisted between the analysis phase and the
/// screening phase; the screener reloads it rather than re-running the
/// digest. It is derived wholesale from the two datasets and never updated
/// incrementally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Analysis {
    pub proteomes: Pair<ProteomeDataset>,
    pub shared: Vec<SharedPeptide>,
    /// Sequences attributable to exactly one protein in one organism even
    /// after combining both unique sets
    pub cross_unique: usize,
    /// Proteins contributing at least one shared peptide, per organism
    pub impacted: Pair<Vec<Arc<String>>>,
}

impl Analysis {
    /// Pool both organisms' unique records and partition sequences by
    /// multiplicity: exactly one occurrence is cross-organism unique,
    /// two or more is a shared peptide.
    pub fn intersect(a: ProteomeDataset, b: ProteomeDataset) -> Analysis {
        let combined = a.unique().iter().chain(b.unique().iter());

        let mut table: FnvHashMap<&str, Vec<(&Arc<String>, Organism)>> = FnvHashMap::default();
        for record in combined {
            table
                .entry(record.peptide.as_str())
                .or_default()
                .push((&record.protein, record.organism));
        }

        let cross_unique = table.values().filter(|hits| hits.len() == 1).count();

        let mut shared = table
            .into_iter()
            .filter(|(_, hits)| hits.len() > 1)
            .map(|(sequence, hits)| SharedPeptide {
                sequence: sequence.to_string(),
                occurrences: hits
                    .into_iter()
                    .map(|(protein, organism)| (protein.clone(), organism))
                    .collect(),
            })
            .collect::<Vec<_>>();
        shared.sort_by(|x, y| x.sequence.cmp(&y.sequence));

        let impacted = Self::impacted_proteins(&shared, &a, &b);

        log::info!(
            "{} shared peptides across {} ({}) and {} ({}), {} still discriminatory, impacting {}/{} proteins",
            shared.len(),
            a.label,
            a.total.len(),
            b.label,
            b.total.len(),
            cross_unique,
            impacted.a.len(),
            impacted.b.len(),
        );

        Analysis {
            proteomes: Pair::new(a, b),
            shared,
            cross_unique,
            impacted,
        }
    }

    /// Partition the proteins occurring among shared peptides by organism,
    /// testing each accession against each organism's full protein-id set
    fn impacted_proteins(
        shared: &[SharedPeptide],
        a: &ProteomeDataset,
        b: &ProteomeDataset,
    ) -> Pair<Vec<Arc<String>>> {
        let ids = Pair::new(a.protein_ids(), b.protein_ids());

        let mut impacted: Pair<Vec<Arc<String>>> = Pair::default();
        let mut seen: Pair<FnvHashSet<&str>> = Pair::default();
        for peptide in shared {
            for (protein, _) in &peptide.occurrences {
                for organism in Organism::BOTH {
                    if ids[organism].contains(protein.as_str())
                        && seen[organism].insert(protein.as_str())
                    {
                        impacted[organism].push(protein.clone());
                    }
                }
            }
        }
        for organism in Organism::BOTH {
            impacted[organism].sort();
        }
        impacted
    }

    /// Shared sequences as a set, the join key for screening
    pub fn shared_sequences(&self) -> FnvHashSet<&str> {
        self.shared
            .iter()
            .map(|peptide| peptide.sequence.as_str())
            .collect()
    }

    /// The shared-peptide entry for a normalized sequence, if any
    pub fn shared_peptide(&self, sequence: &str) -> Option<&SharedPeptide> {
        self.shared
            .binary_search_by(|peptide| peptide.sequence.as_str().cmp(sequence))
            .ok()
            .map(|ix| &self.shared[ix])
    }
}
