use fnv::{FnvHashMap, FnvHashSet};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// Which of the two organisms in the sample a record belongs to
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Organism {
    A,
    B,
}

impl Organism {
    pub const BOTH: [Organism; 2] = [Organism::A, Organism::B];
}

/// One value per organism, indexable by [`Organism`]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Pair<T> {
    pub a: T,
    pub b: T,
}

impl<T> Pair<T> {
    pub fn new(a: T, b: T) -> Self {
        Pair { a, b }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Organism, &T)> {
        [(Organism::A, &self.a), (Organism::B, &self.b)].into_iter()
    }
}

impl<T> Index<Organism> for Pair<T> {
    type Output = T;

    fn index(&self, organism: Organism) -> &T {
        match organism {
            Organism::A => &self.a,
            Organism::B => &self.b,
        }
    }
}

impl<T> IndexMut<Organism> for Pair<T> {
    fn index_mut(&mut self, organism: Organism) -> &mut T {
        match organism {
            Organism::A => &mut self.a,
            Organism::B => &mut self.b,
        }
    }
}

/// A single (protein, peptide) occurrence reported by the digest.
///
/// The same peptide string may recur under the same protein (multiple
/// cleavage products sharing a sequence) or under different proteins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeptideRecord {
    pub protein: Arc<String>,
    pub peptide: String,
    pub organism: Organism,
}

/// All digest records for one organism, with the derived unique view.
///
/// `unique` holds records whose peptide string occurs exactly once across
/// the whole of `total` - a peptide seen more than once anywhere in the
/// organism is excluded entirely, not deduplicated. Both collections are
/// fixed at construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProteomeDataset {
    pub organism: Organism,
    pub label: String,
    pub total: Vec<PeptideRecord>,
    unique: Vec<PeptideRecord>,
}

/// Per-organism counts reported after summarization
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProteomeSummary {
    pub peptides: usize,
    pub proteins: usize,
    pub unique_peptides: usize,
    pub unique_proteins: usize,
    pub high_freq_peptides: usize,
}

impl ProteomeDataset {
    pub fn new<S: Into<String>>(organism: Organism, label: S, total: Vec<PeptideRecord>) -> Self {
        let frequencies = Self::frequencies(&total);
        let unique = total
            .iter()
            .filter(|record| frequencies[record.peptide.as_str()] == 1)
            .cloned()
            .collect();

        ProteomeDataset {
            organism,
            label: label.into(),
            total,
            unique,
        }
    }

    /// Multiplicity of every peptide string across the full record set
    fn frequencies(records: &[PeptideRecord]) -> FnvHashMap<&str, u32> {
        let mut table: FnvHashMap<&str, u32> = FnvHashMap::default();
        for record in records {
            *table.entry(record.peptide.as_str()).or_default() += 1;
        }
        table
    }

    /// Records whose peptide occurs exactly once in this organism
    pub fn unique(&self) -> &[PeptideRecord] {
        &self.unique
    }

    /// Records of peptides occurring more than twice in this organism,
    /// sorted by ascending multiplicity
    pub fn high_freq(&self) -> Vec<&PeptideRecord> {
        let frequencies = Self::frequencies(&self.total);
        let mut records = self
            .total
            .iter()
            .filter(|record| frequencies[record.peptide.as_str()] > 2)
            .collect::<Vec<_>>();
        records.sort_by_key(|record| frequencies[record.peptide.as_str()]);
        records
    }

    /// Every protein accession appearing in the full record set
    pub fn protein_ids(&self) -> FnvHashSet<&str> {
        self.total
            .iter()
            .map(|record| record.protein.as_str())
            .collect()
    }

    /// Number of records in `total` attributed to `protein`, counting
    /// internally-duplicated cleavage products
    pub fn peptides_for(&self, protein: &str) -> usize {
        self.total
            .iter()
            .filter(|record| record.protein.as_str() == protein)
            .count()
    }

    pub fn summary(&self) -> ProteomeSummary {
        let distinct = |records: &[PeptideRecord]| {
            records
                .iter()
                .map(|record| record.protein.as_str())
                .collect::<FnvHashSet<_>>()
                .len()
        };

        ProteomeSummary {
            peptides: self.total.len(),
            proteins: distinct(&self.total),
            unique_peptides: self.unique.len(),
            unique_proteins: distinct(&self.unique),
            high_freq_peptides: self.high_freq().len(),
        }
    }
}
