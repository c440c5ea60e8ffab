//! Screen experimental identifications against the shared-peptide set
//!
//! Every row of a result file is normalized and tested for membership in
//! the shared set. Rows that hit are kept verbatim (in input order, with
//! multiplicity) in the conflicts view; a second, deduplicated view joins
//! each observed shared peptide to its implicated protein in each organism
//! together with gene and description metadata. Row-level failures are
//! collected and reported beside the successful rows - one malformed
//! precursor id never discards a whole result file, and it is never
//! silently treated as "not shared".

use crate::fasta::Metadata;
use crate::overlap::Analysis;
use crate::precursor::{self, NormalizationError};
use crate::proteome::{Organism, Pair};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// One row of an experimental result file: the raw precursor identifier
/// plus whatever passthrough columns the file carried
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRow {
    pub precursor: String,
    pub fields: Vec<String>,
}

/// A result row whose peptide cannot discriminate between the organisms
#[derive(Clone, Debug)]
pub struct Conflict {
    pub peptide: String,
    pub row: ResultRow,
}

/// Metadata joined for one organism's implicated protein
#[derive(Clone, Debug)]
pub struct OrganismHit {
    pub protein: Arc<String>,
    pub gene: Option<String>,
    pub description: String,
    /// The protein's record count in its own organism's full digest
    pub total_peptides: usize,
}

/// One row of the deduplicated summary: a shared peptide actually observed
/// in this experiment, with both implicated proteins
#[derive(Clone, Debug)]
pub struct SummaryRow {
    pub peptide: String,
    pub hits: Pair<OrganismHit>,
}

/// A failure scoped to a single row or peptide; the run continues
#[derive(Clone, Debug)]
pub enum RowError {
    /// The precursor id did not match the annotation grammar
    Normalization {
        row: usize,
        precursor: String,
        source: NormalizationError,
    },
    /// The shared set does not implicate exactly one protein per organism
    /// for this peptide (stale analysis or data drift)
    AmbiguousAttribution { peptide: String, organism: Organism },
    /// An implicated protein is missing from the sequence metadata
    MissingMetadata { peptide: String, protein: String },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalization {
                row,
                precursor,
                source,
            } => write!(f, "row {}: `{}`: {}", row, precursor, source),
            Self::AmbiguousAttribution { peptide, organism } => write!(
                f,
                "peptide `{}` does not map to exactly one protein in organism {:?}",
                peptide, organism
            ),
            Self::MissingMetadata { peptide, protein } => write!(
                f,
                "peptide `{}`: no metadata for protein `{}`",
                peptide, protein
            ),
        }
    }
}

/// Run-level screening failure; nothing useful can be produced
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ScreenError {
    /// The result file contained no rows
    EmptyInput,
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "result file contains no rows to screen"),
        }
    }
}

impl std::error::Error for ScreenError {}

#[derive(Debug)]
pub struct Screened {
    /// Conflicting rows in input order, with multiplicity
    pub conflicts: Vec<Conflict>,
    /// One row per distinct shared peptide observed, first occurrence wins
    pub summary: Vec<SummaryRow>,
    /// Row- and peptide-scoped failures, reported beside the results
    pub errors: Vec<RowError>,
}

/// Classify every result row against the shared-peptide set
pub fn screen(
    rows: Vec<ResultRow>,
    analysis: &Analysis,
    metadata: &Pair<Metadata>,
) -> Result<Screened, ScreenError> {
    if rows.is_empty() {
        return Err(ScreenError::EmptyInput);
    }

    let shared = analysis.shared_sequences();

    // Normalization is pure per-row work; order is preserved
    let normalized: Vec<Result<String, NormalizationError>> = rows
        .par_iter()
        .map(|row| precursor::normalize(&row.precursor))
        .collect();

    let mut conflicts = Vec::new();
    let mut errors = Vec::new();
    for (ix, (row, outcome)) in rows.into_iter().zip(normalized).enumerate() {
        match outcome {
            Ok(peptide) => {
                if shared.contains(peptide.as_str()) {
                    conflicts.push(Conflict { peptide, row });
                }
            }
            Err(source) => errors.push(RowError::Normalization {
                row: ix + 1,
                precursor: row.precursor,
                source,
            }),
        }
    }

    let summary = summarize(&conflicts, analysis, metadata, &mut errors);

    log::info!(
        "screened rows: {} conflicts, {} distinct shared peptides, {} row errors",
        conflicts.len(),
        summary.len(),
        errors.len()
    );

    Ok(Screened {
        conflicts,
        summary,
        errors,
    })
}

/// Deduplicate conflicts by peptide and join per-organism metadata.
/// Peptides that cannot be joined cleanly are reported and skipped.
fn summarize(
    conflicts: &[Conflict],
    analysis: &Analysis,
    metadata: &Pair<Metadata>,
    errors: &mut Vec<RowError>,
) -> Vec<SummaryRow> {
    let mut summary: Vec<SummaryRow> = Vec::new();
    for conflict in conflicts {
        if summary.iter().any(|row| row.peptide == conflict.peptide) {
            continue;
        }
        match join_peptide(&conflict.peptide, analysis, metadata) {
            Ok(row) => summary.push(row),
            Err(error) => errors.push(error),
        }
    }
    summary
}

fn join_peptide(
    peptide: &str,
    analysis: &Analysis,
    metadata: &Pair<Metadata>,
) -> Result<SummaryRow, RowError> {
    let entry = analysis
        .shared_peptide(peptide)
        .expect("conflicts only contain members of the shared set");

    let mut hits: Pair<Option<OrganismHit>> = Pair::default();
    for organism in Organism::BOTH {
        let mut proteins = entry
            .occurrences
            .iter()
            .filter(|(_, o)| *o == organism)
            .map(|(protein, _)| protein);

        let protein = match (proteins.next(), proteins.next()) {
            (Some(protein), None) => protein,
            _ => {
                return Err(RowError::AmbiguousAttribution {
                    peptide: peptide.to_string(),
                    organism,
                })
            }
        };

        let meta = metadata[organism].get(protein).ok_or_else(|| {
            RowError::MissingMetadata {
                peptide: peptide.to_string(),
                protein: protein.to_string(),
            }
        })?;

        hits[organism] = Some(OrganismHit {
            protein: Arc::clone(protein),
            gene: meta.gene.clone(),
            description: meta.description.clone(),
            total_peptides: analysis.proteomes[organism].peptides_for(protein),
        });
    }

    Ok(SummaryRow {
        peptide: peptide.to_string(),
        hits: Pair::new(
            hits.a.expect("both organisms were joined"),
            hits.b.expect("both organisms were joined"),
        ),
    })
}
