//! Protein metadata from FASTA description lines
//!
//! Only headers are consumed; sequence data is skipped. Headers follow the
//! UniProt convention:
//!
//! ```text
//! >sp|P12345|GAPDH_MOUSE Glyceraldehyde-3-phosphate dehydrogenase OS=Mus musculus OX=10090 GN=Gapdh PE=1 SV=2
//! ```
//!
//! yielding accession `P12345`, the free-text description before ` OS=`,
//! and the optional `GN=` gene symbol.

use fnv::FnvHashMap;
use regex::Regex;
use std::fmt;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FastaError {
    /// Header line carrying no identifier at all
    MissingIdentifier { line: usize },
    /// Header whose description does not follow the `... OS=` convention
    MissingDescription { line: usize },
}

impl fmt::Display for FastaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIdentifier { line } => {
                write!(f, "fasta header without identifier at line {}", line)
            }
            Self::MissingDescription { line } => {
                write!(f, "fasta header without description at line {}", line)
            }
        }
    }
}

impl std::error::Error for FastaError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProteinMeta {
    pub description: String,
    pub gene: Option<String>,
}

/// Accession -> metadata for one organism's sequence database
#[derive(Debug)]
pub struct Metadata {
    entries: FnvHashMap<String, ProteinMeta>,
}

impl Metadata {
    /// Parse FASTA text, keeping one metadata entry per header
    pub fn parse(contents: &str) -> Result<Metadata, FastaError> {
        let accession_re = Regex::new(r"^(?:sp|tr)\|([A-Z0-9-]+)").unwrap();
        let description_re = Regex::new(r"^\S+\s+(.+?)\s+OS=").unwrap();
        let gene_re = Regex::new(r"\bGN=(\S+)").unwrap();

        let mut entries = FnvHashMap::default();
        for (ix, line) in contents.lines().enumerate() {
            let header = match line.trim().strip_prefix('>') {
                Some(header) => header,
                None => continue,
            };
            let line = ix + 1;

            let id = header
                .split_ascii_whitespace()
                .next()
                .ok_or(FastaError::MissingIdentifier { line })?;
            let accession = accession_re
                .captures(id)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .unwrap_or(id);

            let description = description_re
                .captures(header)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or(FastaError::MissingDescription { line })?;

            // Not all entries carry a gene symbol
            let gene = gene_re
                .captures(header)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());

            entries.insert(accession.to_string(), ProteinMeta { description, gene });
        }

        Ok(Metadata { entries })
    }

    pub fn get(&self, accession: &str) -> Option<&ProteinMeta> {
        self.entries.get(accession)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
