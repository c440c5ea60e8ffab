//! Parse a pepdigest-style cleavage report into peptide records
//!
//! The report interleaves `# Sequence: <accession>` headers with tabular
//! peptide rows (start, end, molecular weight, the two terminal residues,
//! and the cleaved sequence). Only the accession and sequence are kept;
//! positions and masses are ignored.

use crate::proteome::{Organism, PeptideRecord};
use std::fmt;
use std::iter::Peekable;
use std::str::Lines;
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// Report contained no records at all
    Empty,
    /// A peptide row appeared before any `# Sequence:` header
    MissingProtein,
    /// A `# Sequence:` header without an accession
    MissingAccession,
    /// A peptide row missing one of its required fields
    MissingField(&'static str),
    /// A peptide sequence containing non-residue characters
    InvalidSequence(String),
}

/// Error raised while parsing a digest report. The report is rejected as a
/// whole; a partial record set is never returned.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub line: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Empty => write!(f, "digest report contains no peptide records"),
            ErrorKind::MissingProtein => write!(
                f,
                "peptide row before any sequence header at line {}",
                self.line
            ),
            ErrorKind::MissingAccession => {
                write!(f, "sequence header without accession at line {}", self.line)
            }
            ErrorKind::MissingField(field) => {
                write!(f, "peptide row missing `{}` at line {}", field, self.line)
            }
            ErrorKind::InvalidSequence(seq) => {
                write!(f, "invalid peptide sequence `{}` at line {}", seq, self.line)
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub struct DigestParser<'s> {
    iter: Peekable<Lines<'s>>,
    organism: Organism,
    line: usize,
}

impl<'s> DigestParser<'s> {
    pub fn new(input: &'s str, organism: Organism) -> DigestParser<'s> {
        DigestParser {
            iter: input.lines().peekable(),
            organism,
            line: 0,
        }
    }

    fn err(&self, kind: ErrorKind) -> ParseError {
        ParseError {
            kind,
            line: self.line,
        }
    }

    fn next(&mut self) -> Option<&'s str> {
        let n = self.iter.next();
        if n.is_some() {
            self.line += 1;
        }
        n
    }

    /// Accession from a `# Sequence: <accession> from: 1 to: N` header
    fn parse_header(&self, line: &'s str) -> Result<&'s str, ParseError> {
        line.strip_prefix("# Sequence:")
            .expect("caller checked prefix")
            .split_ascii_whitespace()
            .next()
            .ok_or_else(|| self.err(ErrorKind::MissingAccession))
    }

    /// Parse one peptide row. Rows lead with three numeric fields, then the
    /// two terminal residues, then the cleaved sequence; a row that leads
    /// with a number but lacks any later field is structurally malformed.
    fn parse_peptide(&self, line: &'s str) -> Result<&'s str, ParseError> {
        let mut fields = line.split_ascii_whitespace();
        // start field was already sniffed as numeric by the caller
        let _ = fields.next();
        for name in ["end", "mol_weight"] {
            fields
                .next()
                .filter(|f| f.parse::<f64>().is_ok())
                .ok_or_else(|| self.err(ErrorKind::MissingField(name)))?;
        }
        for name in ["cterm", "nterm"] {
            fields
                .next()
                .filter(|f| f.len() == 1)
                .ok_or_else(|| self.err(ErrorKind::MissingField(name)))?;
        }
        let sequence = fields
            .next()
            .ok_or_else(|| self.err(ErrorKind::MissingField("sequence")))?;

        if !sequence.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(self.err(ErrorKind::InvalidSequence(sequence.into())));
        }
        Ok(sequence)
    }

    pub fn parse(mut self) -> Result<Vec<PeptideRecord>, ParseError> {
        let mut records = Vec::new();
        let mut protein: Option<Arc<String>> = None;

        while let Some(line) = self.next() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("# Sequence:") {
                let accession = self.parse_header(trimmed)?;
                protein = Some(Arc::new(accession.to_string()));
            } else if trimmed
                .split_ascii_whitespace()
                .next()
                .map(|f| f.parse::<f64>().is_ok())
                .unwrap_or(false)
            {
                // Numeric lead-in marks a peptide row; everything else in the
                // report (comments, column headers, prose) is skipped
                let sequence = self.parse_peptide(trimmed)?;
                let protein = protein
                    .clone()
                    .ok_or_else(|| self.err(ErrorKind::MissingProtein))?;
                records.push(PeptideRecord {
                    protein,
                    peptide: sequence.to_string(),
                    organism: self.organism,
                });
            }
        }

        if records.is_empty() {
            return Err(self.err(ErrorKind::Empty));
        }
        Ok(records)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const REPORT: &str = "\
########################################
# Program: pepdigest
########################################

# Sequence: A0A087WPF7     from: 1   to: 1261
# HitCount: 2
#  Complete digestion with Trypsin yields 2 fragments

    Start     End    Mol_Weight  Cterm   Nterm   Sequence
       57      78    2541.862    K       E       EDNGKPPSSAPSR
        1      56    6200.110    .       K       MADEEKLPPGWEK

# Sequence: Q9XYZ1     from: 1   to: 40

        1      12    1320.550    K       .       SSGRVYYFNHIK
";

    #[test]
    fn parses_records_in_order() {
        let records = DigestParser::new(REPORT, Organism::A).parse().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].protein.as_str(), "A0A087WPF7");
        assert_eq!(records[0].peptide, "EDNGKPPSSAPSR");
        assert_eq!(records[1].peptide, "MADEEKLPPGWEK");
        assert_eq!(records[2].protein.as_str(), "Q9XYZ1");
        assert_eq!(records[2].peptide, "SSGRVYYFNHIK");
        assert!(records.iter().all(|r| r.organism == Organism::A));
    }

    #[test]
    fn rejects_empty_report() {
        let err = DigestParser::new("", Organism::A).parse().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Empty);

        let err = DigestParser::new("# Program: pepdigest\n", Organism::B)
            .parse()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Empty);
    }

    #[test]
    fn rejects_peptide_before_header() {
        let report = "    1    12    1320.550    K    .    SSGRVYYFNHIK\n";
        let err = DigestParser::new(report, Organism::A).parse().unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingProtein);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn rejects_truncated_row() {
        let report = "\
# Sequence: P1 from: 1 to: 10
    1    12    1320.550
";
        let err = DigestParser::new(report, Organism::A).parse().unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingField("cterm"));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn rejects_lowercase_sequence() {
        let report = "\
# Sequence: P1 from: 1 to: 10
    1    12    1320.550    K    .    ssgr
";
        let err = DigestParser::new(report, Organism::A).parse().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidSequence(_)));
    }

    #[test]
    fn identifiers_taken_verbatim() {
        // no length or composition filtering, 1-residue peptides included
        let report = "\
# Sequence: sp|P12345|NAME from: 1 to: 2
    1    1    100.0    K    .    K
";
        let records = DigestParser::new(report, Organism::B).parse().unwrap();
        assert_eq!(records[0].protein.as_str(), "sp|P12345|NAME");
        assert_eq!(records[0].peptide, "K");
    }
}
