pub mod burden;
pub mod digest;
pub mod fasta;
pub mod overlap;
pub mod precursor;
pub mod proteome;
pub mod screen;

use proteome::{Organism, PeptideRecord};
use std::path::Path;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Digest(digest::ParseError),
    Fasta(fasta::FastaError),
    Json(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::Digest(e) => e.fmt(f),
            Self::Fasta(e) => e.fmt(f),
            Self::Json(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

/// Read and parse a digest report for one organism
pub fn read_digest<P: AsRef<Path>>(
    path: P,
    organism: Organism,
) -> Result<Vec<PeptideRecord>, Error> {
    let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
    digest::DigestParser::new(&contents, organism)
        .parse()
        .map_err(Error::Digest)
}

/// Read and parse protein metadata from a FASTA file
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<fasta::Metadata, Error> {
    let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
    fasta::Metadata::parse(&contents).map_err(Error::Fasta)
}

/// Deserialize a JSON file
pub fn read_json<P, T>(path: P) -> Result<T, Error>
where
    P: AsRef<Path>,
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
    serde_json::from_str(&contents).map_err(Error::Json)
}

/// Serialize a value to a JSON file
pub fn write_json<P, T>(path: P, value: &T) -> Result<(), Error>
where
    P: AsRef<Path>,
    T: serde::Serialize,
{
    let contents = serde_json::to_string(value).map_err(Error::Json)?;
    std::fs::write(path, contents).map_err(Error::Io)
}
