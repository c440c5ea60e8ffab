use anyhow::{ensure, Context};
use clap::ArgMatches;
use pepsieve_core::proteome::Pair;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PRECURSOR_COLUMN: &str = "EG.PrecursorId";

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct OrganismSettings {
    /// Display name used in logs and report columns
    pub label: String,
    /// Path to the pepdigest report for this organism
    pub digest: String,
    /// Path to the FASTA file supplying gene/description metadata;
    /// only required for the screening phase
    pub fasta: Option<String>,
}

/// Run parameters - may include overrides or default values not set by the user
#[derive(Clone, Serialize, Debug)]
pub struct Settings {
    pub version: String,
    pub organisms: Pair<OrganismSettings>,
    pub output_directory: PathBuf,
    /// Header of the column holding the raw precursor identifier
    pub precursor_column: String,
}

/// Input parameters deserialized from the JSON parameter file
#[derive(Deserialize)]
pub struct Input {
    organisms: Pair<OrganismSettings>,
    output_directory: Option<String>,
    precursor_column: Option<String>,
}

impl Input {
    pub fn from_arguments(matches: &ArgMatches) -> anyhow::Result<Self> {
        let path = matches
            .get_one::<String>("parameters")
            .expect("required parameters");
        let mut input = Input::load(path)
            .with_context(|| format!("Failed to read parameters from `{}`", path))?;

        // Handle JSON configuration overrides
        if let Some(output_directory) = matches.get_one::<String>("output_directory") {
            log::trace!("overriding `output_directory` parameter.");
            input.output_directory = Some(output_directory.into());
        }
        if let Some(column) = matches
            .try_get_one::<String>("precursor_column")
            .ok()
            .flatten()
        {
            log::trace!("overriding `precursor_column` parameter.");
            input.precursor_column = Some(column.into());
        }

        Ok(input)
    }

    pub fn load<S: AsRef<std::path::Path>>(path: S) -> anyhow::Result<Self> {
        pepsieve_core::read_json(path).map_err(anyhow::Error::from)
    }

    pub fn build(self) -> anyhow::Result<Settings> {
        ensure!(
            !self.organisms.a.label.is_empty() && !self.organisms.b.label.is_empty(),
            "both organisms must carry a non-empty `label`"
        );
        ensure!(
            self.organisms.a.label != self.organisms.b.label,
            "organism labels must differ: `{}`",
            self.organisms.a.label
        );

        let output_directory = match self.output_directory {
            Some(path) => PathBuf::from(path),
            None => std::env::current_dir()?,
        };

        Ok(Settings {
            version: clap::crate_version!().into(),
            organisms: self.organisms,
            output_directory,
            precursor_column: self
                .precursor_column
                .unwrap_or_else(|| DEFAULT_PRECURSOR_COLUMN.into()),
        })
    }
}
