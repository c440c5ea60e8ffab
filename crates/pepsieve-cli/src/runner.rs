use crate::input::Settings;
use anyhow::Context;
use log::info;
use pepsieve_core::burden;
use pepsieve_core::overlap::Analysis;
use pepsieve_core::proteome::{Organism, Pair, ProteomeDataset};
use pepsieve_core::screen::{screen, ResultRow};
use std::path::PathBuf;
use std::time::Instant;

pub const ANALYSIS_FILE: &str = "analysis.json";

/// Screening was invoked before a completed intersection analysis
#[derive(Debug)]
pub struct PrerequisiteMissing {
    path: PathBuf,
}

impl std::fmt::Display for PrerequisiteMissing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no completed analysis at `{}` - run `pepsieve analyze` first",
            self.path.display()
        )
    }
}

impl std::error::Error for PrerequisiteMissing {}

pub struct Runner {
    pub settings: Settings,
    start: Instant,
}

impl Runner {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&settings.output_directory).with_context(|| {
            format!(
                "Failed to create output directory `{}`",
                settings.output_directory.display()
            )
        })?;
        Ok(Runner {
            settings,
            start: Instant::now(),
        })
    }

    pub fn make_path(&self, file: &str) -> PathBuf {
        self.settings.output_directory.join(file)
    }

    /// Phase one: parse both digests, intersect, analyze burden, persist.
    pub fn run_analysis(self) -> anyhow::Result<()> {
        let (a, b) = rayon::join(
            || self.load_proteome(Organism::A),
            || self.load_proteome(Organism::B),
        );
        let analysis = Analysis::intersect(a?, b?);
        let burdens = burden::analyze(&analysis)?;

        self.write_proteome_summary(&analysis)?;
        self.write_shared_peptides(&analysis)?;
        self.write_burden(&burdens)?;

        pepsieve_core::write_json(self.make_path(ANALYSIS_FILE), &analysis)
            .context("Failed to persist analysis")?;

        info!(
            "analysis finished in {:#?}: artifacts in `{}`",
            self.start.elapsed(),
            self.settings.output_directory.display()
        );
        Ok(())
    }

    fn load_proteome(&self, organism: Organism) -> anyhow::Result<ProteomeDataset> {
        let source = &self.settings.organisms[organism];
        let records = pepsieve_core::read_digest(&source.digest, organism)
            .with_context(|| format!("Failed to read digest report `{}`", source.digest))?;
        let dataset = ProteomeDataset::new(organism, source.label.as_str(), records);

        let summary = dataset.summary();
        info!(
            "{}: {} peptides from {} proteins ({} unique peptides across {} proteins)",
            dataset.label,
            summary.peptides,
            summary.proteins,
            summary.unique_peptides,
            summary.unique_proteins
        );
        Ok(dataset)
    }

    /// Phase two: reload the persisted analysis and classify result rows.
    pub fn run_screen(self, results: &str) -> anyhow::Result<()> {
        let path = self.make_path(ANALYSIS_FILE);
        if !path.exists() {
            return Err(PrerequisiteMissing { path }.into());
        }
        let analysis: Analysis = pepsieve_core::read_json(&path)
            .with_context(|| format!("Failed to load analysis from `{}`", path.display()))?;

        let metadata = Pair::new(
            self.load_metadata(Organism::A)?,
            self.load_metadata(Organism::B)?,
        );

        let (headers, rows) = self.read_results(results)?;
        let screened = screen(rows, &analysis, &metadata)
            .with_context(|| format!("Failed to screen `{}`", results))?;

        for error in &screened.errors {
            log::warn!("{}", error);
        }

        self.write_conflicts(&headers, &screened)?;
        self.write_conflict_summary(&screened)?;

        info!(
            "screening finished in {:#?}: {} conflicting rows, {} distinct shared peptides, {} row errors",
            self.start.elapsed(),
            screened.conflicts.len(),
            screened.summary.len(),
            screened.errors.len()
        );
        Ok(())
    }

    fn load_metadata(&self, organism: Organism) -> anyhow::Result<pepsieve_core::fasta::Metadata> {
        let source = &self.settings.organisms[organism];
        let fasta = source.fasta.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "screening requires a `fasta` path for organism `{}`",
                source.label
            )
        })?;
        pepsieve_core::read_fasta(fasta)
            .with_context(|| format!("Failed to read fasta `{}`", fasta))
    }

    fn read_results(&self, results: &str) -> anyhow::Result<(Vec<String>, Vec<ResultRow>)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_path(results)
            .with_context(|| format!("Failed to read results `{}`", results))?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|field| field.to_string())
            .collect();

        let column = &self.settings.precursor_column;
        let precursor_ix = headers
            .iter()
            .position(|header| header == column)
            .with_context(|| format!("results `{}` have no `{}` column", results, column))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(ResultRow {
                precursor: record
                    .get(precursor_ix)
                    .map(|field| field.to_string())
                    .unwrap_or_default(),
                fields: record.iter().map(|field| field.to_string()).collect(),
            });
        }
        Ok((headers, rows))
    }
}
