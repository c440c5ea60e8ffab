use crate::runner::Runner;
use anyhow::Context;
use pepsieve_core::burden::ProteinBurden;
use pepsieve_core::overlap::Analysis;
use pepsieve_core::proteome::Organism;
use pepsieve_core::screen::{OrganismHit, Screened};
use std::path::Path;

fn write_tsv(path: &Path, records: Vec<csv::ByteRecord>) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(vec![]);
    for record in records {
        wtr.write_byte_record(&record)?;
    }
    wtr.flush()?;
    let bytes = wtr.into_inner()?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write `{}`", path.display()))?;
    Ok(())
}

impl Runner {
    fn label(&self, organism: Organism) -> &str {
        &self.settings.organisms[organism].label
    }

    pub fn write_proteome_summary(&self, analysis: &Analysis) -> anyhow::Result<()> {
        let mut records = vec![csv::ByteRecord::from(vec![
            "species",
            "peptides",
            "proteins",
            "unique_peptides",
            "unique_proteins",
            "high_freq_peptides",
        ])];

        for (_, proteome) in analysis.proteomes.iter() {
            let summary = proteome.summary();
            let mut record = csv::ByteRecord::new();
            record.push_field(proteome.label.as_bytes());
            record.push_field(itoa::Buffer::new().format(summary.peptides).as_bytes());
            record.push_field(itoa::Buffer::new().format(summary.proteins).as_bytes());
            record.push_field(itoa::Buffer::new().format(summary.unique_peptides).as_bytes());
            record.push_field(itoa::Buffer::new().format(summary.unique_proteins).as_bytes());
            record.push_field(
                itoa::Buffer::new()
                    .format(summary.high_freq_peptides)
                    .as_bytes(),
            );
            records.push(record);
        }

        write_tsv(&self.make_path("proteome_summary.tsv"), records)
    }

    pub fn write_shared_peptides(&self, analysis: &Analysis) -> anyhow::Result<()> {
        let mut records = vec![csv::ByteRecord::from(vec!["peptide", "proteins"])];

        for shared in &analysis.shared {
            let proteins = shared
                .occurrences
                .iter()
                .map(|(protein, organism)| format!("{} ({})", protein, self.label(*organism)))
                .collect::<Vec<_>>()
                .join(";");

            let mut record = csv::ByteRecord::new();
            record.push_field(shared.sequence.as_bytes());
            record.push_field(proteins.as_bytes());
            records.push(record);
        }

        write_tsv(&self.make_path("shared_peptides.tsv"), records)
    }

    pub fn write_burden(&self, burdens: &[ProteinBurden]) -> anyhow::Result<()> {
        let mut records = vec![csv::ByteRecord::from(vec![
            "protein",
            "species",
            "shared_peptides",
            "total_peptides",
            "percent_shared",
        ])];

        for burden in burdens {
            let mut record = csv::ByteRecord::new();
            record.push_field(burden.protein.as_bytes());
            record.push_field(self.label(burden.organism).as_bytes());
            record.push_field(itoa::Buffer::new().format(burden.shared).as_bytes());
            record.push_field(itoa::Buffer::new().format(burden.total).as_bytes());
            record.push_field(ryu::Buffer::new().format(burden.fraction).as_bytes());
            records.push(record);
        }

        write_tsv(&self.make_path("burden.tsv"), records)
    }

    /// Conflicting rows verbatim, with the normalized peptide appended
    pub fn write_conflicts(&self, headers: &[String], screened: &Screened) -> anyhow::Result<()> {
        let mut header = csv::ByteRecord::new();
        for field in headers {
            header.push_field(field.as_bytes());
        }
        header.push_field(b"peptide");

        let mut records = vec![header];
        for conflict in &screened.conflicts {
            let mut record = csv::ByteRecord::new();
            for field in &conflict.row.fields {
                record.push_field(field.as_bytes());
            }
            record.push_field(conflict.peptide.as_bytes());
            records.push(record);
        }

        write_tsv(&self.make_path("conflicts.tsv"), records)
    }

    /// One row per distinct shared peptide observed in the experiment
    pub fn write_conflict_summary(&self, screened: &Screened) -> anyhow::Result<()> {
        let mut header = csv::ByteRecord::new();
        header.push_field(b"peptide");
        for organism in Organism::BOTH {
            let label = self.label(organism);
            for column in ["protein", "gene", "description", "total_peptides"] {
                header.push_field(format!("{}_{}", label, column).as_bytes());
            }
        }

        let push_hit = |record: &mut csv::ByteRecord, hit: &OrganismHit| {
            record.push_field(hit.protein.as_bytes());
            record.push_field(hit.gene.as_deref().unwrap_or("").as_bytes());
            record.push_field(hit.description.as_bytes());
            record.push_field(itoa::Buffer::new().format(hit.total_peptides).as_bytes());
        };

        let mut records = vec![header];
        for row in &screened.summary {
            let mut record = csv::ByteRecord::new();
            record.push_field(row.peptide.as_bytes());
            push_hit(&mut record, &row.hits.a);
            push_hit(&mut record, &row.hits.b);
            records.push(record);
        }

        write_tsv(&self.make_path("conflict_summary.tsv"), records)
    }
}
