use pepsieve_core::digest::DigestParser;
use pepsieve_core::fasta::Metadata;
use pepsieve_core::overlap::Analysis;
use pepsieve_core::proteome::{Organism, Pair, ProteomeDataset};
use pepsieve_core::screen::{screen, ResultRow};
use pepsieve_core::{burden, precursor};

const CANDIDA_DIGEST: &str = "\
########################################
# Program: pepdigest
########################################

# Sequence: A0A1D8PCA8     from: 1   to: 60

    Start     End    Mol_Weight  Cterm   Nterm   Sequence
        1      13    1478.500    K       .       CQGTFSPEDNSIK
       14      20     800.900    K       C       STNNDLK
       21      27     812.400    R       S       GGGTPSR

# Sequence: Q5A8L8     from: 1   to: 30

        1       7     754.300    K       .       VVDLMAK
        8      14     790.200    K       V       GGGTPSR
";

const MOUSE_DIGEST: &str = "\
# Sequence: P16858     from: 1   to: 40

    Start     End    Mol_Weight  Cterm   Nterm   Sequence
        1      13    1478.500    K       .       CQGTFSPEDNSIK
       14      22    1020.100    R       C       LVINGNPITR

# Sequence: P99999     from: 1   to: 20

        1       9     990.000    K       .       TGQAPGYSK
";

const CANDIDA_FASTA: &str = "\
>A0A1D8PCA8 Glucagon-like peptide OS=Candida albicans OX=237561 GN=GLP1
MCQGTFSPEDNSIKSTNNDLKGGGTPSR
>Q5A8L8 Cell wall protein OS=Candida albicans OX=237561
MVVDLMAKGGGTPSR
";

const MOUSE_FASTA: &str = "\
>sp|P16858|G3P_MOUSE Glyceraldehyde-3-phosphate dehydrogenase OS=Mus musculus OX=10090 GN=Gapdh
MCQGTFSPEDNSIKLVINGNPITR
>sp|P99999|TEST_MOUSE Test protein OS=Mus musculus OX=10090 GN=Tst
MTGQAPGYSK
";

fn build_analysis() -> Analysis {
    let candida = ProteomeDataset::new(
        Organism::A,
        "candida",
        DigestParser::new(CANDIDA_DIGEST, Organism::A).parse().unwrap(),
    );
    let mouse = ProteomeDataset::new(
        Organism::B,
        "mouse",
        DigestParser::new(MOUSE_DIGEST, Organism::B).parse().unwrap(),
    );
    Analysis::intersect(candida, mouse)
}

#[test]
fn full_pipeline() {
    let analysis = build_analysis();

    // candida: GGGTPSR occurs twice within the organism, so it is not
    // unique there and never reaches the cross-organism pool
    let summary_a = analysis.proteomes.a.summary();
    assert_eq!(summary_a.peptides, 5);
    assert_eq!(summary_a.proteins, 2);
    assert_eq!(summary_a.unique_peptides, 3);

    let summary_b = analysis.proteomes.b.summary();
    assert_eq!(summary_b.peptides, 3);
    assert_eq!(summary_b.unique_peptides, 3);

    // the only cross-organism collision
    assert_eq!(analysis.shared.len(), 1);
    assert_eq!(analysis.shared[0].sequence, "CQGTFSPEDNSIK");
    assert_eq!(
        analysis.impacted.a,
        vec![std::sync::Arc::new("A0A1D8PCA8".to_string())]
    );
    assert_eq!(
        analysis.impacted.b,
        vec![std::sync::Arc::new("P16858".to_string())]
    );

    // A0A1D8PCA8 and P16858 each contribute one shared peptide, below the
    // two-peptide threshold for the burden table
    let burdens = burden::analyze(&analysis).unwrap();
    assert!(burdens.is_empty());
}

#[test]
fn analysis_survives_persistence() {
    let analysis = build_analysis();
    let json = serde_json::to_string(&analysis).unwrap();
    let reloaded: Analysis = serde_json::from_str(&json).unwrap();

    assert_eq!(reloaded.shared.len(), analysis.shared.len());
    assert_eq!(reloaded.shared[0].sequence, "CQGTFSPEDNSIK");
    assert_eq!(reloaded.proteomes.a.unique(), analysis.proteomes.a.unique());
    assert_eq!(reloaded.proteomes.b.total, analysis.proteomes.b.total);
    assert_eq!(
        burden::analyze(&reloaded).unwrap().len(),
        burden::analyze(&analysis).unwrap().len()
    );
}

#[test]
fn screening_after_reload() {
    let analysis = build_analysis();
    let json = serde_json::to_string(&analysis).unwrap();
    let reloaded: Analysis = serde_json::from_str(&json).unwrap();

    let metadata = Pair::new(
        Metadata::parse(CANDIDA_FASTA).unwrap(),
        Metadata::parse(MOUSE_FASTA).unwrap(),
    );

    let rows = vec![
        ResultRow {
            precursor: "_C[Carbamidomethyl (C)]QGTFSPEDNSIK_.2".into(),
            fields: vec!["sample1".into(), "1042.7".into()],
        },
        ResultRow {
            precursor: "_LVINGNPITR_.2".into(),
            fields: vec!["sample1".into(), "534.3".into()],
        },
        ResultRow {
            precursor: "not-a-precursor".into(),
            fields: vec!["sample1".into(), "0.0".into()],
        },
    ];

    let screened = screen(rows, &reloaded, &metadata).unwrap();

    // only the shared peptide conflicts; LVINGNPITR is mouse-unique
    assert_eq!(screened.conflicts.len(), 1);
    assert_eq!(screened.conflicts[0].peptide, "CQGTFSPEDNSIK");
    assert_eq!(screened.conflicts[0].row.fields[1], "1042.7");

    assert_eq!(screened.summary.len(), 1);
    let row = &screened.summary[0];
    assert_eq!(row.hits.a.protein.as_str(), "A0A1D8PCA8");
    assert_eq!(row.hits.a.gene.as_deref(), Some("GLP1"));
    assert_eq!(row.hits.a.description, "Glucagon-like peptide");
    assert_eq!(row.hits.a.total_peptides, 3);
    assert_eq!(row.hits.b.protein.as_str(), "P16858");
    assert_eq!(row.hits.b.gene.as_deref(), Some("Gapdh"));
    assert_eq!(row.hits.b.total_peptides, 2);

    // the malformed row is reported, not dropped silently
    assert_eq!(screened.errors.len(), 1);
}

#[test]
fn normalizer_round_trips_digest_sequences() {
    let records = DigestParser::new(CANDIDA_DIGEST, Organism::A).parse().unwrap();
    for record in &records {
        let wrapped = format!("_{}_", record.peptide);
        assert_eq!(precursor::normalize(&wrapped).unwrap(), record.peptide);
    }
}
