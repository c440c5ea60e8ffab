use clap::{Arg, Command, ValueHint};
use pepsieve_cli::input::Input;
use pepsieve_cli::runner::Runner;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("PEPSIEVE_LOG", "error,pepsieve=info"))
        .init();

    let parameters = Arg::new("parameters")
        .required(true)
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .help("Path to configuration parameters (JSON file)")
        .value_hint(ValueHint::FilePath);

    let output_directory = Arg::new("output_directory")
        .short('o')
        .long("output_directory")
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .help(
            "Path where analysis artifacts are written. Overrides the \
             directory specified in the configuration file.",
        )
        .value_hint(ValueHint::DirPath);

    let matches = Command::new("pepsieve")
        .version(clap::crate_version!())
        .about("Find tryptic peptides that cannot tell two organisms apart")
        .subcommand_required(true)
        .subcommand(
            Command::new("analyze")
                .about("Digest both proteomes' reports and compute the shared-peptide analysis")
                .arg(parameters.clone())
                .arg(output_directory.clone()),
        )
        .subcommand(
            Command::new("screen")
                .about("Classify experimental identifications against a completed analysis")
                .arg(parameters)
                .arg(
                    Arg::new("results")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Path to tab-delimited experimental results")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(output_directory)
                .arg(
                    Arg::new("precursor_column")
                        .long("precursor-column")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Header of the column holding the raw precursor identifier \
                             (default: EG.PrecursorId)",
                        )
                        .value_hint(ValueHint::Other),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("analyze", matches)) => {
            let input = Input::from_arguments(matches)?;
            Runner::new(input.build()?)?.run_analysis()
        }
        Some(("screen", matches)) => {
            let results = matches
                .get_one::<String>("results")
                .expect("required results")
                .clone();
            let input = Input::from_arguments(matches)?;
            Runner::new(input.build()?)?.run_screen(&results)
        }
        _ => unreachable!("subcommand required"),
    }
}
