use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "QM9 CLI - Parse QM9 molecule records, convert energies to eV and write extended XYZ files.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of worker threads for parsing.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every record matching a pattern into mol_NNNNNN.xyz files.
    ///
    /// A progress bar and a final summary are always shown. The per-molecule
    /// "Parsed file NNNNNN" lines are logged at INFO level; pass -v to see them.
    Convert(ConvertArgs),
    /// Parse a single record and print its atoms and properties.
    Inspect(InspectArgs),
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Glob pattern selecting the input records (e.g., 'QM9/*.xyz').
    #[arg(short, long, value_name = "PATTERN")]
    pub input: Option<String>,

    /// Directory receiving the converted files. Created if missing.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also write a CSV table of all converted molecules' properties.
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Exit with an error if any input file could not be converted.
    #[arg(long)]
    pub strict: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S output.directory=parsed
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to a raw QM9 record.
    #[arg(required = true, value_name = "PATH")]
    pub path: PathBuf,

    /// Print the molecule as extended XYZ instead of a table.
    #[arg(long)]
    pub xyz: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_convert_with_global_flags() {
        let cli = Cli::try_parse_from([
            "qm9", "-vv", "-j", "4", "convert", "-i", "QM9/*.xyz", "-o", "out", "-S",
            "output.summary=s.csv", "--strict",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert subcommand");
        };
        assert_eq!(args.input.as_deref(), Some("QM9/*.xyz"));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.set_values, ["output.summary=s.csv"]);
        assert!(args.strict);
    }

    #[test]
    fn convert_help_explains_how_to_see_per_molecule_lines() {
        let command = Cli::command();
        let convert = command.find_subcommand("convert").unwrap();
        let long_about = convert.get_long_about().unwrap().to_string();
        assert!(long_about.contains("Parsed file NNNNNN"));
        assert!(long_about.contains("pass -v"));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["qm9", "-q", "-v", "inspect", "a.xyz"]);
        assert!(result.is_err());
    }
}
