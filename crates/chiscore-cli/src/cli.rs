use chiscore::core::energy::lookup::BoundaryPolicy;
use chiscore::core::models::observation::Source;
use chiscore::engine::config::{DeltaConvention, JoinGranularity};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
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
    about = "chiscore - Knowledge-based chi-angle energies for rotamer extractions, and comparison of single-conformer against multi-conformer models.",
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

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assign energies to two rotamer extractions and compare the residues they share.
    Compare(CompareArgs),
    /// Assign energies to a single rotamer extraction.
    Assign(AssignArgs),
    /// Look up the energy of one angle in one table.
    Lookup(LookupArgs),
}

/// How an angle lying exactly on a bin edge is treated.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryChoice {
    /// Bins match `min < angle < max`.
    StrictInterior,
    /// Bins match `min < angle <= max`.
    ClosedUpper,
}

impl From<BoundaryChoice> for BoundaryPolicy {
    fn from(choice: BoundaryChoice) -> Self {
        match choice {
            BoundaryChoice::StrictInterior => BoundaryPolicy::StrictInterior,
            BoundaryChoice::ClosedUpper => BoundaryPolicy::ClosedUpper,
        }
    }
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum JoinChoice {
    /// Join on chain, residue, residue type and chi.
    Residue,
    /// Also require matching alt-location tags when both sources carry them.
    AltLocation,
}

impl From<JoinChoice> for JoinGranularity {
    fn from(choice: JoinChoice) -> Self {
        match choice {
            JoinChoice::Residue => JoinGranularity::Residue,
            JoinChoice::AltLocation => JoinGranularity::AltLocation,
        }
    }
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeltaChoice {
    AlternativeMinusBaseline,
    BaselineMinusAlternative,
}

impl From<DeltaChoice> for DeltaConvention {
    fn from(choice: DeltaChoice) -> Self {
        match choice {
            DeltaChoice::AlternativeMinusBaseline => DeltaConvention::AlternativeMinusBaseline,
            DeltaChoice::BaselineMinusAlternative => DeltaConvention::BaselineMinusAlternative,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceChoice {
    /// Single-conformer rotamer extraction.
    Baseline,
    /// Multi-conformer (qFit) rotamer extraction.
    Alternative,
}

impl From<SourceChoice> for Source {
    fn from(choice: SourceChoice) -> Self {
        match choice {
            SourceChoice::Baseline => Source::Baseline,
            SourceChoice::Alternative => Source::Alternative,
        }
    }
}

/// Energy lookup overrides shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Override how angles on a bin edge are matched.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub boundary: Option<BoundaryChoice>,

    /// Use this energy when no bin matches, instead of the table maximum.
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub fallback_value: Option<f64>,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Input Overrides ---
    /// Directory holding the single-conformer rotamer extraction files.
    #[arg(short, long, value_name = "DIR")]
    pub baseline_dir: Option<PathBuf>,

    /// Directory holding the multi-conformer rotamer extraction files.
    #[arg(short, long, value_name = "DIR")]
    pub alternative_dir: Option<PathBuf>,

    /// File name suffix identifying baseline files.
    #[arg(long, value_name = "SUFFIX")]
    pub baseline_suffix: Option<String>,

    /// File name suffix identifying alternative files.
    #[arg(long, value_name = "SUFFIX")]
    pub alternative_suffix: Option<String>,

    /// Directory of `RESIDUE_CHIn.csv` energy tables.
    #[arg(short, long, value_name = "DIR")]
    pub energy_tables: Option<PathBuf>,

    // --- Comparison Overrides ---
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Override which residue identity two observations must share.
    #[arg(long, value_enum, value_name = "GRANULARITY")]
    pub join: Option<JoinChoice>,

    /// Override the sign convention of energy and angle deltas.
    #[arg(long, value_enum, value_name = "CONVENTION")]
    pub delta: Option<DeltaChoice>,

    /// Keep only alternative observations that carry an alt-location tag.
    #[arg(long)]
    pub multi_conformer_only: bool,

    // --- Output ---
    /// Directory the result CSV files are written to.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip writing the per-table summary.
    #[arg(long)]
    pub no_summary: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S comparison.join=alt-location
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `assign` subcommand.
#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the rotamer extraction files.
    #[arg(short, long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Which extraction the input files come from.
    #[arg(short, long, value_enum, default_value_t = SourceChoice::Baseline)]
    pub source: SourceChoice,

    /// File name suffix identifying input files. Defaults to the suffix of the chosen source.
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Directory of `RESIDUE_CHIn.csv` energy tables.
    #[arg(short, long, value_name = "DIR")]
    pub energy_tables: Option<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Path for the output CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S lookup.boundary=closed-upper
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `lookup` subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Table name, e.g. SER_CHI1.
    #[arg(short, long, required = true, value_name = "RESIDUE_CHIn")]
    pub key: String,

    /// Chi angle in degrees; any value is wrapped into [0, 360).
    #[arg(short, long, required = true, allow_negative_numbers = true)]
    pub angle: f64,

    /// Directory of `RESIDUE_CHIn.csv` energy tables.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub energy_tables: PathBuf,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn compare_accepts_overrides_and_repeated_set_values() {
        let cli = Cli::parse_from([
            "chiscore",
            "-vv",
            "compare",
            "-b",
            "rot",
            "-a",
            "qfit",
            "--join",
            "alt-location",
            "--boundary",
            "closed-upper",
            "--fallback-value",
            "-1.5",
            "-S",
            "output.summary=false",
            "-S",
            "comparison.delta=baseline-minus-alternative",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Compare(args) = cli.command else {
            panic!("Expected 'compare' subcommand");
        };
        assert_eq!(args.baseline_dir, Some(PathBuf::from("rot")));
        assert_eq!(args.join, Some(JoinChoice::AltLocation));
        assert_eq!(args.policy.boundary, Some(BoundaryChoice::ClosedUpper));
        assert_eq!(args.policy.fallback_value, Some(-1.5));
        assert_eq!(args.set_values.len(), 2);
    }

    #[test]
    fn lookup_accepts_negative_angle() {
        let cli = Cli::parse_from([
            "chiscore", "lookup", "-k", "SER_CHI1", "-a", "-60", "-e", "tables",
        ]);
        let Commands::Lookup(args) = cli.command else {
            panic!("Expected 'lookup' subcommand");
        };
        assert_eq!(args.angle, -60.0);
        assert_eq!(args.key, "SER_CHI1");
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let args = ["chiscore", "-q", "-v", "lookup", "-k", "X", "-a", "1", "-e", "t"];
        let err = Cli::try_parse_from(args).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
