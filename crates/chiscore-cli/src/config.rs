pub mod defaults;

use self::defaults::DefaultsConfig;
use crate::cli::{AssignArgs, BoundaryChoice, CompareArgs, DeltaChoice, JoinChoice, PolicyArgs};
use crate::error::{CliError, Result};
use chiscore::core::energy::lookup::{BoundaryPolicy, FallbackPolicy};
use chiscore::core::models::observation::Source;
use chiscore::engine::config as core_config;
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialInputsConfig {
    baseline_dir: Option<PathBuf>,
    alternative_dir: Option<PathBuf>,
    baseline_suffix: Option<String>,
    alternative_suffix: Option<String>,
    energy_tables: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialLookupConfig {
    boundary: Option<BoundaryChoice>,
    default_maximum: Option<bool>,
    fallback_value: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialComparisonConfig {
    join: Option<JoinChoice>,
    delta: Option<DeltaChoice>,
    multi_conformer_only: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialOutputConfig {
    dir: Option<PathBuf>,
    summary: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    inputs: Option<PartialInputsConfig>,
    lookup: Option<PartialLookupConfig>,
    comparison: Option<PartialComparisonConfig>,
    output: Option<PartialOutputConfig>,
}

/// Where `compare` writes its CSV files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub write_summary: bool,
}

/// Resolves the lookup policy from command-line overrides, the `[lookup]` section and
/// `default_boundary`.
///
/// A fallback value on its own replaces the table maximum.
fn resolve_policy(
    args: &PolicyArgs,
    file: Option<&PartialLookupConfig>,
    default_boundary: BoundaryPolicy,
) -> (BoundaryPolicy, FallbackPolicy) {
    let boundary = args
        .boundary
        .or(file.and_then(|f| f.boundary))
        .map(Into::into)
        .unwrap_or(default_boundary);

    let fallback = match args.fallback_value {
        Some(value) => FallbackPolicy::fixed(value),
        None => {
            let fallback_value = file.and_then(|f| f.fallback_value);
            FallbackPolicy {
                default_maximum: file
                    .and_then(|f| f.default_maximum)
                    .unwrap_or(fallback_value.is_none()),
                fallback_value,
            }
        }
    };
    (boundary, fallback)
}

/// Lookup policy of the `lookup` subcommand, which takes no config file.
pub fn single_lookup_policy(args: &PolicyArgs) -> (BoundaryPolicy, FallbackPolicy) {
    resolve_policy(args, None, DefaultsConfig::default().single_lookup_boundary)
}

fn required(file_key: &str, flag: &str) -> CliError {
    CliError::Config(format!(
        "A value for '{}' is required either in the config file or via '{}'.",
        file_key, flag
    ))
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the config file if one was given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_compare(
        mut self,
        args: &CompareArgs,
    ) -> Result<(core_config::CompareConfig, OutputSettings)> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let inputs = self.inputs.take().unwrap_or_default();
        let comparison = self.comparison.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();
        let (boundary, fallback) =
            resolve_policy(&args.policy, self.lookup.as_ref(), BoundaryPolicy::default());

        let baseline_dir = args
            .baseline_dir
            .clone()
            .or(inputs.baseline_dir)
            .ok_or_else(|| required("inputs.baseline-dir", "--baseline-dir"))?;
        let alternative_dir = args
            .alternative_dir
            .clone()
            .or(inputs.alternative_dir)
            .ok_or_else(|| required("inputs.alternative-dir", "--alternative-dir"))?;
        let energy_tables = args
            .energy_tables
            .clone()
            .or(inputs.energy_tables)
            .ok_or_else(|| required("inputs.energy-tables", "--energy-tables"))?;

        let mut builder = core_config::CompareConfigBuilder::new()
            .baseline_dir(baseline_dir)
            .alternative_dir(alternative_dir)
            .energy_table_dir(energy_tables)
            .boundary(boundary)
            .fallback(fallback)
            .multi_conformer_only(
                args.multi_conformer_only || comparison.multi_conformer_only.unwrap_or(false),
            );
        if let Some(suffix) = args.baseline_suffix.clone().or(inputs.baseline_suffix) {
            builder = builder.baseline_suffix(&suffix);
        }
        if let Some(suffix) = args.alternative_suffix.clone().or(inputs.alternative_suffix) {
            builder = builder.alternative_suffix(&suffix);
        }
        if let Some(join) = args.join.or(comparison.join) {
            builder = builder.join(join.into());
        }
        if let Some(delta) = args.delta.or(comparison.delta) {
            builder = builder.delta_convention(delta.into());
        }

        let config = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;
        let output = OutputSettings {
            dir: args
                .output_dir
                .clone()
                .or(output.dir)
                .unwrap_or_else(|| PathBuf::from(defaults.output_dir)),
            write_summary: !args.no_summary && output.summary.unwrap_or(defaults.write_summary),
        };
        Ok((config, output))
    }

    /// Builds the assignment config. Without `--input-dir`, the `[inputs]` directory and
    /// suffix of the chosen source are used.
    pub fn merge_assign(mut self, args: &AssignArgs) -> Result<core_config::AssignConfig> {
        self.apply_set_values(&args.set_values)?;

        let inputs = self.inputs.take().unwrap_or_default();
        let (boundary, fallback) =
            resolve_policy(&args.policy, self.lookup.as_ref(), BoundaryPolicy::default());

        let source = Source::from(args.source);
        let (file_dir, file_suffix, dir_key) = match source {
            Source::Baseline => (
                inputs.baseline_dir,
                inputs.baseline_suffix,
                "inputs.baseline-dir",
            ),
            Source::Alternative => (
                inputs.alternative_dir,
                inputs.alternative_suffix,
                "inputs.alternative-dir",
            ),
        };

        let input_dir = args
            .input_dir
            .clone()
            .or(file_dir)
            .ok_or_else(|| required(dir_key, "--input-dir"))?;
        let energy_tables = args
            .energy_tables
            .clone()
            .or(inputs.energy_tables)
            .ok_or_else(|| required("inputs.energy-tables", "--energy-tables"))?;

        let mut builder = core_config::AssignConfigBuilder::new()
            .input_dir(input_dir)
            .source(source)
            .energy_table_dir(energy_tables)
            .boundary(boundary)
            .fallback(fallback);
        if let Some(suffix) = args.suffix.clone().or(file_suffix) {
            builder = builder.suffix(&suffix);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();
            let value_str = value_str.trim();

            match key {
                "inputs.baseline-dir" => {
                    self.inputs_mut().baseline_dir = Some(PathBuf::from(value_str));
                }
                "inputs.alternative-dir" => {
                    self.inputs_mut().alternative_dir = Some(PathBuf::from(value_str));
                }
                "inputs.baseline-suffix" => {
                    self.inputs_mut().baseline_suffix = Some(value_str.to_string());
                }
                "inputs.alternative-suffix" => {
                    self.inputs_mut().alternative_suffix = Some(value_str.to_string());
                }
                "inputs.energy-tables" => {
                    self.inputs_mut().energy_tables = Some(PathBuf::from(value_str));
                }
                "lookup.boundary" => {
                    self.lookup_mut().boundary = Some(parse_choice(key, value_str)?);
                }
                "lookup.default-maximum" => {
                    self.lookup_mut().default_maximum =
                        Some(parse_value(key, value_str, "boolean")?);
                }
                "lookup.fallback-value" => {
                    self.lookup_mut().fallback_value =
                        Some(parse_value(key, value_str, "float")?);
                }
                "comparison.join" => {
                    self.comparison_mut().join = Some(parse_choice(key, value_str)?);
                }
                "comparison.delta" => {
                    self.comparison_mut().delta = Some(parse_choice(key, value_str)?);
                }
                "comparison.multi-conformer-only" => {
                    self.comparison_mut().multi_conformer_only =
                        Some(parse_value(key, value_str, "boolean")?);
                }
                "output.dir" => {
                    self.output_mut().dir = Some(PathBuf::from(value_str));
                }
                "output.summary" => {
                    self.output_mut().summary = Some(parse_value(key, value_str, "boolean")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn inputs_mut(&mut self) -> &mut PartialInputsConfig {
        self.inputs.get_or_insert_with(Default::default)
    }

    fn lookup_mut(&mut self) -> &mut PartialLookupConfig {
        self.lookup.get_or_insert_with(Default::default)
    }

    fn comparison_mut(&mut self) -> &mut PartialComparisonConfig {
        self.comparison.get_or_insert_with(Default::default)
    }

    fn output_mut(&mut self) -> &mut PartialOutputConfig {
        self.output.get_or_insert_with(Default::default)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn parse_choice<T: ValueEnum>(key: &str, value: &str) -> Result<T> {
    T::from_str(value, true)
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use chiscore::engine::config::{DeltaConvention, JoinGranularity};
    use clap::Parser;
    use once_cell::sync::Lazy;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    static TEST_DIR: Lazy<TempDir> = Lazy::new(|| tempdir().expect("Failed to create temp dir"));

    fn write_config_file(name: &str, content: &str) -> PathBuf {
        let file_path = TEST_DIR.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn compare_args(extra: &[&str]) -> CompareArgs {
        let mut args = vec!["chiscore", "compare"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Compare(args) => args,
            _ => panic!("Expected 'compare' subcommand"),
        }
    }

    fn assign_args(extra: &[&str]) -> AssignArgs {
        let mut args = vec!["chiscore", "assign", "-o", "out.csv"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Assign(args) => args,
            _ => panic!("Expected 'assign' subcommand"),
        }
    }

    const FULL_CONFIG: &str = r#"
        [inputs]
        baseline-dir = "data/rotamers"
        alternative-dir = "data/qfit"
        energy-tables = "data/energy"

        [lookup]
        boundary = "closed-upper"

        [comparison]
        join = "alt-location"
        delta = "baseline-minus-alternative" # may be overridden

        [output]
        dir = "results"
        summary = false
    "#;

    #[test]
    fn file_values_fill_in_missing_arguments() {
        let path = write_config_file("full.toml", FULL_CONFIG);
        let args = compare_args(&[]);
        let (config, output) = PartialConfig::from_file(&path)
            .unwrap()
            .merge_compare(&args)
            .unwrap();

        assert_eq!(config.baseline.dir, PathBuf::from("data/rotamers"));
        assert_eq!(config.energy_table_dir, PathBuf::from("data/energy"));
        assert_eq!(config.comparison.lookup.boundary, BoundaryPolicy::ClosedUpper);
        assert_eq!(config.comparison.join, JoinGranularity::AltLocation);
        assert_eq!(
            config.comparison.delta_convention,
            DeltaConvention::BaselineMinusAlternative
        );
        assert!(config.comparison.lookup.fallback.default_maximum);
        assert_eq!(output.dir, PathBuf::from("results"));
        assert!(!output.write_summary);
    }

    #[test]
    fn cli_args_override_set_values_which_override_file() {
        let path = write_config_file("override.toml", FULL_CONFIG);
        let args = compare_args(&[
            "-b",
            "cli/rotamers",
            "--boundary",
            "strict-interior",
            "-S",
            "inputs.baseline-dir=set/rotamers",
            "-S",
            "inputs.alternative-dir=set/qfit",
            "-S",
            "comparison.delta=alternative-minus-baseline",
        ]);
        let (config, _) = PartialConfig::from_file(&path)
            .unwrap()
            .merge_compare(&args)
            .unwrap();

        assert_eq!(config.baseline.dir, PathBuf::from("cli/rotamers"));
        assert_eq!(config.alternative.dir, PathBuf::from("set/qfit"));
        assert_eq!(
            config.comparison.lookup.boundary,
            BoundaryPolicy::StrictInterior
        );
        assert_eq!(
            config.comparison.delta_convention,
            DeltaConvention::AlternativeMinusBaseline
        );
    }

    #[test]
    fn defaults_apply_without_config_file() {
        let args = compare_args(&["-b", "rot", "-a", "qfit", "-e", "energy"]);
        let (config, output) = PartialConfig::load(None)
            .unwrap()
            .merge_compare(&args)
            .unwrap();

        assert_eq!(
            config.comparison,
            core_config::ComparisonConfig::default()
        );
        assert_eq!(output.dir, PathBuf::from("chiscore_results"));
        assert!(output.write_summary);
    }

    #[test]
    fn missing_required_input_returns_config_error() {
        let args = compare_args(&["-b", "rot", "-a", "qfit"]);
        let result = PartialConfig::default().merge_compare(&args);
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("energy-tables")),
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn fallback_value_from_file_replaces_table_maximum() {
        let path = write_config_file(
            "fallback.toml",
            "[lookup]\nfallback-value = 2.5\n",
        );
        let args = compare_args(&["-b", "rot", "-a", "qfit", "-e", "energy"]);
        let (config, _) = PartialConfig::from_file(&path)
            .unwrap()
            .merge_compare(&args)
            .unwrap();
        assert_eq!(config.comparison.lookup.fallback, FallbackPolicy::fixed(2.5));
    }

    #[test]
    fn disabled_maximum_without_value_is_rejected() {
        let args = compare_args(&[
            "-b",
            "rot",
            "-a",
            "qfit",
            "-e",
            "energy",
            "-S",
            "lookup.default-maximum=false",
        ]);
        let result = PartialConfig::default().merge_compare(&args);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        for bad in [
            "comparison.join",
            "comparison.join=sideways",
            "lookup.fallback-value=high",
            "unknown.key=1",
        ] {
            let args = compare_args(&["-b", "rot", "-a", "qfit", "-e", "energy", "-S", bad]);
            let result = PartialConfig::default().merge_compare(&args);
            assert!(
                matches!(result, Err(CliError::Config(_))),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn unknown_file_keys_are_parse_errors() {
        let path = write_config_file("unknown.toml", "[lookup]\nmode = \"fast\"\n");
        assert!(matches!(
            PartialConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn assign_uses_inputs_of_the_chosen_source() {
        let path = write_config_file("assign.toml", FULL_CONFIG);
        let args = assign_args(&["-s", "alternative"]);
        let config = PartialConfig::from_file(&path)
            .unwrap()
            .merge_assign(&args)
            .unwrap();

        assert_eq!(config.source, Source::Alternative);
        assert_eq!(config.input.dir, PathBuf::from("data/qfit"));
        assert_eq!(
            config.input.suffix,
            chiscore::core::io::observations::ALTERNATIVE_SUFFIX
        );
        assert_eq!(config.lookup.boundary, BoundaryPolicy::ClosedUpper);
    }

    #[test]
    fn single_lookup_defaults_to_closed_upper_and_table_maximum() {
        let (boundary, fallback) = single_lookup_policy(&PolicyArgs::default());
        assert_eq!(boundary, BoundaryPolicy::ClosedUpper);
        assert_eq!(fallback, FallbackPolicy::default());

        let args = PolicyArgs {
            boundary: Some(BoundaryChoice::StrictInterior),
            fallback_value: Some(0.0),
        };
        let (boundary, fallback) = single_lookup_policy(&args);
        assert_eq!(boundary, BoundaryPolicy::StrictInterior);
        assert_eq!(fallback, FallbackPolicy::fixed(0.0));
    }
}
