use chiscore::core::energy::lookup::BoundaryPolicy;

/// Built-in values used when neither the command line nor the config file sets them.
pub struct DefaultsConfig {
    pub output_dir: &'static str,
    pub write_summary: bool,
    /// Boundary policy of the `lookup` subcommand.
    pub single_lookup_boundary: BoundaryPolicy,
    pub comparison_file: &'static str,
    pub baseline_energies_file: &'static str,
    pub alternative_energies_file: &'static str,
    pub summary_file: &'static str,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: "chiscore_results",
            write_summary: true,
            single_lookup_boundary: BoundaryPolicy::ClosedUpper,
            comparison_file: "comparison.csv",
            baseline_energies_file: "baseline_energies.csv",
            alternative_energies_file: "alternative_energies.csv",
            summary_file: "summary.csv",
        }
    }
}
