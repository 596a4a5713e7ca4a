use super::loading::{self, UnparsedFile};
use crate::core::models::observation::Source;
use crate::engine::comparator::{self, ComparisonReport};
use crate::engine::config::{CompareConfig, JoinGranularity};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct CompareResult {
    pub report: ComparisonReport,
    pub baseline_files: usize,
    pub alternative_files: usize,
    pub unparsed: Vec<UnparsedFile>,
    pub table_count: usize,
    pub ignored_table_files: Vec<PathBuf>,
}

#[instrument(skip_all, name = "compare_workflow")]
pub fn run(
    config: &CompareConfig,
    reporter: &ProgressReporter,
) -> Result<CompareResult, EngineError> {
    let tables = loading::load_energy_tables(&config.energy_table_dir, reporter)?;

    let baseline = loading::load_source(
        &config.baseline,
        Source::Baseline,
        Some(&config.alternative.suffix),
        "Reading baseline observations",
        reporter,
    )?;
    let alternative = loading::load_source(
        &config.alternative,
        Source::Alternative,
        None,
        "Reading alternative observations",
        reporter,
    )?;

    reporter.report(Progress::PhaseStart { name: "Comparing" });
    let report = comparator::compare(
        &baseline.observations,
        &alternative.observations,
        &tables.tables,
        &config.comparison,
    )?;
    reporter.report(Progress::PhaseFinish);

    let stats = &report.stats;
    for key in &stats.skipped_partitions {
        warn!("No energy table for {}; its observations were skipped.", key);
    }
    if stats.requested_join == JoinGranularity::AltLocation
        && stats.effective_join == JoinGranularity::Residue
    {
        warn!(
            "Alt-location join requested but not both sources carry alt-location tags; \
             joined per residue instead."
        );
        reporter.report(Progress::Message(
            "Alt-location tags missing in one source; joined per residue.".to_string(),
        ));
    }
    if stats.alternative.filtered_out > 0 {
        info!(
            "Multi-conformer filter removed {} alternative observations.",
            stats.alternative.filtered_out
        );
    }
    info!(
        "Compared {} baseline and {} alternative assignments: {} records ({} / {} unmatched).",
        stats.baseline.assigned,
        stats.alternative.assigned,
        stats.records,
        stats.baseline.unmatched,
        stats.alternative.unmatched
    );

    let mut unparsed = baseline.unparsed;
    unparsed.extend(alternative.unparsed);

    Ok(CompareResult {
        baseline_files: baseline.files,
        alternative_files: alternative.files,
        unparsed,
        table_count: tables.tables.len(),
        ignored_table_files: tables.ignored_files,
        report,
    })
}
