use crate::cli::CompareArgs;
use crate::config::PartialConfig;
use crate::config::defaults::DefaultsConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use chiscore::core::io::export;
use chiscore::engine::error::EngineError;
use chiscore::engine::progress::ProgressReporter;
use chiscore::workflows;
use tracing::{info, warn};

pub fn run(args: CompareArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let (config, output) = partial_config.merge_compare(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Comparing chi-angle energies...");
    info!("Invoking the comparison workflow...");
    let result = workflows::compare::run(&config, &reporter)?;
    let report = &result.report;
    let stats = &report.stats;

    std::fs::create_dir_all(&output.dir)?;
    let files = DefaultsConfig::default();
    let comparison_path = output.dir.join(files.comparison_file);
    let baseline_path = output.dir.join(files.baseline_energies_file);
    let alternative_path = output.dir.join(files.alternative_energies_file);

    info!("Writing comparison records to {:?}", &comparison_path);
    export::write_comparisons(&comparison_path, &report.records).map_err(EngineError::from)?;
    export::write_assignments(&baseline_path, &report.baseline).map_err(EngineError::from)?;
    export::write_assignments(&alternative_path, &report.alternative)
        .map_err(EngineError::from)?;

    if output.write_summary {
        let summary_path = output.dir.join(files.summary_file);
        info!("Writing per-table summary to {:?}", &summary_path);
        export::write_summaries(&summary_path, &report.summaries()).map_err(EngineError::from)?;
    }

    if !result.unparsed.is_empty() {
        warn!(
            "{} input files could not be parsed and were skipped.",
            result.unparsed.len()
        );
    }

    println!(
        "Read {} baseline and {} alternative files ({} unparsed) with {} energy tables.",
        result.baseline_files,
        result.alternative_files,
        result.unparsed.len(),
        result.table_count
    );
    println!(
        "Assigned {} baseline and {} alternative observations; {} without a table.",
        stats.baseline.assigned,
        stats.alternative.assigned,
        stats.baseline.without_table + stats.alternative.without_table
    );
    if stats.alternative.filtered_out > 0 {
        println!(
            "Multi-conformer filter removed {} alternative observations.",
            stats.alternative.filtered_out
        );
    }
    println!(
        "✓ {} comparison records ({} baseline / {} alternative unmatched) written to: {}",
        stats.records,
        stats.baseline.unmatched,
        stats.alternative.unmatched,
        output.dir.display()
    );

    Ok(())
}
