use crate::cli::AssignArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use chiscore::core::io::export;
use chiscore::engine::error::EngineError;
use chiscore::engine::progress::ProgressReporter;
use chiscore::workflows;
use tracing::{info, warn};

pub fn run(args: AssignArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    let config = partial_config.merge_assign(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Assigning chi-angle energies to {} observations...", config.source);
    let result = workflows::assign::run(&config, &reporter)?;
    let stats = &result.report.stats;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    info!("Writing assignments to {:?}", &args.output);
    export::write_assignments(&args.output, &result.report.assignments)
        .map_err(EngineError::from)?;

    if !result.unparsed.is_empty() {
        warn!(
            "{} input files could not be parsed and were skipped.",
            result.unparsed.len()
        );
    }

    println!(
        "✓ {} of {} observations assigned ({} missing angles, {} without a table) from {} files, written to: {}",
        stats.assigned,
        stats.observations,
        stats.missing_angles,
        stats.without_table,
        result.files,
        args.output.display()
    );

    Ok(())
}
