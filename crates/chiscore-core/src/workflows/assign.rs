use super::loading::{self, UnparsedFile};
use crate::core::io::observations::ALTERNATIVE_SUFFIX;
use crate::core::models::observation::Source;
use crate::engine::assignment::{self, AssignmentReport};
use crate::engine::config::AssignConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct AssignResult {
    pub report: AssignmentReport,
    pub files: usize,
    pub unparsed: Vec<UnparsedFile>,
}

/// Assigns energies to a single source without comparing it against anything.
#[instrument(skip_all, name = "assign_workflow", fields(source = %config.source))]
pub fn run(
    config: &AssignConfig,
    reporter: &ProgressReporter,
) -> Result<AssignResult, EngineError> {
    let tables = loading::load_energy_tables(&config.energy_table_dir, reporter)?;

    let exclude = match config.source {
        Source::Baseline => Some(ALTERNATIVE_SUFFIX),
        Source::Alternative => None,
    };
    let loaded = loading::load_source(
        &config.input,
        config.source,
        exclude,
        "Reading observations",
        reporter,
    )?;

    reporter.report(Progress::PhaseStart {
        name: "Assigning energies",
    });
    let report = assignment::assign(&loaded.observations, &tables.tables, &config.lookup)?;
    reporter.report(Progress::PhaseFinish);

    for key in &report.skipped_partitions {
        warn!("No energy table for {}; its observations were skipped.", key);
    }
    info!(
        "Assigned energies to {} of {} observations ({} with missing angles).",
        report.stats.assigned, report.stats.observations, report.stats.missing_angles
    );

    Ok(AssignResult {
        report,
        files: loaded.files,
        unparsed: loaded.unparsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::AssignConfigBuilder;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn run_assigns_energies_to_alternative_source() {
        let energy = tempdir().unwrap();
        fs::write(
            energy.path().join("VAL_CHI1.csv"),
            "bin min,bin max,E\n0,180,0.5\n180,360,1.5\n",
        )
        .unwrap();
        let data = tempdir().unwrap();
        fs::write(
            data.path().join("5xyz_qFit_rotamers_output.csv"),
            "chain,residue,altloc,residue_name,nchi,rotamer_value\nA,4,A,VAL,0,-170\nA,4,B,VAL,0,60\nA,5,,LEU,0,60\n",
        )
        .unwrap();

        let config = AssignConfigBuilder::new()
            .input_dir(data.path().to_path_buf())
            .energy_table_dir(energy.path().to_path_buf())
            .source(Source::Alternative)
            .build()
            .unwrap();

        let result = run(&config, &ProgressReporter::new()).unwrap();
        let energies: Vec<_> = result.report.assignments.iter().map(|a| a.energy).collect();
        assert_eq!(result.files, 1);
        assert_eq!(energies, vec![Some(1.5), Some(0.5)]);
        assert_eq!(result.report.skipped_partitions.len(), 1);
        assert_eq!(result.report.stats.without_table, 1);
    }
}
