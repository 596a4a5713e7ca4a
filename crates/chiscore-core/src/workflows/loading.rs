use crate::core::energy::table::EnergyTableSet;
use crate::core::io::observations::{discover_files, load_observation_file};
use crate::core::io::tables::load_table_dir;
use crate::core::models::observation::{AngleObservation, Source};
use crate::engine::config::SourceConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An input file that could not be parsed and was left out of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedSource {
    pub observations: Vec<AngleObservation>,
    /// Files matched by the suffix, parsed or not.
    pub files: usize,
    pub unparsed: Vec<UnparsedFile>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedEnergyTables {
    pub tables: EnergyTableSet,
    /// CSV files in the table directory that do not name a table.
    pub ignored_files: Vec<PathBuf>,
}

pub(crate) fn load_energy_tables(
    dir: &Path,
    reporter: &ProgressReporter,
) -> Result<LoadedEnergyTables, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Loading energy tables",
    });
    let loaded = load_table_dir(dir)?;
    for path in &loaded.skipped {
        warn!(
            "Ignoring '{}': file name is not a RESIDUE_CHIn table name.",
            path.display()
        );
    }
    info!(
        "Loaded {} energy tables from '{}'.",
        loaded.tables.len(),
        dir.display()
    );
    reporter.report(Progress::PhaseFinish);

    Ok(LoadedEnergyTables {
        tables: loaded.tables,
        ignored_files: loaded.skipped,
    })
}

/// Reads every file of one source in parallel.
///
/// A file that fails to parse is reported and skipped; the rest of the source still loads.
/// Observations keep file order, then row order.
pub(crate) fn load_source(
    input: &SourceConfig,
    source: Source,
    exclude_suffix: Option<&str>,
    phase: &'static str,
    reporter: &ProgressReporter,
) -> Result<LoadedSource, EngineError> {
    reporter.report(Progress::PhaseStart { name: phase });

    let files = discover_files(&input.dir, &input.suffix, exclude_suffix)?;
    if files.is_empty() {
        warn!(
            "No {} files matching '*{}' found in '{}'.",
            source,
            input.suffix,
            input.dir.display()
        );
    } else {
        debug!("Found {} {} files.", files.len(), source);
    }

    reporter.report(Progress::FilesStart {
        total: files.len() as u64,
    });
    let parsed: Vec<_> = files
        .par_iter()
        .map(|path| {
            let result = load_observation_file(path, source);
            reporter.report(Progress::FileRead);
            result
        })
        .collect();
    reporter.report(Progress::FilesFinish);

    let mut loaded = LoadedSource {
        files: files.len(),
        ..LoadedSource::default()
    };
    for (path, result) in files.into_iter().zip(parsed) {
        match result {
            Ok(mut observations) => loaded.observations.append(&mut observations),
            Err(e) => {
                warn!("Skipping unparsable file '{}': {}", path.display(), e);
                reporter.report(Progress::FileSkipped {
                    path: path.clone(),
                    reason: e.to_string(),
                });
                loaded.unparsed.push(UnparsedFile {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Read {} {} observations from {} of {} files.",
        loaded.observations.len(),
        source,
        loaded.files - loaded.unparsed.len(),
        loaded.files
    );
    reporter.report(Progress::PhaseFinish);
    Ok(loaded)
}
