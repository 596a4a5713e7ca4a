use crate::cli::LookupArgs;
use crate::config::single_lookup_policy;
use crate::error::{CliError, Result};
use chiscore::core::energy::angle::normalize_angle;
use chiscore::core::io::tables::load_table_file;
use chiscore::core::models::key::TableKey;
use chiscore::engine::error::EngineError;
use tracing::debug;

pub fn run(args: LookupArgs) -> Result<()> {
    let key: TableKey = args
        .key
        .parse()
        .map_err(|e| CliError::Argument(format!("{}", e)))?;
    let path = args.energy_tables.join(format!("{}.csv", key));
    let table = load_table_file(&path).map_err(EngineError::from)?;

    let (boundary, fallback) = single_lookup_policy(&args.policy);
    let angle = normalize_angle(args.angle)
        .ok_or_else(|| CliError::Argument(format!("Angle must be finite, got {}", args.angle)))?;
    debug!(
        "Looking up {} at {:.3}° with {:?} and {:?}",
        key, angle, boundary, fallback
    );

    let energy = table
        .lookup(Some(angle), boundary, fallback)
        .map_err(|source| EngineError::Lookup {
            key: key.clone(),
            source,
        })?;

    match energy {
        Some(energy) => println!("{}\t{:.3}\t{}", key, angle, energy),
        None => println!("{}\t{:.3}\tNA", key, angle),
    }
    Ok(())
}
