use thiserror::Error;

use super::config::ConfigError;
use crate::core::energy::lookup::LookupError;
use crate::core::io::export::ExportError;
use crate::core::io::observations::ObservationLoadError;
use crate::core::io::tables::TableLoadError;
use crate::core::models::key::TableKey;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Energy lookup failed for table {key}: {source}")]
    Lookup { key: TableKey, source: LookupError },

    #[error("Failed to load energy tables: {source}")]
    Tables {
        #[from]
        source: TableLoadError,
    },

    #[error("Failed to read observations: {source}")]
    Observations {
        #[from]
        source: ObservationLoadError,
    },

    #[error("Failed to write results: {source}")]
    Export {
        #[from]
        source: ExportError,
    },
}
