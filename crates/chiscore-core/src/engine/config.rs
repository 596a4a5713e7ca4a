use crate::core::energy::lookup::{BoundaryPolicy, FallbackPolicy, LookupError};
use crate::core::io::observations::{ALTERNATIVE_SUFFIX, BASELINE_SUFFIX};
use crate::core::models::observation::Source;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid lookup fallback: {0}")]
    InvalidFallback(#[from] LookupError),
}

/// Which residue identity two observations must share to be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JoinGranularity {
    /// Chain, residue id, residue type and chi angle.
    #[default]
    Residue,
    /// As [`JoinGranularity::Residue`], plus the alternate-location tag.
    AltLocation,
}

/// Sign convention for deltas between the two sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeltaConvention {
    /// `alternative - baseline`: positive when the multi-conformer model scores higher.
    #[default]
    AlternativeMinusBaseline,
    /// `baseline - alternative`.
    BaselineMinusAlternative,
}

impl DeltaConvention {
    /// Signed difference, missing if either side is missing.
    #[inline]
    pub fn apply(self, baseline: Option<f64>, alternative: Option<f64>) -> Option<f64> {
        let (b, a) = (baseline?, alternative?);
        Some(match self {
            DeltaConvention::AlternativeMinusBaseline => a - b,
            DeltaConvention::BaselineMinusAlternative => b - a,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LookupConfig {
    pub boundary: BoundaryPolicy,
    pub fallback: FallbackPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComparisonConfig {
    pub lookup: LookupConfig,
    pub join: JoinGranularity,
    pub delta_convention: DeltaConvention,
    /// Keep only alternative observations that carry an alternate-location tag.
    pub multi_conformer_only: bool,
}

/// Where one source's rotamer extraction files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub dir: PathBuf,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompareConfig {
    pub baseline: SourceConfig,
    pub alternative: SourceConfig,
    pub energy_table_dir: PathBuf,
    pub comparison: ComparisonConfig,
}

#[derive(Default)]
pub struct CompareConfigBuilder {
    baseline_dir: Option<PathBuf>,
    alternative_dir: Option<PathBuf>,
    baseline_suffix: Option<String>,
    alternative_suffix: Option<String>,
    energy_table_dir: Option<PathBuf>,
    boundary: Option<BoundaryPolicy>,
    fallback: Option<FallbackPolicy>,
    join: Option<JoinGranularity>,
    delta_convention: Option<DeltaConvention>,
    multi_conformer_only: Option<bool>,
}

impl CompareConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn baseline_dir(mut self, path: PathBuf) -> Self {
        self.baseline_dir = Some(path);
        self
    }
    pub fn alternative_dir(mut self, path: PathBuf) -> Self {
        self.alternative_dir = Some(path);
        self
    }
    pub fn baseline_suffix(mut self, suffix: &str) -> Self {
        self.baseline_suffix = Some(suffix.to_string());
        self
    }
    pub fn alternative_suffix(mut self, suffix: &str) -> Self {
        self.alternative_suffix = Some(suffix.to_string());
        self
    }
    pub fn energy_table_dir(mut self, path: PathBuf) -> Self {
        self.energy_table_dir = Some(path);
        self
    }
    pub fn boundary(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary = Some(policy);
        self
    }
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = Some(fallback);
        self
    }
    pub fn join(mut self, granularity: JoinGranularity) -> Self {
        self.join = Some(granularity);
        self
    }
    pub fn delta_convention(mut self, convention: DeltaConvention) -> Self {
        self.delta_convention = Some(convention);
        self
    }
    pub fn multi_conformer_only(mut self, enabled: bool) -> Self {
        self.multi_conformer_only = Some(enabled);
        self
    }

    pub fn build(self) -> Result<CompareConfig, ConfigError> {
        let fallback = self.fallback.unwrap_or_default();
        fallback.validate()?;

        let baseline = SourceConfig {
            dir: self
                .baseline_dir
                .ok_or(ConfigError::MissingParameter("baseline_dir"))?,
            suffix: self
                .baseline_suffix
                .unwrap_or_else(|| BASELINE_SUFFIX.to_string()),
        };
        let alternative = SourceConfig {
            dir: self
                .alternative_dir
                .ok_or(ConfigError::MissingParameter("alternative_dir"))?,
            suffix: self
                .alternative_suffix
                .unwrap_or_else(|| ALTERNATIVE_SUFFIX.to_string()),
        };
        let comparison = ComparisonConfig {
            lookup: LookupConfig {
                boundary: self.boundary.unwrap_or_default(),
                fallback,
            },
            join: self.join.unwrap_or_default(),
            delta_convention: self.delta_convention.unwrap_or_default(),
            multi_conformer_only: self.multi_conformer_only.unwrap_or(false),
        };

        Ok(CompareConfig {
            baseline,
            alternative,
            energy_table_dir: self
                .energy_table_dir
                .ok_or(ConfigError::MissingParameter("energy_table_dir"))?,
            comparison,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignConfig {
    pub input: SourceConfig,
    pub source: Source,
    pub energy_table_dir: PathBuf,
    pub lookup: LookupConfig,
}

#[derive(Default)]
pub struct AssignConfigBuilder {
    input_dir: Option<PathBuf>,
    suffix: Option<String>,
    source: Option<Source>,
    energy_table_dir: Option<PathBuf>,
    boundary: Option<BoundaryPolicy>,
    fallback: Option<FallbackPolicy>,
}

impl AssignConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_dir(mut self, path: PathBuf) -> Self {
        self.input_dir = Some(path);
        self
    }
    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }
    pub fn source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }
    pub fn energy_table_dir(mut self, path: PathBuf) -> Self {
        self.energy_table_dir = Some(path);
        self
    }
    pub fn boundary(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary = Some(policy);
        self
    }
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn build(self) -> Result<AssignConfig, ConfigError> {
        let fallback = self.fallback.unwrap_or_default();
        fallback.validate()?;

        let source = self.source.unwrap_or(Source::Baseline);
        let default_suffix = match source {
            Source::Baseline => BASELINE_SUFFIX,
            Source::Alternative => ALTERNATIVE_SUFFIX,
        };

        Ok(AssignConfig {
            input: SourceConfig {
                dir: self
                    .input_dir
                    .ok_or(ConfigError::MissingParameter("input_dir"))?,
                suffix: self.suffix.unwrap_or_else(|| default_suffix.to_string()),
            },
            source,
            energy_table_dir: self
                .energy_table_dir
                .ok_or(ConfigError::MissingParameter("energy_table_dir"))?,
            lookup: LookupConfig {
                boundary: self.boundary.unwrap_or_default(),
                fallback,
            },
        })
    }
}
