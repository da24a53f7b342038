use std::path::PathBuf;

pub type SpectrumResult<T> = Result<T, SpectrumError>;

/// Failure taxonomy of the fragmentation engine.
///
/// Every variant propagates immediately to the caller; the only recovery
/// behavior in the engine is the documented negative-value clip, which is
/// reported through [`crate::spectrum::Spectrum::clipped_x`], not an error.
#[derive(Debug, thiserror::Error)]
pub enum SpectrumError {
    #[error("unrecognized particle state '{id}'")]
    UnrecognizedState { id: String },
    #[error("state '{id}' is self-conjugate and has no antiparticle")]
    NoAntiparticle { id: String },
    #[error("{quantity} = {value:e} outside tabulated range [{min:e}, {max:e}]")]
    OutOfRange {
        quantity: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("fragmentation data resource is missing '{dataset}': {detail}")]
    MissingData { dataset: String, detail: String },
    #[error("failed to read fragmentation data resource '{}': {source}", path.display())]
    ResourceRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse fragmentation data resource '{}': {source}", path.display())]
    ResourceParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(
        "negative dN/dx under strict negative policy at {count} x value(s), first at x = {first_x:e}"
    )]
    NegativeSpectrum { count: usize, first_x: f64 },
    #[error("interpolation kernel failed over '{axis}' axis: {source}")]
    Interpolation {
        axis: &'static str,
        source: crate::numerics::SplineError,
    },
}

impl SpectrumError {
    pub fn missing_data(dataset: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MissingData {
            dataset: dataset.into(),
            detail: detail.into(),
        }
    }

    pub fn unrecognized(id: impl ToString) -> Self {
        Self::UnrecognizedState {
            id: id.to_string(),
        }
    }
}
