pub mod errors;

pub use errors::{SpectrumError, SpectrumResult};

use std::fmt::{Display, Formatter};

/// Interpolation kind used between tabulated grid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationMethod {
    #[default]
    Cubic,
    Linear,
}

impl InterpolationMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cubic => "cubic",
            Self::Linear => "linear",
        }
    }
}

impl Display for InterpolationMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Production process of the initial pair, fixing the virtuality scale:
/// Q = mDM for annihilation, Q = mDM/2 for two-body decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessKind {
    #[default]
    Decay,
    Annihilation,
}

impl ProcessKind {
    pub fn virtuality_scale(self, m_dm: f64) -> f64 {
        match self {
            Self::Annihilation => m_dm,
            Self::Decay => m_dm / 2.0,
        }
    }
}

/// Handling of negative interpolated dN/dx values near the soft boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NegativePolicy {
    /// Clip to zero and report the affected x values (reference behavior).
    #[default]
    ClipAndReport,
    /// Fail with [`SpectrumError::NegativeSpectrum`] on any negative entry.
    Strict,
}

/// Particle identifier as accepted by the public query surface: either a
/// canonical label (optionally suffixed `L`/`R`/`0` for initial states) or a
/// numeric PDG-style code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParticleId {
    Label(String),
    Code(i32),
}

impl From<&str> for ParticleId {
    fn from(label: &str) -> Self {
        Self::Label(label.to_owned())
    }
}

impl From<String> for ParticleId {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

impl From<i32> for ParticleId {
    fn from(code: i32) -> Self {
        Self::Code(code)
    }
}

impl Display for ParticleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Label(label) => f.write_str(label),
            Self::Code(code) => write!(f, "{code}"),
        }
    }
}

/// Evaluation knobs shared by both public entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationOptions {
    pub interpolation: InterpolationMethod,
    pub negative_policy: NegativePolicy,
    pub include_delta: bool,
}

impl EvaluationOptions {
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_negative_policy(mut self, negative_policy: NegativePolicy) -> Self {
        self.negative_policy = negative_policy;
        self
    }

    pub fn with_delta(mut self, include_delta: bool) -> Self {
        self.include_delta = include_delta;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EvaluationOptions, InterpolationMethod, NegativePolicy, ParticleId, ProcessKind,
    };

    #[test]
    fn virtuality_scale_follows_process_kinematics() {
        assert_eq!(ProcessKind::Annihilation.virtuality_scale(1.0e6), 1.0e6);
        assert_eq!(ProcessKind::Decay.virtuality_scale(1.0e6), 5.0e5);
    }

    #[test]
    fn defaults_match_the_reference_query_surface() {
        let options = EvaluationOptions::default();
        assert_eq!(options.interpolation, InterpolationMethod::Cubic);
        assert_eq!(options.negative_policy, NegativePolicy::ClipAndReport);
        assert!(!options.include_delta);
    }

    #[test]
    fn particle_id_converts_from_labels_and_codes() {
        assert_eq!(ParticleId::from("WL"), ParticleId::Label("WL".to_owned()));
        assert_eq!(ParticleId::from(-1911), ParticleId::Code(-1911));
        assert_eq!(ParticleId::from("gamma").to_string(), "gamma");
        assert_eq!(ParticleId::from(25).to_string(), "25");
    }
}
