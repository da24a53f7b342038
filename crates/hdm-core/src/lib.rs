//! Fragmentation spectra for heavy dark matter decays and annihilations.
//!
//! Interpolates pre-tabulated fragmentation functions d(x) = x·dN/dx over a
//! fixed (virtuality Q, energy fraction x) grid, resolves particle labels
//! and PDG-style codes onto the canonical polarized table states, applies
//! the finite-proton-mass correction, and aggregates polarization and
//! particle/antiparticle branches into dN/dx.
//!
//! The two public entry points are [`spectrum::spectrum`] for a full decay
//! or annihilation spectrum and [`spectrum::fragmentation_function`] for a
//! single fragmentation function at an explicit scale; both accept any
//! [`table::FragmentationTableSource`] data provider.

pub mod common;
pub mod domain;
pub mod numerics;
pub mod spectrum;
pub mod states;
pub mod table;

pub use domain::{
    EvaluationOptions, InterpolationMethod, NegativePolicy, ParticleId, ProcessKind,
    SpectrumError, SpectrumResult,
};
pub use spectrum::{
    FragmentationRequest, Spectrum, SpectrumRequest, fragmentation_function,
    fragmentation_function_from_path, spectrum, spectrum_from_path,
};
pub use states::{FinalState, InitialState, Polarization, Species};
pub use table::{FragmentationTableSource, JsonTableSource};
