//! Physical constants and tabulated-domain bounds shared across the engine.
//!
//! These values pin down the fixed (x, Q) domain of the fragmentation tables
//! and the proton-mass correction, avoiding ad hoc per-module literals.

/// Proton mass in GeV.
pub const PROTON_MASS_GEV: f64 = 0.938_272_081_3_f64;

/// Power-law index of the finite-proton-mass correction.
pub const PROTON_POWER_INDEX: i32 = 3;

/// Lower edge of the tabulated energy-fraction grid. The stored grids start
/// at a nominal x = 0 bin which is clamped to this value before
/// interpolation.
pub const X_MIN: f64 = 1.0e-6;

/// Upper edge of the tabulated energy-fraction grid.
pub const X_MAX: f64 = 1.0;

/// Lower edge of the tabulated virtuality range in GeV.
pub const Q_MIN_GEV: f64 = 500.0;

/// Upper edge of the tabulated virtuality range in GeV.
pub const Q_MAX_GEV: f64 = 1.0e19;

/// Number of points in the dense logarithmic x grid used internally for the
/// proton-channel evaluation.
pub const PROTON_DENSE_GRID_POINTS: usize = 1000;

/// Canonical-code offset for a left-handed (negative-helicity) state.
pub const LEFT_HANDED_OFFSET: i32 = 1900;

/// Canonical-code offset for a right-handed (positive-helicity) state.
pub const RIGHT_HANDED_OFFSET: i32 = 2900;

/// Canonical-code offset for a longitudinally polarized state.
pub const LONGITUDINAL_OFFSET: i32 = 3900;
