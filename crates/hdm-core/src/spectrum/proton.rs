//! Finite-proton-mass correction.
//!
//! The tabulated proton spectra are massless-parton spectra in momentum
//! fraction; the physical spectrum is remapped onto proton energy fractions
//! `xp_E = sqrt((Q x)^2 + m_p^2) / Q` with an empirical power-law rescale,
//! and vanishes below the kinematic threshold m_p / Q.

use crate::common::constants::{
    PROTON_DENSE_GRID_POINTS, PROTON_MASS_GEV, PROTON_POWER_INDEX, X_MIN,
};
use crate::domain::{SpectrumError, SpectrumResult};
use crate::numerics::CubicSpline;

/// Dense logarithmic x grid on which the proton channel is evaluated before
/// remapping onto the caller's energy fractions.
pub(super) fn dense_evaluation_grid() -> Vec<f64> {
    let steps = (PROTON_DENSE_GRID_POINTS - 1) as f64;
    (0..PROTON_DENSE_GRID_POINTS)
        .map(|index| 10.0_f64.powf(-6.0 + 6.0 * index as f64 / steps))
        .collect()
}

/// Remap a spectrum evaluated on `dense_x` onto `target_x` proton energy
/// fractions at virtuality `q`.
pub(super) fn apply_proton_mass(
    dense_x: &[f64],
    dense_dndx: &[f64],
    q: f64,
    target_x: &[f64],
) -> SpectrumResult<Vec<f64>> {
    let mass_ratio = PROTON_MASS_GEV / q;

    let mut energy_fractions: Vec<f64> = dense_x
        .iter()
        .map(|x| (x * x + mass_ratio * mass_ratio).sqrt())
        .collect();
    let mut weighted: Vec<f64> = dense_x
        .iter()
        .zip(&energy_fractions)
        .zip(dense_dndx)
        .map(|((x, xp), dndx)| (xp / x) * (x / xp).powi(PROTON_POWER_INDEX) * dndx)
        .collect();

    // Anchor the low end so the remap interpolation stays covered down to
    // the tabulated boundary.
    if energy_fractions.first().copied().unwrap_or(X_MIN) > X_MIN {
        energy_fractions.insert(0, X_MIN);
        weighted.insert(0, 0.0);
    }

    let spline = CubicSpline::not_a_knot(&energy_fractions, &weighted)
        .map_err(|source| SpectrumError::Interpolation { axis: "xp_E", source })?;

    Ok(target_x
        .iter()
        .map(|x| if *x < mass_ratio { 0.0 } else { spline.evaluate(*x) })
        .collect())
}
