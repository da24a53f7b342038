//! Fragmentation-function evaluation and spectrum aggregation.
//!
//! [`fragmentation_function`] interpolates the stored tables at a caller
//! chosen virtuality and averages over the resolved polarization set.
//! [`spectrum`] drives it once per initial code for a heavy-state decay or
//! annihilation, adds the charge-conjugate branch, normalizes per particle
//! pair and applies the negative-value policy.

mod proton;

use crate::common::constants::{Q_MAX_GEV, Q_MIN_GEV, X_MAX, X_MIN};
use crate::domain::{
    EvaluationOptions, InterpolationMethod, NegativePolicy, ParticleId, ProcessKind,
    SpectrumError, SpectrumResult,
};
use crate::numerics::{CubicSpline, GridInterpolator2d, linear_interpolate};
use crate::states::{self, FinalState, InitialState};
use crate::table::{FragmentationTableSource, JsonTableSource, is_delta_transition};
use std::path::Path;

/// A fragmentation-function query at an explicit virtuality scale.
#[derive(Debug, Clone)]
pub struct FragmentationRequest<'a> {
    pub final_state: ParticleId,
    pub initial_state: ParticleId,
    pub x: &'a [f64],
    pub q: f64,
    pub options: EvaluationOptions,
}

impl<'a> FragmentationRequest<'a> {
    pub fn new(
        final_state: impl Into<ParticleId>,
        initial_state: impl Into<ParticleId>,
        x: &'a [f64],
        q: f64,
    ) -> Self {
        Self {
            final_state: final_state.into(),
            initial_state: initial_state.into(),
            x,
            q,
            options: EvaluationOptions::default(),
        }
    }
}

/// A heavy-dark-matter spectrum query: DM (+DM) -> X Xbar -> final state.
#[derive(Debug, Clone)]
pub struct SpectrumRequest<'a> {
    pub final_state: ParticleId,
    pub initial_state: ParticleId,
    pub x: &'a [f64],
    pub m_dm: f64,
    pub process: ProcessKind,
    /// Conjugate branch; defaults to the charge conjugate of the initial
    /// state, or to an implicit doubling for self-conjugate species.
    pub conjugate_initial_state: Option<ParticleId>,
    pub options: EvaluationOptions,
}

impl<'a> SpectrumRequest<'a> {
    pub fn new(
        final_state: impl Into<ParticleId>,
        initial_state: impl Into<ParticleId>,
        x: &'a [f64],
        m_dm: f64,
    ) -> Self {
        Self {
            final_state: final_state.into(),
            initial_state: initial_state.into(),
            x,
            m_dm,
            process: ProcessKind::default(),
            conjugate_initial_state: None,
            options: EvaluationOptions::default(),
        }
    }
}

/// Result of a spectrum or fragmentation-function query, aligned to the
/// requested x array.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub dndx: Vec<f64>,
    /// Averaged delta-function coefficient, present when delta mode was
    /// requested.
    pub delta_coefficient: Option<f64>,
    /// The x values whose dN/dx came out negative from cubic interpolation
    /// near the soft boundary and were clipped to zero. Populated by
    /// [`spectrum`] under [`NegativePolicy::ClipAndReport`]; always empty
    /// for [`fragmentation_function`], which reports raw interpolants.
    pub clipped_x: Vec<f64>,
}

/// Compute the fragmentation function dN/dx for one (final, initial) pair
/// at virtuality `q`, averaged over the resolved polarization set.
pub fn fragmentation_function(
    request: &FragmentationRequest<'_>,
    source: &dyn FragmentationTableSource,
) -> SpectrumResult<Spectrum> {
    let (final_state, initials) = states::resolve(&request.final_state, &request.initial_state)?;
    let evaluation = evaluate_fragmentation(
        source,
        final_state,
        &initials,
        request.x,
        request.q,
        request.options,
    )?;
    Ok(Spectrum {
        dndx: evaluation.dndx,
        delta_coefficient: request.options.include_delta.then_some(evaluation.delta),
        clipped_x: Vec::new(),
    })
}

/// Convenience form that opens the data resource for this call only and
/// releases it on every exit path.
pub fn fragmentation_function_from_path(
    request: &FragmentationRequest<'_>,
    data_path: impl AsRef<Path>,
) -> SpectrumResult<Spectrum> {
    let source = JsonTableSource::open(data_path)?;
    fragmentation_function(request, &source)
}

/// Compute the spectrum per decay (or per annihilation) of a heavy state.
pub fn spectrum(
    request: &SpectrumRequest<'_>,
    source: &dyn FragmentationTableSource,
) -> SpectrumResult<Spectrum> {
    let q = request.process.virtuality_scale(request.m_dm);
    let (final_state, mut initials) =
        states::resolve(&request.final_state, &request.initial_state)?;

    match &request.conjugate_initial_state {
        Some(conjugate) => initials.extend(states::resolve_initial(conjugate)?),
        None => {
            // Self-conjugate species carry no distinct branch; the pair
            // normalization below doubles their single contribution.
            if !initials[0].species().is_self_conjugate() {
                let conjugates: Vec<InitialState> = initials
                    .iter()
                    .map(|initial| initial.conjugate())
                    .collect::<SpectrumResult<_>>()?;
                initials.extend(conjugates);
            }
        }
    }

    let mut dndx = vec![0.0; request.x.len()];
    let mut delta = 0.0;
    for initial in &initials {
        let evaluation = evaluate_fragmentation(
            source,
            final_state,
            std::slice::from_ref(initial),
            request.x,
            q,
            request.options,
        )?;
        for (accumulated, value) in dndx.iter_mut().zip(&evaluation.dndx) {
            *accumulated += value;
        }
        delta += evaluation.delta;
    }

    // Per-pair normalization: X and its conjugate each contribute one
    // helicity-averaged unit.
    let normalization = initials.len() as f64 / 2.0;
    for value in &mut dndx {
        *value /= normalization;
    }
    delta /= normalization;
    delta = delta.max(0.0);

    let clipped_x = apply_negative_policy(&mut dndx, request.x, request.options.negative_policy)?;

    Ok(Spectrum {
        dndx,
        delta_coefficient: request.options.include_delta.then_some(delta),
        clipped_x,
    })
}

/// Convenience form that opens the data resource for this call only.
pub fn spectrum_from_path(
    request: &SpectrumRequest<'_>,
    data_path: impl AsRef<Path>,
) -> SpectrumResult<Spectrum> {
    let source = JsonTableSource::open(data_path)?;
    spectrum(request, &source)
}

struct FragmentationEvaluation {
    dndx: Vec<f64>,
    delta: f64,
}

fn evaluate_fragmentation(
    source: &dyn FragmentationTableSource,
    final_state: FinalState,
    initials: &[InitialState],
    x_values: &[f64],
    q: f64,
    options: EvaluationOptions,
) -> SpectrumResult<FragmentationEvaluation> {
    validate_domain(x_values, q)?;
    let log_q_value = q.log10();

    // The proton channel is evaluated on a dense internal grid and then
    // remapped onto the requested energy fractions with the finite-mass
    // correction.
    let dense_grid;
    let evaluation_x: &[f64] = if final_state.is_proton() {
        dense_grid = proton::dense_evaluation_grid();
        &dense_grid
    } else {
        x_values
    };

    let mut dndx = vec![0.0; evaluation_x.len()];
    let mut delta = 0.0;
    for initial in initials {
        let table = source.fragmentation_table(final_state, initial.code())?;
        let x_grid = table.interpolation_x_grid();
        let interpolator = GridInterpolator2d::new(&table.log_q, &x_grid, &table.values)
            .map_err(|error| {
                SpectrumError::missing_data(
                    format!("FF_{} for initial state {}", final_state.pdg_code(), initial),
                    error.to_string(),
                )
            })?;
        let interpolated =
            interpolator
                .evaluate(log_q_value, evaluation_x, options.interpolation)
                .map_err(|source| SpectrumError::Interpolation { axis: "x", source })?;

        // Tables store d(x) = x·dN/dx.
        for ((accumulated, value), x) in dndx.iter_mut().zip(&interpolated).zip(evaluation_x) {
            *accumulated += value / x;
        }

        if options.include_delta {
            delta += delta_coefficient(
                source,
                *initial,
                final_state,
                log_q_value,
                options.interpolation,
            )?;
        }
    }

    // Average over the polarization/helicity set.
    let count = initials.len() as f64;
    for value in &mut dndx {
        *value /= count;
    }
    delta /= count;

    if final_state.is_proton() {
        dndx = proton::apply_proton_mass(evaluation_x, &dndx, q, x_values)?;
    }

    Ok(FragmentationEvaluation { dndx, delta })
}

fn delta_coefficient(
    source: &dyn FragmentationTableSource,
    initial: InitialState,
    final_state: FinalState,
    log_q_value: f64,
    method: InterpolationMethod,
) -> SpectrumResult<f64> {
    let key = initial.transition_key_to(final_state);
    if !is_delta_transition(&key) {
        return Ok(0.0);
    }

    let profile = source.delta_profile(&key)?.ok_or_else(|| {
        SpectrumError::missing_data(
            format!("delta_coeff/{key}"),
            "delta-valid transition absent from resource",
        )
    })?;

    let coefficient = match method {
        InterpolationMethod::Linear => {
            linear_interpolate(&profile.log_q, &profile.coefficients, log_q_value)
        }
        InterpolationMethod::Cubic => CubicSpline::not_a_knot(&profile.log_q, &profile.coefficients)
            .map(|spline| spline.evaluate(log_q_value)),
    }
    .map_err(|source| SpectrumError::Interpolation { axis: "Q", source })?;

    Ok(coefficient)
}

fn validate_domain(x_values: &[f64], q: f64) -> SpectrumResult<()> {
    for x in x_values {
        if !(*x >= X_MIN && *x <= X_MAX) {
            return Err(SpectrumError::OutOfRange {
                quantity: "x",
                value: *x,
                min: X_MIN,
                max: X_MAX,
            });
        }
    }
    if !(q >= Q_MIN_GEV && q <= Q_MAX_GEV) {
        return Err(SpectrumError::OutOfRange {
            quantity: "Q",
            value: q,
            min: Q_MIN_GEV,
            max: Q_MAX_GEV,
        });
    }
    Ok(())
}

/// Cubic interpolation can overshoot below zero near x -> 0; the default
/// policy clips to zero and reports the affected x values, strict mode
/// refuses the result instead.
fn apply_negative_policy(
    dndx: &mut [f64],
    x_values: &[f64],
    policy: NegativePolicy,
) -> SpectrumResult<Vec<f64>> {
    let mut clipped_x = Vec::new();
    for (value, x) in dndx.iter_mut().zip(x_values) {
        if *value < 0.0 {
            clipped_x.push(*x);
            *value = 0.0;
        }
    }

    if clipped_x.is_empty() {
        return Ok(clipped_x);
    }

    match policy {
        NegativePolicy::Strict => Err(SpectrumError::NegativeSpectrum {
            count: clipped_x.len(),
            first_x: clipped_x[0],
        }),
        NegativePolicy::ClipAndReport => {
            tracing::warn!(
                clipped_x = ?clipped_x,
                "negative dN/dx values clipped to zero; caution around these x values, \
                 a comparison with linear interpolation is recommended"
            );
            Ok(clipped_x)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FragmentationRequest, fragmentation_function};
    use crate::domain::{EvaluationOptions, InterpolationMethod, SpectrumError};
    use crate::numerics::DenseRealMatrix;
    use crate::states::FinalState;
    use crate::table::{DeltaProfile, FragmentationTable, FragmentationTableSource};

    /// Synthetic provider whose tables store d(x) = c·x, so dN/dx = c for
    /// every x and Q under both interpolation methods.
    struct FlatSource {
        scale_per_code: Vec<(i32, f64)>,
    }

    impl FlatSource {
        fn scale(&self, code: i32) -> Option<f64> {
            self.scale_per_code
                .iter()
                .find(|(stored, _)| *stored == code)
                .map(|(_, scale)| *scale)
        }
    }

    impl FragmentationTableSource for FlatSource {
        fn fragmentation_table(
            &self,
            _final_state: FinalState,
            initial_code: i32,
        ) -> crate::domain::SpectrumResult<FragmentationTable> {
            let scale = self.scale(initial_code).ok_or_else(|| {
                SpectrumError::missing_data(format!("flavor {initial_code}"), "not stored")
            })?;
            let x = vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
            let log_q = vec![2.0, 6.0, 10.0, 14.0, 19.0];
            let values = DenseRealMatrix::from_fn(log_q.len(), x.len(), |_, col| {
                scale * if col == 0 { 1.0e-6 } else { x[col] }
            });
            Ok(FragmentationTable { x, log_q, values })
        }

        fn delta_profile(
            &self,
            _transition: &str,
        ) -> crate::domain::SpectrumResult<Option<DeltaProfile>> {
            Ok(Some(DeltaProfile {
                log_q: vec![2.0, 10.0, 19.0],
                coefficients: vec![0.5, 0.5, 0.5],
            }))
        }
    }

    #[test]
    fn flat_tables_recover_constant_dndx_under_both_methods() {
        let source = FlatSource {
            scale_per_code: vec![(1902, 3.0), (2902, 3.0)],
        };
        let x = [0.05, 0.31, 0.77];
        for method in [InterpolationMethod::Cubic, InterpolationMethod::Linear] {
            let request = FragmentationRequest {
                options: EvaluationOptions::default().with_interpolation(method),
                ..FragmentationRequest::new("gamma", "u", &x, 1.0e4)
            };
            let result = fragmentation_function(&request, &source).expect("evaluation");
            for value in &result.dndx {
                assert!(
                    (value - 3.0).abs() <= 1.0e-9,
                    "{method}: expected 3.0, got {value}"
                );
            }
            assert_eq!(result.delta_coefficient, None);
        }
    }

    #[test]
    fn polarization_averaging_uses_the_resolved_set_size() {
        let source = FlatSource {
            scale_per_code: vec![(1902, 2.0), (2902, 4.0)],
        };
        let x = [0.5];
        let request = FragmentationRequest::new("gamma", "u", &x, 1.0e4);
        let averaged = fragmentation_function(&request, &source).expect("evaluation");
        assert!((averaged.dndx[0] - 3.0).abs() <= 1.0e-9);

        let left_only = FragmentationRequest::new("gamma", "uL", &x, 1.0e4);
        let left = fragmentation_function(&left_only, &source).expect("evaluation");
        assert!((left.dndx[0] - 2.0).abs() <= 1.0e-9);
    }

    #[test]
    fn delta_mode_appends_zero_for_invalid_transitions() {
        let source = FlatSource {
            scale_per_code: vec![(1902, 1.0), (2902, 1.0)],
        };
        let x = [0.5];
        let request = FragmentationRequest {
            options: EvaluationOptions::default().with_delta(true),
            ..FragmentationRequest::new("gamma", "u", &x, 1.0e4)
        };
        let result = fragmentation_function(&request, &source).expect("evaluation");
        assert_eq!(result.delta_coefficient, Some(0.0));
    }

    #[test]
    fn delta_mode_interpolates_valid_transitions() {
        let source = FlatSource {
            scale_per_code: vec![(1911, 1.0)],
        };
        let x = [0.5];
        let request = FragmentationRequest {
            options: EvaluationOptions::default().with_delta(true),
            ..FragmentationRequest::new("e", "eL", &x, 1.0e4)
        };
        let result = fragmentation_function(&request, &source).expect("evaluation");
        assert_eq!(result.delta_coefficient, Some(0.5));
    }

    #[test]
    fn out_of_domain_inputs_fail_before_any_table_access() {
        let source = FlatSource {
            scale_per_code: Vec::new(),
        };
        let bad_x = FragmentationRequest::new("gamma", "u", &[1.0e-7], 1.0e4);
        assert!(matches!(
            fragmentation_function(&bad_x, &source).expect_err("x too small"),
            SpectrumError::OutOfRange { quantity: "x", .. }
        ));

        let x = [0.5];
        let bad_q = FragmentationRequest::new("gamma", "u", &x, 100.0);
        assert!(matches!(
            fragmentation_function(&bad_q, &source).expect_err("Q too small"),
            SpectrumError::OutOfRange { quantity: "Q", .. }
        ));
    }
}
