//! One-dimensional interpolation kernels.
//!
//! The cubic spline uses the not-a-knot boundary rule, matching the
//! reference tables' interpolation convention. Degenerate knot counts fall
//! back to the unique lower-order interpolant: a straight line for two
//! knots, the interpolating parabola for three.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplineError {
    #[error("interpolation requires at least 2 knots, got {actual}")]
    InsufficientKnots { actual: usize },
    #[error("knot/value length mismatch: knots={knots}, values={values}")]
    LengthMismatch { knots: usize, values: usize },
    #[error(
        "knots must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasingKnots {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("knot value at index {index} is not finite: {value}")]
    NonFiniteKnot { index: usize, value: f64 },
}

/// Piecewise-linear interpolation over strictly increasing knots, clamped to
/// the end values outside the knot range.
pub fn linear_interpolate(knots: &[f64], values: &[f64], at: f64) -> Result<f64, SplineError> {
    validate_knots(knots, values)?;

    if at <= knots[0] {
        return Ok(values[0]);
    }
    let last = knots.len() - 1;
    if at >= knots[last] {
        return Ok(values[last]);
    }

    let upper = knots.partition_point(|knot| *knot < at).max(1);
    let lower = upper - 1;
    let span = knots[upper] - knots[lower];
    let weight = (at - knots[lower]) / span;
    Ok(values[lower] + weight * (values[upper] - values[lower]))
}

/// Not-a-knot cubic spline in the second-derivative formulation.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    second_derivatives: Vec<f64>,
}

impl CubicSpline {
    pub fn not_a_knot(knots: &[f64], values: &[f64]) -> Result<Self, SplineError> {
        validate_knots(knots, values)?;

        let second_derivatives = match knots.len() {
            2 => vec![0.0, 0.0],
            3 => parabolic_second_derivatives(knots, values),
            _ => not_a_knot_second_derivatives(knots, values),
        };

        Ok(Self {
            knots: knots.to_vec(),
            values: values.to_vec(),
            second_derivatives,
        })
    }

    /// Evaluate the spline at `at`. Points outside the knot range continue
    /// the boundary polynomial; callers enforce the tabulated domain before
    /// interpolation, so this path is only reached by round-off at the
    /// edges.
    pub fn evaluate(&self, at: f64) -> f64 {
        let last = self.knots.len() - 1;
        let upper = self
            .knots
            .partition_point(|knot| *knot < at)
            .clamp(1, last);
        let lower = upper - 1;

        let span = self.knots[upper] - self.knots[lower];
        let left_weight = (self.knots[upper] - at) / span;
        let right_weight = (at - self.knots[lower]) / span;
        let curvature_scale = span * span / 6.0;

        self.values[lower] * left_weight
            + self.values[upper] * right_weight
            + curvature_scale
                * ((left_weight.powi(3) - left_weight) * self.second_derivatives[lower]
                    + (right_weight.powi(3) - right_weight) * self.second_derivatives[upper])
    }

    pub fn evaluate_many(&self, at: &[f64]) -> Vec<f64> {
        at.iter().map(|point| self.evaluate(*point)).collect()
    }
}

fn validate_knots(knots: &[f64], values: &[f64]) -> Result<(), SplineError> {
    if knots.len() < 2 {
        return Err(SplineError::InsufficientKnots {
            actual: knots.len(),
        });
    }
    if knots.len() != values.len() {
        return Err(SplineError::LengthMismatch {
            knots: knots.len(),
            values: values.len(),
        });
    }
    for (index, knot) in knots.iter().copied().enumerate() {
        if !knot.is_finite() {
            return Err(SplineError::NonFiniteKnot { index, value: knot });
        }
        if index > 0 && knot <= knots[index - 1] {
            return Err(SplineError::NonIncreasingKnots {
                index,
                previous: knots[index - 1],
                current: knot,
            });
        }
    }
    Ok(())
}

/// Three knots determine a single parabola; its constant second derivative
/// makes every spline segment reproduce it exactly.
fn parabolic_second_derivatives(knots: &[f64], values: &[f64]) -> Vec<f64> {
    let h0 = knots[1] - knots[0];
    let h1 = knots[2] - knots[1];
    let d0 = (values[1] - values[0]) / h0;
    let d1 = (values[2] - values[1]) / h1;
    let curvature = 2.0 * (d1 - d0) / (h0 + h1);
    vec![curvature; 3]
}

/// Solve the interior tridiagonal system for the second derivatives after
/// eliminating the boundary unknowns with the not-a-knot conditions
/// (continuous third derivative at the first and last interior knots).
fn not_a_knot_second_derivatives(knots: &[f64], values: &[f64]) -> Vec<f64> {
    let n = knots.len();
    let spans: Vec<f64> = knots.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let slopes: Vec<f64> = values
        .windows(2)
        .zip(&spans)
        .map(|(pair, span)| (pair[1] - pair[0]) / span)
        .collect();

    // Tridiagonal system in M_1 .. M_{n-2}.
    let unknowns = n - 2;
    let mut diagonal = vec![0.0; unknowns];
    let mut lower = vec![0.0; unknowns];
    let mut upper = vec![0.0; unknowns];
    let mut rhs = vec![0.0; unknowns];

    for row in 0..unknowns {
        let i = row + 1;
        lower[row] = spans[i - 1];
        diagonal[row] = 2.0 * (spans[i - 1] + spans[i]);
        upper[row] = spans[i];
        rhs[row] = 6.0 * (slopes[i] - slopes[i - 1]);
    }

    // Left boundary: M_0 = M_1 (1 + h0/h1) - M_2 (h0/h1).
    let left_ratio = spans[0] / spans[1];
    diagonal[0] += spans[0] * (1.0 + left_ratio);
    upper[0] -= spans[0] * left_ratio;

    // Right boundary: M_{n-1} = M_{n-2} (1 + h_{n-2}/h_{n-3}) - M_{n-3} (h_{n-2}/h_{n-3}).
    let right_ratio = spans[n - 2] / spans[n - 3];
    diagonal[unknowns - 1] += spans[n - 2] * (1.0 + right_ratio);
    lower[unknowns - 1] -= spans[n - 2] * right_ratio;

    let interior = solve_tridiagonal(&lower, &mut diagonal, &upper, &mut rhs);

    let mut second_derivatives = vec![0.0; n];
    second_derivatives[1..(n - 1)].copy_from_slice(&interior);
    second_derivatives[0] =
        interior[0] * (1.0 + left_ratio) - interior[1] * left_ratio;
    second_derivatives[n - 1] = interior[unknowns - 1] * (1.0 + right_ratio)
        - interior[unknowns - 2] * right_ratio;
    second_derivatives
}

/// Thomas algorithm; `diagonal` and `rhs` are consumed as scratch space.
fn solve_tridiagonal(
    lower: &[f64],
    diagonal: &mut [f64],
    upper: &[f64],
    rhs: &mut [f64],
) -> Vec<f64> {
    let n = diagonal.len();
    for row in 1..n {
        let factor = lower[row] / diagonal[row - 1];
        diagonal[row] -= factor * upper[row - 1];
        rhs[row] -= factor * rhs[row - 1];
    }

    let mut solution = vec![0.0; n];
    solution[n - 1] = rhs[n - 1] / diagonal[n - 1];
    for row in (0..n - 1).rev() {
        solution[row] = (rhs[row] - upper[row] * solution[row + 1]) / diagonal[row];
    }
    solution
}
