//! Two-dimensional interpolation over a (log10 Q, x) table grid.
//!
//! Evaluation is tensor-product: the value grid is first reduced along the
//! Q axis at the requested virtuality, then the resulting x slice is
//! interpolated at the requested energy fractions with the same method on
//! both axes.

use super::{CubicSpline, DenseRealMatrix, SplineError, linear_interpolate};
use crate::domain::InterpolationMethod;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridShapeError {
    #[error(
        "value grid has shape {rows}x{cols}, expected {expected_rows}x{expected_cols} for the (Q, x) axes"
    )]
    ValueShape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("{axis} axis is not a valid interpolation grid: {source}")]
    Axis {
        axis: &'static str,
        source: SplineError,
    },
}

/// Borrowed view over one fragmentation table, ready for evaluation.
#[derive(Debug, Clone, Copy)]
pub struct GridInterpolator2d<'a> {
    log_q: &'a [f64],
    x: &'a [f64],
    values: &'a DenseRealMatrix,
}

impl<'a> GridInterpolator2d<'a> {
    pub fn new(
        log_q: &'a [f64],
        x: &'a [f64],
        values: &'a DenseRealMatrix,
    ) -> Result<Self, GridShapeError> {
        validate_axis("Q", log_q)?;
        validate_axis("x", x)?;
        if values.nrows() != log_q.len() || values.ncols() != x.len() {
            return Err(GridShapeError::ValueShape {
                rows: values.nrows(),
                cols: values.ncols(),
                expected_rows: log_q.len(),
                expected_cols: x.len(),
            });
        }
        Ok(Self { log_q, x, values })
    }

    /// Evaluate the grid at a single log10(Q) and many x values.
    pub fn evaluate(
        &self,
        log_q_value: f64,
        x_values: &[f64],
        method: InterpolationMethod,
    ) -> Result<Vec<f64>, SplineError> {
        let slice = self.reduce_q_axis(log_q_value, method)?;
        match method {
            InterpolationMethod::Linear => x_values
                .iter()
                .map(|x| linear_interpolate(self.x, &slice, *x))
                .collect(),
            InterpolationMethod::Cubic => {
                let spline = CubicSpline::not_a_knot(self.x, &slice)?;
                Ok(spline.evaluate_many(x_values))
            }
        }
    }

    fn reduce_q_axis(
        &self,
        log_q_value: f64,
        method: InterpolationMethod,
    ) -> Result<Vec<f64>, SplineError> {
        let mut column = vec![0.0; self.log_q.len()];
        let mut slice = Vec::with_capacity(self.x.len());
        for col in 0..self.x.len() {
            for row in 0..self.log_q.len() {
                column[row] = self.values[(row, col)];
            }
            let reduced = match method {
                InterpolationMethod::Linear => {
                    linear_interpolate(self.log_q, &column, log_q_value)?
                }
                InterpolationMethod::Cubic => {
                    CubicSpline::not_a_knot(self.log_q, &column)?.evaluate(log_q_value)
                }
            };
            slice.push(reduced);
        }
        Ok(slice)
    }
}

fn validate_axis(axis: &'static str, knots: &[f64]) -> Result<(), GridShapeError> {
    let wrap = |source| GridShapeError::Axis { axis, source };
    if knots.len() < 2 {
        return Err(wrap(SplineError::InsufficientKnots {
            actual: knots.len(),
        }));
    }
    for (index, knot) in knots.iter().copied().enumerate() {
        if !knot.is_finite() {
            return Err(wrap(SplineError::NonFiniteKnot { index, value: knot }));
        }
        if index > 0 && knot <= knots[index - 1] {
            return Err(wrap(SplineError::NonIncreasingKnots {
                index,
                previous: knots[index - 1],
                current: knot,
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{GridInterpolator2d, GridShapeError};
    use crate::domain::InterpolationMethod;
    use crate::numerics::DenseRealMatrix;

    fn planar_grid(log_q: &[f64], x: &[f64]) -> DenseRealMatrix {
        // f(q, x) = 3q - 2x + 1 is reproduced exactly by both methods.
        DenseRealMatrix::from_fn(log_q.len(), x.len(), |row, col| {
            3.0 * log_q[row] - 2.0 * x[col] + 1.0
        })
    }

    #[test]
    fn both_methods_reproduce_planar_data_exactly() {
        let log_q = [2.7, 5.0, 8.0, 11.0, 15.0, 19.0];
        let x = [1.0e-6, 0.1, 0.25, 0.5, 0.75, 1.0];
        let values = planar_grid(&log_q, &x);
        let interpolator = GridInterpolator2d::new(&log_q, &x, &values).expect("interpolator");

        let targets = [0.05, 0.3, 0.9];
        for method in [InterpolationMethod::Cubic, InterpolationMethod::Linear] {
            let evaluated = interpolator
                .evaluate(6.4, &targets, method)
                .expect("evaluation");
            for (target, value) in targets.iter().zip(&evaluated) {
                let expected = 3.0 * 6.4 - 2.0 * target + 1.0;
                assert!(
                    (value - expected).abs() <= 1.0e-10,
                    "{method} at x={target}: expected {expected}, got {value}"
                );
            }
        }
    }

    #[test]
    fn bilinear_evaluation_matches_hand_computed_cell_average() {
        let log_q = [3.0, 4.0];
        let x = [0.0, 1.0];
        let values = DenseRealMatrix::from_fn(2, 2, |row, col| (row * 2 + col) as f64);
        let interpolator = GridInterpolator2d::new(&log_q, &x, &values).expect("interpolator");

        // Center of the cell: mean of the four corners (0 + 1 + 2 + 3) / 4.
        let evaluated = interpolator
            .evaluate(3.5, &[0.5], InterpolationMethod::Linear)
            .expect("evaluation");
        assert!((evaluated[0] - 1.5).abs() <= 1.0e-15);
    }

    #[test]
    fn shape_mismatches_are_rejected_at_construction() {
        let log_q = [3.0, 4.0, 5.0];
        let x = [0.0, 0.5, 1.0];
        let values = DenseRealMatrix::zeros(2, 3);
        assert!(matches!(
            GridInterpolator2d::new(&log_q, &x, &values).expect_err("shape"),
            GridShapeError::ValueShape {
                rows: 2,
                expected_rows: 3,
                ..
            }
        ));

        let unsorted = [3.0, 2.0, 5.0];
        let square = DenseRealMatrix::zeros(3, 3);
        assert!(matches!(
            GridInterpolator2d::new(&unsorted, &x, &square).expect_err("axis"),
            GridShapeError::Axis { axis: "Q", .. }
        ));
    }
}
