pub mod grid;
pub mod spline;

pub use grid::{GridInterpolator2d, GridShapeError};
pub use spline::{CubicSpline, SplineError, linear_interpolate};

use faer::Mat;

/// Dense row-major real matrix used for tabulated (Q, x) value grids.
pub type DenseRealMatrix = Mat<f64>;
