use crate::error::{GeometryError, Result};

use super::Vector3;

/// Vector helpers missing from nalgebra.
///
/// Division by zero is an error and zero-length vectors normalize to zero,
/// where nalgebra would produce NaN for both.
pub trait VectorExt {
    /// Divides every component by `scalar`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DivideByZero`] if `scalar` is exactly zero.
    fn checked_div(&self, scalar: f64) -> Result<Vector3>;

    /// Returns the unit vector, or the zero vector when the length is zero.
    #[must_use]
    fn normalize_or_zero(&self) -> Vector3;

    /// Returns the projection onto the horizontal XZ plane.
    #[must_use]
    fn horizontal(&self) -> Vector3;
}

impl VectorExt for Vector3 {
    #[allow(clippy::float_cmp)]
    fn checked_div(&self, scalar: f64) -> Result<Vector3> {
        if scalar == 0.0 {
            return Err(GeometryError::DivideByZero.into());
        }
        Ok(self / scalar)
    }

    fn normalize_or_zero(&self) -> Vector3 {
        let len = self.norm();
        if len > 0.0 {
            self / len
        } else {
            Vector3::zeros()
        }
    }

    fn horizontal(&self) -> Vector3 {
        Vector3::new(self.x, 0.0, self.z)
    }
}
