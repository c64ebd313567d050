//! Interpolation of scalar and vector fields.

pub mod trilinear;

use crate::{
    error::OutOfBoundsError,
    field::{ScalarField3, VectorField3},
    geometry::Vec3,
    num::BFloat,
};

/// Defines the properties of a 3D interpolator.
///
/// Interpolation points are given in lattice-index space.
pub trait Interpolator3: Clone + Sync + Send {
    /// Computes the interpolated value of a scalar field at the given lattice-space position.
    ///
    /// # Parameters
    ///
    /// - `field`: Scalar field to interpolate.
    /// - `interp_point`: Position where the interpolated value should be computed.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the interpolated field value.
    /// - `Err`: Contains an `OutOfBoundsError` if the position lies outside the grid.
    ///
    /// # Type parameters
    ///
    /// - `F`: Floating point type of the field data.
    fn interp_scalar_field<F>(
        &self,
        field: &ScalarField3<F>,
        interp_point: &Vec3<F>,
    ) -> Result<F, OutOfBoundsError>
    where
        F: BFloat;

    /// Computes the interpolated vector of a vector field at the given lattice-space position.
    ///
    /// # Parameters
    ///
    /// - `field`: Vector field to interpolate.
    /// - `interp_point`: Position where the interpolated vector should be computed.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the interpolated field vector.
    /// - `Err`: Contains an `OutOfBoundsError` if the position lies outside the grid.
    ///
    /// # Type parameters
    ///
    /// - `F`: Floating point type of the field data.
    fn interp_vector_field<F>(
        &self,
        field: &VectorField3<F>,
        interp_point: &Vec3<F>,
    ) -> Result<Vec3<F>, OutOfBoundsError>
    where
        F: BFloat;
}
