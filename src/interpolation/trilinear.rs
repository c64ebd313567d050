//! Trilinear interpolation between the eight corners of a lattice cell.

use super::Interpolator3;
use crate::{
    error::OutOfBoundsError,
    field::{ScalarField3, VectorField3},
    geometry::{
        Dim3::{self, X, Y, Z},
        Vec3,
    },
    grid::{
        regular::{EnclosingCell3, RegularGrid3},
        GridPointQuery3,
    },
    num::BFloat,
};
use ndarray::prelude::*;

/// A 3D interpolator blending the values at the corners of the enclosing
/// lattice cell linearly along each dimension.
///
/// The interpolated value equals the sample exactly at lattice points.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrilinearInterpolator3;

impl TrilinearInterpolator3 {
    /// Creates a new trilinear interpolator.
    pub fn new() -> Self {
        Self
    }

    fn lerp<F: BFloat>(lower: F, upper: F, offset: F) -> F {
        lower * (F::one() - offset) + upper * offset
    }

    fn interp_known_cell<F: BFloat>(values: &Array3<F>, cell: &EnclosingCell3<F>) -> F {
        let (lower, upper, offsets) = (&cell.lower, &cell.upper, &cell.offsets);
        let value = |i: usize, j: usize, k: usize| values[[i, j, k]];

        let v00 = Self::lerp(
            value(lower[X], lower[Y], lower[Z]),
            value(upper[X], lower[Y], lower[Z]),
            offsets[X],
        );
        let v10 = Self::lerp(
            value(lower[X], upper[Y], lower[Z]),
            value(upper[X], upper[Y], lower[Z]),
            offsets[X],
        );
        let v01 = Self::lerp(
            value(lower[X], lower[Y], upper[Z]),
            value(upper[X], lower[Y], upper[Z]),
            offsets[X],
        );
        let v11 = Self::lerp(
            value(lower[X], upper[Y], upper[Z]),
            value(upper[X], upper[Y], upper[Z]),
            offsets[X],
        );

        let v0 = Self::lerp(v00, v10, offsets[Y]);
        let v1 = Self::lerp(v01, v11, offsets[Y]);

        Self::lerp(v0, v1, offsets[Z])
    }

    fn find_cell<F: BFloat>(
        grid: &RegularGrid3<F>,
        interp_point: &Vec3<F>,
    ) -> Result<EnclosingCell3<F>, OutOfBoundsError> {
        match grid.find_enclosing_cell(interp_point) {
            GridPointQuery3::Inside(cell) => Ok(cell),
            GridPointQuery3::Outside(crossings) => Err(OutOfBoundsError {
                position: Vec3::from(interp_point),
                crossings,
            }),
        }
    }
}

impl Interpolator3 for TrilinearInterpolator3 {
    fn interp_scalar_field<F>(
        &self,
        field: &ScalarField3<F>,
        interp_point: &Vec3<F>,
    ) -> Result<F, OutOfBoundsError>
    where
        F: BFloat,
    {
        let cell = Self::find_cell(field.grid(), interp_point)?;
        Ok(Self::interp_known_cell(field.values(), &cell))
    }

    fn interp_vector_field<F>(
        &self,
        field: &VectorField3<F>,
        interp_point: &Vec3<F>,
    ) -> Result<Vec3<F>, OutOfBoundsError>
    where
        F: BFloat,
    {
        let cell = Self::find_cell(field.grid(), interp_point)?;
        Ok(Vec3::with_each_component(|dim: Dim3| {
            Self::interp_known_cell(field.values(dim), &cell)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{Idx3, In3D},
        grid::BoundsCrossing,
    };
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn irregular_field() -> VectorField3<f64> {
        let grid = Arc::new(
            RegularGrid3::new(
                In3D::new(4, 3, 3),
                Vec3::new(1.0, -2.0, 0.5),
                Vec3::new(0.3, 0.7, 1.1),
            )
            .unwrap(),
        );
        let vectors = (0..grid.number_of_points())
            .map(|n| {
                let n = n as f64;
                Vec3::new((1.7 * n).sin(), (0.3 * n * n).cos() * 3.1, n.sqrt() - 2.0)
            })
            .collect();
        VectorField3::from_ordered_vectors("j".to_string(), grid, vectors).unwrap()
    }

    #[test]
    fn interpolation_at_lattice_points_is_exact() {
        let field = irregular_field();
        let interpolator = TrilinearInterpolator3::new();
        for linear_idx in 0..field.grid().number_of_points() {
            let indices = field.grid().indices_from_linear(linear_idx);
            let position = field.grid().lattice_position(&indices);
            assert_eq!(
                interpolator.interp_vector_field(&field, &position).unwrap(),
                field.vector(&indices)
            );
        }
    }

    #[test]
    fn interpolation_of_linear_field_is_exact_between_lattice_points() {
        let grid = Arc::new(
            RegularGrid3::new(In3D::same(3), Vec3::zero(), Vec3::equal_components(1.0)).unwrap(),
        );
        let values = (0..grid.number_of_points())
            .map(|n| {
                let idx = grid.indices_from_linear(n);
                2.0 * idx[X] as f64 - 3.0 * idx[Y] as f64 + 0.5 * idx[Z] as f64 + 1.0
            })
            .collect();
        let field = ScalarField3::from_ordered_values("s".to_string(), grid, values).unwrap();
        let value = TrilinearInterpolator3
            .interp_scalar_field(&field, &Vec3::new(0.25, 1.5, 1.75))
            .unwrap();
        assert_abs_diff_eq!(value, 0.5 - 4.5 + 0.875 + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn interpolation_is_continuous() {
        let field = irregular_field();
        let interpolator = TrilinearInterpolator3::new();
        let base = Vec3::new(1.0, 1.0, 1.0);
        let value = interpolator.interp_vector_field(&field, &base).unwrap();
        for &epsilon in &[1e-4, 1e-6, 1e-8] {
            let shifted = base + Vec3::new(epsilon, -epsilon, 0.5 * epsilon);
            let difference = (interpolator.interp_vector_field(&field, &shifted).unwrap()
                - value)
                .length();
            assert!(difference < 1e3 * epsilon);
        }
    }

    #[test]
    fn interpolation_outside_grid_is_out_of_bounds() {
        let field = irregular_field();
        let interpolator = TrilinearInterpolator3::new();
        let upper = field.grid().upper_lattice_bounds();

        assert!(interpolator.interp_vector_field(&field, &upper).is_ok());
        assert!(interpolator
            .interp_vector_field(&field, &Vec3::zero())
            .is_ok());

        let err = interpolator
            .interp_vector_field(&field, &Vec3::new(upper[X] + 1e-9, 1.0, -1e-9))
            .unwrap_err();
        assert_eq!(
            err.crossings,
            In3D::new(
                BoundsCrossing::Upper,
                BoundsCrossing::None,
                BoundsCrossing::Lower
            )
        );
        assert!(interpolator
            .interp_vector_field(&field, &Vec3::new(f64::NAN, 0.0, 0.0))
            .is_err());
    }

    #[test]
    fn interpolation_works_in_flat_grids() {
        let grid = Arc::new(
            RegularGrid3::new(In3D::new(2, 2, 1), Vec3::zero(), Vec3::equal_components(1.0))
                .unwrap(),
        );
        let field =
            ScalarField3::from_ordered_values("s".to_string(), grid, vec![0.0, 1.0, 2.0, 3.0])
                .unwrap();
        let value = TrilinearInterpolator3
            .interp_scalar_field(&field, &Vec3::new(0.5, 0.5, 0.0))
            .unwrap();
        assert_abs_diff_eq!(value, 1.5, epsilon = 1e-15);
        assert_eq!(field.value(&Idx3::new(1, 1, 0)), 3.0);
    }
}
