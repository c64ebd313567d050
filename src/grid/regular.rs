//! Structured grids with uniform spacing in all dimensions.

use super::{BoundsCrossing, GridPointQuery3};
use crate::{
    error::GridError,
    geometry::{
        Dim3::{self, X, Y, Z},
        Idx3, In3D, Vec3,
    },
    num::BFloat,
};

/// The lattice cell enclosing a lattice-space position, along with
/// the fractional offsets of the position within the cell.
#[derive(Clone, Debug, PartialEq)]
pub struct EnclosingCell3<F: BFloat> {
    /// Indices of the lower corner of the cell.
    pub lower: Idx3<usize>,
    /// Indices of the upper corner of the cell. Equals the lower index along
    /// dimensions with only a single lattice point.
    pub upper: Idx3<usize>,
    /// Offsets of the position from the lower corner, in `[0, 1]`.
    pub offsets: Vec3<F>,
}

/// A regular 3D lattice.
///
/// Lattice point `(i, j, k)` sits at the physical position
/// `origin + (i, j, k) ⊙ spacing`.
#[derive(Clone, Debug, PartialEq)]
pub struct RegularGrid3<F: BFloat> {
    shape: In3D<usize>,
    origin: Vec3<F>,
    spacing: Vec3<F>,
}

impl<F: BFloat> RegularGrid3<F> {
    /// Creates a new regular grid with the given shape, origin and spacing.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the new grid.
    /// - `Err`: Contains a `GridError` if any dimension is empty, any spacing
    ///   is not positive and finite, or the number of vector components
    ///   overflows `usize`.
    pub fn new(shape: In3D<usize>, origin: Vec3<F>, spacing: Vec3<F>) -> Result<Self, GridError> {
        if shape.into_iter().any(|&size| size == 0) {
            return Err(GridError::EmptyDimension(shape));
        }
        if !origin.is_finite() {
            return Err(GridError::InvalidOrigin(origin.to_string()));
        }
        if spacing
            .into_iter()
            .any(|&delta| !(delta.is_finite() && delta > F::zero()))
        {
            return Err(GridError::InvalidSpacing(spacing.to_string()));
        }
        if Self::checked_value_count(&shape, 3).is_none() {
            return Err(GridError::TooManyPoints(shape));
        }
        Ok(Self {
            shape,
            origin,
            spacing,
        })
    }

    /// Returns the number of lattice points along each dimension.
    pub fn shape(&self) -> &In3D<usize> {
        &self.shape
    }

    /// Returns the physical position of lattice point `(0, 0, 0)`.
    pub fn origin(&self) -> &Vec3<F> {
        &self.origin
    }

    /// Returns the physical distance between adjacent lattice points along each dimension.
    pub fn spacing(&self) -> &Vec3<F> {
        &self.spacing
    }

    /// Returns the total number of lattice points.
    pub fn number_of_points(&self) -> usize {
        self.shape[X] * self.shape[Y] * self.shape[Z]
    }

    /// Number of values needed to store the given number of components per
    /// point, or `None` if it overflows.
    fn checked_value_count(shape: &In3D<usize>, number_of_components: usize) -> Option<usize> {
        shape[X]
            .checked_mul(shape[Y])?
            .checked_mul(shape[Z])?
            .checked_mul(number_of_components)
    }

    /// Returns the largest valid lattice coordinate along each dimension.
    pub fn upper_lattice_bounds(&self) -> Vec3<F> {
        Vec3::with_each_component(|dim| {
            F::from_usize(self.shape[dim] - 1).expect("Conversion failed")
        })
    }

    /// Converts a lattice-space position into a physical position.
    pub fn lattice_to_physical(&self, position: &Vec3<F>) -> Vec3<F> {
        Vec3::with_each_component(|dim| self.origin[dim] + position[dim] * self.spacing[dim])
    }

    /// Converts a physical position into a lattice-space position.
    pub fn physical_to_lattice(&self, position: &Vec3<F>) -> Vec3<F> {
        Vec3::with_each_component(|dim| (position[dim] - self.origin[dim]) / self.spacing[dim])
    }

    /// Returns the lattice index along the given dimension nearest to the given
    /// physical coordinate, or `None` if that index is outside the grid.
    pub fn nearest_index(&self, dim: Dim3, coordinate: F) -> Option<usize> {
        let lattice_coord = ((coordinate - self.origin[dim]) / self.spacing[dim]).round();
        if lattice_coord.is_finite()
            && lattice_coord >= F::zero()
            && lattice_coord < F::from_usize(self.shape[dim]).expect("Conversion failed")
        {
            lattice_coord.to_usize()
        } else {
            None
        }
    }

    /// Returns the linear index of the given lattice point, with the
    /// x-index varying fastest.
    pub fn linear_index(&self, indices: &Idx3<usize>) -> usize {
        indices[X] + self.shape[X] * (indices[Y] + self.shape[Y] * indices[Z])
    }

    /// Returns the lattice point with the given linear index (x-index varying fastest).
    pub fn indices_from_linear(&self, linear_idx: usize) -> Idx3<usize> {
        let i = linear_idx % self.shape[X];
        let rest = linear_idx / self.shape[X];
        Idx3::new(i, rest % self.shape[Y], rest / self.shape[Y])
    }

    /// Returns the lattice-space position of the given lattice point.
    pub fn lattice_position(&self, indices: &Idx3<usize>) -> Vec3<F> {
        Vec3::with_each_component(|dim| F::from_usize(indices[dim]).expect("Conversion failed"))
    }

    /// Determines for each dimension whether the given lattice-space position
    /// crosses the lower or upper bound of the grid.
    ///
    /// The bounds themselves are inside. NaN coordinates count as crossing the
    /// lower bound.
    pub fn bounds_crossings(&self, position: &Vec3<F>) -> In3D<BoundsCrossing> {
        let upper = self.upper_lattice_bounds();
        In3D::with_each_component(|dim| {
            let coord = position[dim];
            if coord > upper[dim] {
                BoundsCrossing::Upper
            } else if coord >= F::zero() {
                BoundsCrossing::None
            } else {
                BoundsCrossing::Lower
            }
        })
    }

    /// Whether the given lattice-space position lies inside the grid (bounds included).
    pub fn contains(&self, position: &Vec3<F>) -> bool {
        self.bounds_crossings(position)
            .into_iter()
            .all(|&crossing| crossing == BoundsCrossing::None)
    }

    /// Finds the lattice cell containing the given lattice-space position.
    ///
    /// # Returns
    ///
    /// A `GridPointQuery3` which is either:
    ///
    /// - `Inside`: Contains the enclosing cell. A position on the upper
    ///   boundary is assigned to the last cell with offset one.
    /// - `Outside`: Contains the bounds crossing for each dimension.
    pub fn find_enclosing_cell(&self, position: &Vec3<F>) -> GridPointQuery3<EnclosingCell3<F>> {
        let crossings = self.bounds_crossings(position);
        if crossings
            .into_iter()
            .any(|&crossing| crossing != BoundsCrossing::None)
        {
            return GridPointQuery3::Outside(crossings);
        }

        let mut lower = Idx3::same(0);
        let mut upper = Idx3::same(0);
        let mut offsets = Vec3::zero();

        for dim in Dim3::slice() {
            let size = self.shape[dim];
            if size == 1 {
                continue;
            }
            let coord = position[dim];
            let floor = coord.floor().to_usize().expect("Conversion failed");
            let lower_idx = usize::min(floor, size - 2);
            lower[dim] = lower_idx;
            upper[dim] = lower_idx + 1;
            offsets[dim] = coord - F::from_usize(lower_idx).expect("Conversion failed");
        }

        GridPointQuery3::Inside(EnclosingCell3 {
            lower,
            upper,
            offsets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_grid() -> RegularGrid3<f64> {
        RegularGrid3::new(
            In3D::new(4, 3, 2),
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(0.5, 1.0, 2.0),
        )
        .unwrap()
    }

    #[test]
    fn invalid_grid_metadata_is_rejected() {
        assert_eq!(
            RegularGrid3::new(In3D::new(2, 0, 2), Vec3::zero(), Vec3::equal_components(1.0)),
            Err(GridError::EmptyDimension(In3D::new(2, 0, 2)))
        );
        assert!(matches!(
            RegularGrid3::new(In3D::same(2), Vec3::zero(), Vec3::new(1.0, -1.0, 1.0)),
            Err(GridError::InvalidSpacing(_))
        ));
        assert!(matches!(
            RegularGrid3::new(In3D::same(2), Vec3::zero(), Vec3::new(1.0, f64::NAN, 1.0)),
            Err(GridError::InvalidSpacing(_))
        ));
        let huge = In3D::same(3_000_001);
        assert_eq!(
            RegularGrid3::new(huge, Vec3::zero(), Vec3::equal_components(1.0)),
            Err(GridError::TooManyPoints(huge))
        );
    }

    #[test]
    fn physical_and_lattice_positions_map_onto_each_other() {
        let grid = test_grid();
        let lattice = Vec3::new(2.0, 1.5, 0.25);
        let physical = grid.lattice_to_physical(&lattice);
        assert_eq!(physical, Vec3::new(0.0, 1.5, 2.5));
        assert_eq!(grid.physical_to_lattice(&physical), lattice);
    }

    #[test]
    fn nearest_index_rounds_and_rejects_outside() {
        let grid = test_grid();
        assert_eq!(grid.nearest_index(X, -0.3), Some(1));
        assert_eq!(grid.nearest_index(X, 0.45), Some(3));
        assert_eq!(grid.nearest_index(X, 0.9), None);
        assert_eq!(grid.nearest_index(Z, 0.5), None);
        assert_eq!(grid.nearest_index(Z, 3.2), Some(1));
    }

    #[test]
    fn linear_indices_have_x_varying_fastest() {
        let grid = test_grid();
        assert_eq!(grid.linear_index(&Idx3::new(1, 0, 0)), 1);
        assert_eq!(grid.linear_index(&Idx3::new(0, 1, 0)), 4);
        assert_eq!(grid.linear_index(&Idx3::new(0, 0, 1)), 12);
        for linear_idx in 0..grid.number_of_points() {
            let indices = grid.indices_from_linear(linear_idx);
            assert_eq!(grid.linear_index(&indices), linear_idx);
        }
    }

    #[test]
    fn enclosing_cell_search_works() {
        let grid = test_grid();
        assert_eq!(
            grid.find_enclosing_cell(&Vec3::new(1.25, 0.5, 0.0)),
            GridPointQuery3::Inside(EnclosingCell3 {
                lower: Idx3::new(1, 0, 0),
                upper: Idx3::new(2, 1, 1),
                offsets: Vec3::new(0.25, 0.5, 0.0)
            })
        );
        assert_eq!(
            grid.find_enclosing_cell(&Vec3::new(3.0, 2.0, 1.0)),
            GridPointQuery3::Inside(EnclosingCell3 {
                lower: Idx3::new(2, 1, 0),
                upper: Idx3::new(3, 2, 1),
                offsets: Vec3::new(1.0, 1.0, 1.0)
            })
        );
        assert_eq!(
            grid.find_enclosing_cell(&Vec3::new(3.0 + 1e-9, -1e-9, 0.5)),
            GridPointQuery3::Outside(In3D::new(
                BoundsCrossing::Upper,
                BoundsCrossing::Lower,
                BoundsCrossing::None
            ))
        );
    }

    #[test]
    fn single_point_dimensions_are_supported() {
        let grid =
            RegularGrid3::new(In3D::new(3, 3, 1), Vec3::zero(), Vec3::equal_components(1.0))
                .unwrap();
        assert!(grid.contains(&Vec3::new(1.5, 2.0, 0.0)));
        assert!(!grid.contains(&Vec3::new(1.5, 2.0, 0.1)));
        let cell = grid
            .find_enclosing_cell(&Vec3::new(1.5, 2.0, 0.0))
            .inside()
            .unwrap();
        assert_eq!(cell.lower[Z], 0);
        assert_eq!(cell.upper[Z], 0);
    }
}
