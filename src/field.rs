//! Scalar and vector fields sampled on a regular lattice.

use crate::{
    error::GridError,
    geometry::{
        Dim3::{self, X, Y, Z},
        Idx3, In3D, Vec3,
    },
    grid::regular::RegularGrid3,
    num::BFloat,
};
use ndarray::{prelude::*, Zip};
use std::sync::Arc;

/// Creates a column-major 3D array from values ordered with the x-index varying fastest.
fn array_from_ordered_values<F: BFloat>(
    grid: &RegularGrid3<F>,
    values: Vec<F>,
) -> Result<Array3<F>, GridError> {
    let shape = grid.shape();
    let expected = grid.number_of_points();
    let actual = values.len();
    Array3::from_shape_vec((shape[X], shape[Y], shape[Z]).f(), values)
        .map_err(|_| GridError::SampleCountMismatch { expected, actual })
}

/// Collects the values of a 3D array with the x-index varying fastest.
fn ordered_values_from_array<F: BFloat>(values: &Array3<F>) -> Vec<F> {
    values.t().iter().cloned().collect()
}

/// A 3D scalar field.
///
/// Holds the grid and the values of the field at each lattice point.
/// The array of values is laid out in column-major order in memory.
#[derive(Clone, Debug)]
pub struct ScalarField3<F: BFloat> {
    name: String,
    grid: Arc<RegularGrid3<F>>,
    values: Array3<F>,
}

impl<F: BFloat> ScalarField3<F> {
    /// Creates a new scalar field given a name, a grid and the values.
    ///
    /// # Panics
    ///
    /// If the shape of the array of values differs from the shape of the grid.
    pub fn new(name: String, grid: Arc<RegularGrid3<F>>, values: Array3<F>) -> Self {
        let grid_shape = grid.shape();
        let values_shape = values.shape();
        assert!(
            grid_shape[X] == values_shape[0]
                && grid_shape[Y] == values_shape[1]
                && grid_shape[Z] == values_shape[2],
            "Shape of grid does not match shape of array of values."
        );
        Self { name, grid, values }
    }

    /// Creates a new scalar field from values ordered with the x-index varying fastest.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the new scalar field.
    /// - `Err`: Contains a `GridError::SampleCountMismatch` if the number of
    ///   values differs from the number of lattice points.
    pub fn from_ordered_values(
        name: String,
        grid: Arc<RegularGrid3<F>>,
        values: Vec<F>,
    ) -> Result<Self, GridError> {
        let values = array_from_ordered_values(&grid, values)?;
        Ok(Self::new(name, grid, values))
    }

    /// Returns a reference to the name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a reference to the grid.
    pub fn grid(&self) -> &RegularGrid3<F> {
        self.grid.as_ref()
    }

    /// Returns a new atomic reference counted pointer to the grid.
    pub fn arc_with_grid(&self) -> Arc<RegularGrid3<F>> {
        Arc::clone(&self.grid)
    }

    /// Returns a reference to the 3D array of field values.
    pub fn values(&self) -> &Array3<F> {
        &self.values
    }

    /// Returns the field value at the given 3D index.
    pub fn value(&self, indices: &Idx3<usize>) -> F {
        self.values[[indices[X], indices[Y], indices[Z]]]
    }

    /// Returns the 3D shape of the grid.
    pub fn shape(&self) -> &In3D<usize> {
        self.grid.shape()
    }

    /// Returns the field values ordered with the x-index varying fastest.
    pub fn ordered_values(&self) -> Vec<F> {
        ordered_values_from_array(&self.values)
    }

    /// Creates a copy of the field with the given name where all values
    /// outside the given mask are set to zero.
    pub fn masked(&self, name: String, mask: &Array3<bool>) -> Self {
        let mut values = self.values.clone();
        Zip::from(&mut values).and(mask).for_each(|value, &keep| {
            if !keep {
                *value = F::zero();
            }
        });
        Self::new(name, self.arc_with_grid(), values)
    }
}

/// A 3D vector field.
///
/// Holds the grid and the values of the three components of the field
/// at each lattice point.
#[derive(Clone, Debug)]
pub struct VectorField3<F: BFloat> {
    name: String,
    grid: Arc<RegularGrid3<F>>,
    components: In3D<Array3<F>>,
}

impl<F: BFloat> VectorField3<F> {
    /// Creates a new vector field given a name, a grid, and the arrays of component values.
    ///
    /// # Panics
    ///
    /// If the shape of any component array differs from the shape of the grid.
    pub fn new(name: String, grid: Arc<RegularGrid3<F>>, components: In3D<Array3<F>>) -> Self {
        let grid_shape = grid.shape();
        for values in &components {
            let values_shape = values.shape();
            assert!(
                grid_shape[X] == values_shape[0]
                    && grid_shape[Y] == values_shape[1]
                    && grid_shape[Z] == values_shape[2],
                "Shape of grid does not match shape of array of values."
            );
        }
        Self {
            name,
            grid,
            components,
        }
    }

    /// Creates a new vector field from field vectors ordered with the x-index varying fastest.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the new vector field.
    /// - `Err`: Contains a `GridError::SampleCountMismatch` if the number of
    ///   vectors differs from the number of lattice points.
    pub fn from_ordered_vectors(
        name: String,
        grid: Arc<RegularGrid3<F>>,
        vectors: Vec<Vec3<F>>,
    ) -> Result<Self, GridError> {
        let expected = grid.number_of_points();
        if vectors.len() != expected {
            return Err(GridError::SampleCountMismatch {
                expected,
                actual: vectors.len(),
            });
        }
        let component_values =
            |dim: Dim3| -> Vec<F> { vectors.iter().map(|vector| vector[dim]).collect() };
        let components = In3D::new(
            array_from_ordered_values(&grid, component_values(X))?,
            array_from_ordered_values(&grid, component_values(Y))?,
            array_from_ordered_values(&grid, component_values(Z))?,
        );
        Ok(Self::new(name, grid, components))
    }

    /// Returns a reference to the name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a reference to the grid.
    pub fn grid(&self) -> &RegularGrid3<F> {
        self.grid.as_ref()
    }

    /// Returns a new atomic reference counted pointer to the grid.
    pub fn arc_with_grid(&self) -> Arc<RegularGrid3<F>> {
        Arc::clone(&self.grid)
    }

    /// Returns a reference to the 3D array of values for the specified component.
    pub fn values(&self, dim: Dim3) -> &Array3<F> {
        &self.components[dim]
    }

    /// Returns the field vector at the given 3D index.
    pub fn vector(&self, indices: &Idx3<usize>) -> Vec3<F> {
        let idx = [indices[X], indices[Y], indices[Z]];
        Vec3::new(
            self.components[X][idx],
            self.components[Y][idx],
            self.components[Z][idx],
        )
    }

    /// Returns the 3D shape of the grid.
    pub fn shape(&self) -> &In3D<usize> {
        self.grid.shape()
    }

    /// Returns the field vectors ordered with the x-index varying fastest.
    pub fn ordered_vectors(&self) -> Vec<Vec3<F>> {
        let x = ordered_values_from_array(&self.components[X]);
        let y = ordered_values_from_array(&self.components[Y]);
        let z = ordered_values_from_array(&self.components[Z]);
        x.into_iter()
            .zip(y)
            .zip(z)
            .map(|((x, y), z)| Vec3::new(x, y, z))
            .collect()
    }

    /// Creates a copy of the field with the given name where all vectors
    /// outside the given mask are set to zero.
    pub fn masked(&self, name: String, mask: &Array3<bool>) -> Self {
        let components = In3D::with_each_component(|dim| {
            let mut values = self.components[dim].clone();
            Zip::from(&mut values).and(mask).for_each(|value, &keep| {
                if !keep {
                    *value = F::zero();
                }
            });
            values
        });
        Self::new(name, self.arc_with_grid(), components)
    }
}
