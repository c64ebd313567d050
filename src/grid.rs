//! Regular lattices carrying field samples.

pub mod regular;

/// A potential crossing of the lower or upper bounds of a grid dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoundsCrossing {
    None,
    Upper,
    Lower,
}

/// The result of a grid point query, which either produced a value
/// or found that the query point lies outside the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridPointQuery3<T> {
    Inside(T),
    Outside(crate::geometry::In3D<BoundsCrossing>),
}

impl<T> GridPointQuery3<T> {
    /// Returns the contained value, or `None` if the point was outside.
    pub fn inside(self) -> Option<T> {
        match self {
            Self::Inside(value) => Some(value),
            Self::Outside(_) => None,
        }
    }
}
