//! Error types and error reporting macros.

use crate::geometry::{In3D, Vec3};
use crate::grid::BoundsCrossing;
use std::{error, fmt, io};

#[cfg(not(feature = "for-testing"))]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        eprintln!($($print_arg)*);
        quit::with_code(1);
    }};
}

#[cfg(feature = "for-testing")]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        panic!($($print_arg)*);
    }};
}

#[macro_export]
macro_rules! exit_on_error {
    ($result:expr, $($print_arg:tt)*) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                $crate::exit_with_error!($($print_arg)*, err)
            }
        }
    };
}

#[macro_export]
macro_rules! exit_on_false {
    ($logic:expr, $($print_arg:tt)*) => {
        if $logic {
            true
        } else {
            $crate::exit_with_error!($($print_arg)*)
        }
    };
}

#[macro_export]
macro_rules! exit_on_none {
    ($option:expr, $($print_arg:tt)*) => {
        $option.unwrap_or_else(|| $crate::exit_with_error!($($print_arg)*))
    };
}

/// Inconsistent or missing grid data encountered when constructing a field.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A required piece of grid metadata was not supplied.
    MissingMetadata(String),
    /// The grid shape has a zero-sized dimension.
    EmptyDimension(In3D<usize>),
    /// The grid origin was not finite.
    InvalidOrigin(String),
    /// A grid spacing was zero, negative or not finite.
    InvalidSpacing(String),
    /// The number of supplied samples does not match the grid shape.
    SampleCountMismatch { expected: usize, actual: usize },
    /// An extent bound pair whose span cannot be represented.
    InvalidExtent { start: i64, end: i64 },
    /// The grid has more lattice values than can be addressed.
    TooManyPoints(In3D<usize>),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMetadata(what) => write!(f, "Malformed grid: missing {}", what),
            Self::EmptyDimension(shape) => {
                write!(f, "Malformed grid: shape {} has a zero-sized dimension", shape)
            }
            Self::InvalidOrigin(origin) => {
                write!(f, "Malformed grid: origin {} is not finite", origin)
            }
            Self::InvalidSpacing(spacing) => {
                write!(f, "Malformed grid: spacing {} is not positive and finite", spacing)
            }
            Self::SampleCountMismatch { expected, actual } => write!(
                f,
                "Malformed grid: expected {} samples but got {}",
                expected, actual
            ),
            Self::InvalidExtent { start, end } => {
                write!(f, "Malformed grid: extent {} {} is too large", start, end)
            }
            Self::TooManyPoints(shape) => {
                write!(f, "Malformed grid: shape {} has too many points", shape)
            }
        }
    }
}

impl error::Error for GridError {}

impl From<GridError> for io::Error {
    fn from(err: GridError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err.to_string())
    }
}

/// A lattice-space query that fell outside the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct OutOfBoundsError {
    /// The offending lattice-space position.
    pub position: Vec3<f64>,
    /// Which bound was crossed along each dimension.
    pub crossings: In3D<BoundsCrossing>,
}

impl fmt::Display for OutOfBoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lattice position {} is outside the grid (crossings: {:?})",
            self.position, self.crossings
        )
    }
}

impl error::Error for OutOfBoundsError {}

impl From<OutOfBoundsError> for io::Error {
    fn from(err: OutOfBoundsError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
    }
}
