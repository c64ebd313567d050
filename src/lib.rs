//! The `tropicity` crate classifies the streamlines of induced current
//! density fields as isotropic or paratropic by their rotation around the
//! external magnetic field.

pub mod error;

#[cfg(feature = "cli")]
pub mod cli;

pub mod field;
pub mod geometry;
pub mod grid;
pub mod interpolation;
pub mod io;
pub mod num;
pub mod tracing;
pub mod tropicity;
