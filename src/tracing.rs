//! Tracing streamlines of a vector field.

pub mod stepping;
pub mod trajectory;

/// Floating-point precision to use for tracing.
#[allow(non_camel_case_types)]
pub type ftr = f64;
