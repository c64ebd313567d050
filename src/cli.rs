//! Command line interface.

pub mod build;
pub mod run;
pub mod split_grid;
pub mod split_points;
pub mod tracing;
pub mod trajectory;
pub mod trop_plane;
pub mod utils;
