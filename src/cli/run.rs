//! Function for running the command line program.

use super::{
    build, split_grid::run_split_grid_subcommand, split_points::run_split_points_subcommand,
    trajectory::run_trajectory_subcommand, trop_plane::run_trop_plane_subcommand,
};
use clap::ArgMatches;
use std::time::Instant;

/// Runs the `tropicity` command line program.
pub fn run() {
    run_with_args(build::build().get_matches());
}

/// Runs the `tropicity` command line program with the given parsed arguments.
pub fn run_with_args(arguments: ArgMatches) {
    let start_instant = Instant::now();

    match arguments.subcommand() {
        Some(("trop_plane", subcommand_arguments)) => {
            run_trop_plane_subcommand(subcommand_arguments)
        }
        Some(("split_grid", subcommand_arguments)) => {
            run_split_grid_subcommand(subcommand_arguments)
        }
        Some(("split_points", subcommand_arguments)) => {
            run_split_points_subcommand(subcommand_arguments)
        }
        Some(("trajectory", subcommand_arguments)) => {
            run_trajectory_subcommand(subcommand_arguments)
        }
        _ => unreachable!("Subcommand is required"),
    }

    if arguments.is_present("timing") {
        println!("Elapsed time: {} s", start_instant.elapsed().as_secs_f64());
    }
}
