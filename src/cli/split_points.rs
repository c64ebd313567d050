//! Command line interface for splitting weighted integration points.

use super::{tracing as cli_tracing, utils as cli_utils};
use crate::{
    exit_on_error, exit_on_false,
    interpolation::trilinear::TrilinearInterpolator3,
    io::{text, utils as io_utils},
    tropicity::{self, Tropicity},
};
use clap::{Arg, ArgMatches, Command};
use std::path::{Path, PathBuf};

/// Builds a representation of the `split_points` command line subcommand.
pub fn create_split_points_subcommand() -> Command<'static> {
    let command = Command::new("split_points")
        .about("Split weighted integration points into isotropic and paratropic sets")
        .long_about(
            "Split weighted integration points into isotropic and paratropic sets.\n\
             The points (one `x y z` triple per line, in physical coordinates) and the\n\
             weights (one value per line) are written to new files with the suffixes\n\
             -isotropic and -paratropic. Undetermined points are left out.",
        );
    let command = cli_utils::add_common_arguments(command)
        .arg(
            Arg::new("points-file")
                .value_name("POINTS_FILE")
                .help("Path to the text file with the integration points")
                .index(2)
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("weights-file")
                .value_name("WEIGHTS_FILE")
                .help("Path to the text file with the integration weights")
                .index(3)
                .required(true)
                .takes_value(true),
        );
    cli_tracing::add_tracing_arguments(command)
}

/// Returns the path with the name of the given class appended to the file name.
pub fn output_path_for_class<P: AsRef<Path>>(input_file_path: P, tropicity: Tropicity) -> PathBuf {
    let mut file_path = input_file_path.as_ref().as_os_str().to_os_string();
    file_path.push("-");
    file_path.push(tropicity.name());
    PathBuf::from(file_path)
}

/// Runs the actions for the `split_points` subcommand using the given arguments.
pub fn run_split_points_subcommand(arguments: &ArgMatches) {
    let points_file_path = Path::new(
        arguments
            .value_of("points-file")
            .expect("No value for required argument"),
    );
    let weights_file_path = Path::new(
        arguments
            .value_of("weights-file")
            .expect("No value for required argument"),
    );

    let output_paths = [
        output_path_for_class(points_file_path, Tropicity::Isotropic),
        output_path_for_class(weights_file_path, Tropicity::Isotropic),
        output_path_for_class(points_file_path, Tropicity::Paratropic),
        output_path_for_class(weights_file_path, Tropicity::Paratropic),
    ];
    let overwrite_mode = cli_utils::overwrite_mode_from_arguments(arguments);
    for output_path in &output_paths {
        exit_on_error!(
            io_utils::check_if_write_allowed(output_path, overwrite_mode),
            "Error: {}"
        );
    }

    let trajectory_config = cli_tracing::construct_trajectory_config_from_options(arguments);
    let classification_config =
        cli_tracing::construct_classification_config_from_options(arguments);
    let verbosity = cli_utils::parse_verbosity(arguments, true);

    let points = exit_on_error!(
        text::read_points(points_file_path),
        "Error: Could not read points: {}"
    );
    let weights = exit_on_error!(
        text::read_weights(weights_file_path),
        "Error: Could not read weights: {}"
    );
    exit_on_false!(
        points.len() == weights.len(),
        "Error: Number of points ({}) does not match number of weights ({})",
        points.len(),
        weights.len()
    );

    let input = cli_utils::read_input_file(arguments, &verbosity);
    let field = exit_on_error!(
        input.vector_field(arguments.value_of("vector-quantity")),
        "Error: Could not obtain vector field: {}"
    );

    let partition = tropicity::split_point_set(
        &field,
        &TrilinearInterpolator3::new(),
        &points,
        &weights,
        &trajectory_config,
        &classification_config,
        &verbosity,
    );

    let [isotropic_points_path, isotropic_weights_path, paratropic_points_path, paratropic_weights_path] =
        &output_paths;
    exit_on_error!(
        text::save_points(
            isotropic_points_path,
            overwrite_mode,
            &partition.isotropic_points
        ),
        "Error: Could not write isotropic points: {}"
    );
    exit_on_error!(
        text::save_weights(
            isotropic_weights_path,
            overwrite_mode,
            &partition.isotropic_weights
        ),
        "Error: Could not write isotropic weights: {}"
    );
    exit_on_error!(
        text::save_points(
            paratropic_points_path,
            overwrite_mode,
            &partition.paratropic_points
        ),
        "Error: Could not write paratropic points: {}"
    );
    exit_on_error!(
        text::save_weights(
            paratropic_weights_path,
            overwrite_mode,
            &partition.paratropic_weights
        ),
        "Error: Could not write paratropic weights: {}"
    );

    if verbosity.print_messages() {
        println!(
            "Split {} points: {}",
            partition.counts.total(),
            partition.counts
        );
    }
}
