//! Command line interface for splitting a field into isotropic and paratropic parts.

use super::{tracing as cli_tracing, utils as cli_utils};
use crate::{
    exit_on_error,
    interpolation::trilinear::TrilinearInterpolator3,
    io::{utils as io_utils, vti},
    tropicity,
};
use clap::{Arg, ArgMatches, Command};

/// Builds a representation of the `split_grid` command line subcommand.
pub fn create_split_grid_subcommand() -> Command<'static> {
    let command = Command::new("split_grid")
        .about("Split the vector field into its isotropic and paratropic parts")
        .long_about(
            "Split the vector field into its isotropic and paratropic parts.\n\
             Every lattice point is classified. Each output keeps the samples of its own\n\
             class and sets all other samples to zero. Undetermined points are zero in\n\
             both outputs.",
        );
    let command = cli_utils::add_common_arguments(command)
        .arg(
            Arg::new("isotropic-output")
                .long("isotropic-output")
                .require_equals(true)
                .value_name("OUTPUT_FILE")
                .help("Path of the .vti file where the isotropic part should be saved")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("paratropic-output")
                .long("paratropic-output")
                .require_equals(true)
                .value_name("OUTPUT_FILE")
                .help("Path of the .vti file where the paratropic part should be saved")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("weight-quantity")
                .short('w')
                .long("weight-quantity")
                .require_equals(true)
                .value_name("NAME")
                .help(
                    "Name of the point data array holding integration weights to split along\n\
                     with the field [default: first single-component array, if any]",
                )
                .takes_value(true),
        );
    cli_tracing::add_tracing_arguments(command)
}

/// Runs the actions for the `split_grid` subcommand using the given arguments.
pub fn run_split_grid_subcommand(arguments: &ArgMatches) {
    let isotropic_output_path =
        cli_utils::get_output_path_with_extension(arguments, "isotropic-output", &["vti"]);
    let paratropic_output_path =
        cli_utils::get_output_path_with_extension(arguments, "paratropic-output", &["vti"]);
    let overwrite_mode = cli_utils::overwrite_mode_from_arguments(arguments);
    for output_path in [isotropic_output_path, paratropic_output_path] {
        exit_on_error!(
            io_utils::check_if_write_allowed(output_path, overwrite_mode),
            "Error: {}"
        );
    }

    let trajectory_config = cli_tracing::construct_trajectory_config_from_options(arguments);
    let classification_config =
        cli_tracing::construct_classification_config_from_options(arguments);
    let verbosity = cli_utils::parse_verbosity(arguments, true);

    let input = cli_utils::read_input_file(arguments, &verbosity);
    let field = exit_on_error!(
        input.vector_field(arguments.value_of("vector-quantity")),
        "Error: Could not obtain vector field: {}"
    );
    let weights = exit_on_error!(
        input.scalar_field(arguments.value_of("weight-quantity")),
        "Error: Could not obtain weights: {}"
    );

    if verbosity.print_messages() {
        println!(
            "Splitting {} ({}){}",
            field.name(),
            field.shape(),
            weights
                .as_ref()
                .map(|weights| format!(" with weights {}", weights.name()))
                .unwrap_or_default()
        );
    }

    let partition = tropicity::partition_by_classification(
        &field,
        weights.as_ref(),
        &TrilinearInterpolator3::new(),
        &trajectory_config,
        &classification_config,
        &verbosity,
    );

    exit_on_error!(
        vti::save_vti(
            isotropic_output_path,
            overwrite_mode,
            &partition.isotropic,
            partition.isotropic_weights.as_ref(),
        ),
        "Error: Could not write {0}: {1}",
        isotropic_output_path.display()
    );
    exit_on_error!(
        vti::save_vti(
            paratropic_output_path,
            overwrite_mode,
            &partition.paratropic,
            partition.paratropic_weights.as_ref(),
        ),
        "Error: Could not write {0}: {1}",
        paratropic_output_path.display()
    );

    if verbosity.print_messages() {
        println!(
            "Wrote {} and {}: {}",
            isotropic_output_path.display(),
            paratropic_output_path.display(),
            partition.counts()
        );
    }
}
