//! Command line interface for classifying a plane of lattice points.

use super::{tracing as cli_tracing, utils as cli_utils};
use crate::{
    exit_on_error,
    geometry::Dim3,
    interpolation::trilinear::TrilinearInterpolator3,
    io::{text, utils as io_utils},
    tracing::ftr,
    tropicity::{self, ClassCounts},
};
use clap::{Arg, ArgMatches, Command};

/// Builds a representation of the `trop_plane` command line subcommand.
pub fn create_trop_plane_subcommand() -> Command<'static> {
    let command = Command::new("trop_plane")
        .about("Classify the streamlines through every lattice point of a coordinate plane")
        .long_about(
            "Classify the streamlines through every lattice point of a coordinate plane.\n\
             The plane is the lattice layer along the fixed axis nearest to the fixed\n\
             coordinate. Each point is written as -1 (isotropic), 0 (undetermined) or\n\
             1 (paratropic).",
        );
    let command = cli_utils::add_common_arguments(command)
        .arg(
            Arg::new("output-file")
                .value_name("OUTPUT_FILE")
                .help(
                    "Path of the file where the classifications should be saved\n\
                     Writes in the following format based on the file extension:\
                     \n    *.txt: Whitespace separated matrix with one row per index along the\
                     \n           first remaining axis\
                     \n    *.json: Nested JSON array (requires the json feature)",
                )
                .index(2)
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("fixed-axis")
                .short('a')
                .long("fixed-axis")
                .require_equals(true)
                .value_name("AXIS")
                .help("Axis perpendicular to the plane (x, y, z or 0, 1, 2)")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("fixed-coordinate")
                .short('c')
                .long("fixed-coordinate")
                .require_equals(true)
                .value_name("VALUE")
                .help("Physical coordinate of the plane along the fixed axis")
                .takes_value(true)
                .allow_hyphen_values(true)
                .required(true),
        );
    cli_tracing::add_tracing_arguments(command)
}

/// Runs the actions for the `trop_plane` subcommand using the given arguments.
pub fn run_trop_plane_subcommand(arguments: &ArgMatches) {
    let output_file_path = cli_utils::get_output_path_with_extension(
        arguments,
        "output-file",
        cli_utils::TEXT_OUTPUT_EXTENSIONS,
    );
    let overwrite_mode = cli_utils::overwrite_mode_from_arguments(arguments);
    exit_on_error!(
        io_utils::check_if_write_allowed(output_file_path, overwrite_mode),
        "Error: {}"
    );

    let fixed_axis_string = arguments
        .value_of("fixed-axis")
        .expect("No value for required argument");
    let fixed_axis: Dim3 = exit_on_error!(tropicity::parse_axis(fixed_axis_string), "Error: {}");
    let fixed_coordinate: ftr = cli_utils::get_finite_float_value_from_required_parseable_argument(
        arguments,
        "fixed-coordinate",
    );

    let trajectory_config = cli_tracing::construct_trajectory_config_from_options(arguments);
    let classification_config =
        cli_tracing::construct_classification_config_from_options(arguments);
    let verbosity = cli_utils::parse_verbosity(arguments, true);

    let input = cli_utils::read_input_file(arguments, &verbosity);
    let field = exit_on_error!(
        input.vector_field(arguments.value_of("vector-quantity")),
        "Error: Could not obtain vector field: {}"
    );

    let classifications = exit_on_error!(
        tropicity::classify_plane(
            &field,
            &TrilinearInterpolator3::new(),
            fixed_axis,
            fixed_coordinate,
            &trajectory_config,
            &classification_config,
            &verbosity,
        ),
        "Error: Fixed coordinate {0} along {1} is outside the grid: {2}",
        fixed_coordinate,
        fixed_axis
    );

    let is_json = output_file_path
        .extension()
        .map_or(false, |extension| extension == "json");
    let result = if is_json {
        #[cfg(feature = "json")]
        {
            io_utils::write_atomically(output_file_path, overwrite_mode, |writer| {
                text::write_trop_plane_as_json(writer, &classifications)
            })
        }
        #[cfg(not(feature = "json"))]
        crate::exit_with_error!(
            "Error: Compile with json feature in order to write JSON files\n\
             Tip: Use cargo flag --features=json"
        );
    } else {
        io_utils::write_atomically(output_file_path, overwrite_mode, |writer| {
            text::write_trop_plane(writer, &classifications)
        })
    };
    exit_on_error!(
        result,
        "Error: Could not write {0}: {1}",
        output_file_path.display()
    );

    if verbosity.print_messages() {
        println!(
            "Wrote classifications to {}: {}",
            output_file_path.display(),
            ClassCounts::from_classifications(&classifications)
        );
    }
}
