//! Command line interface for tracing and classifying a single trajectory.

use super::{tracing as cli_tracing, utils as cli_utils};
use crate::{
    exit_on_error, exit_on_false,
    geometry::Vec3,
    interpolation::trilinear::TrilinearInterpolator3,
    io::{text, utils as io_utils},
    tracing::ftr,
    tropicity,
};
use clap::{Arg, ArgMatches, Command};

/// Builds a representation of the `trajectory` command line subcommand.
pub fn create_trajectory_subcommand() -> Command<'static> {
    let command = Command::new("trajectory")
        .about("Trace the streamline from a single point and classify it")
        .long_about(
            "Trace the streamline from a single point and classify it.\n\
             The classification and the reason the trajectory stopped are printed,\n\
             and the trajectory positions are written to the output file.",
        );
    let command = cli_utils::add_common_arguments(command)
        .arg(
            Arg::new("output-file")
                .value_name("OUTPUT_FILE")
                .help(
                    "Path of the file where the trajectory should be saved\n\
                     Writes in the following format based on the file extension:\
                     \n    *.txt: Mathematica list of positions {{x,y,z},...}\
                     \n    *.json: Positions, stopping cause, accumulated rotation and\
                     \n            classification (requires the json feature)",
                )
                .index(2)
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("start")
                .short('s')
                .long("start")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("X,Y,Z")
                .help("Physical coordinates of the start point (comma-separated)")
                .takes_value(true)
                .multiple_values(true)
                .required(true),
        )
        .arg(
            Arg::new("physical-output")
                .long("physical-output")
                .help("Write positions in physical rather than lattice coordinates"),
        );
    cli_tracing::add_tracing_arguments(command)
}

/// Runs the actions for the `trajectory` subcommand using the given arguments.
pub fn run_trajectory_subcommand(arguments: &ArgMatches) {
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

    let physical_start: Vec3<ftr> = cli_utils::parse_3d_float_values(arguments, "start");
    let physical_output = arguments.is_present("physical-output");

    let trajectory_config = cli_tracing::construct_trajectory_config_from_options(arguments);
    let classification_config =
        cli_tracing::construct_classification_config_from_options(arguments);
    let verbosity = cli_utils::parse_verbosity(arguments, false);

    let input = cli_utils::read_input_file(arguments, &verbosity);
    let field = exit_on_error!(
        input.vector_field(arguments.value_of("vector-quantity")),
        "Error: Could not obtain vector field: {}"
    );
    let grid = field.grid();

    let start: Vec3<ftr> = Vec3::from(&grid.physical_to_lattice(&Vec3::from(&physical_start)));
    exit_on_false!(
        grid.contains(&Vec3::from(&start)),
        "Error: Start point {} is outside the grid",
        physical_start
    );

    let trajectory = exit_on_error!(
        tropicity::trace_from_point(
            &field,
            &TrilinearInterpolator3::new(),
            &start,
            &trajectory_config,
        ),
        "Error: Could not trace from {0}: {1}",
        physical_start
    );
    let accumulated_rotation =
        trajectory.accumulated_rotation(&classification_config.direction.unit_vector());
    let classification = trajectory.classify(
        &classification_config.direction,
        classification_config.revolution_threshold,
    );

    let positions = if physical_output {
        trajectory.physical_positions(grid)
    } else {
        trajectory.positions().to_vec()
    };

    let is_json = output_file_path
        .extension()
        .map_or(false, |extension| extension == "json");
    let result = if is_json {
        #[cfg(feature = "json")]
        {
            let record = text::TrajectoryRecord::new(
                &trajectory,
                &positions,
                accumulated_rotation,
                classification,
            );
            io_utils::save_data_as_json(output_file_path, overwrite_mode, &record)
        }
        #[cfg(not(feature = "json"))]
        crate::exit_with_error!(
            "Error: Compile with json feature in order to write JSON files\n\
             Tip: Use cargo flag --features=json"
        );
    } else {
        io_utils::write_atomically(output_file_path, overwrite_mode, |writer| {
            text::write_trajectory(writer, &positions)
        })
    };
    exit_on_error!(
        result,
        "Error: Could not write {0}: {1}",
        output_file_path.display()
    );

    if verbosity.print_messages() {
        println!(
            "Traced {} steps ({} positions) to {}",
            trajectory.number_of_steps(),
            positions.len(),
            output_file_path.display()
        );
        println!(
            "Accumulated rotation: {:.3} revolutions",
            accumulated_rotation / std::f64::consts::TAU
        );
    }
    println!("Classification: {}", classification);
    if let Some(stopping_cause) = trajectory.stopping_cause() {
        println!("Stopping cause: {}", stopping_cause);
    }
}
