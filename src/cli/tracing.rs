//! Command line arguments for configuring trajectory tracing and classification.

use super::utils as cli_utils;
use crate::{
    exit_on_error, exit_on_false,
    tracing::{ftr, trajectory::TrajectoryConfig},
    tropicity::{ClassificationConfig, MagneticFieldDirection},
};
use clap::{Arg, ArgMatches, Command};

/// Adds arguments for the magnetic field direction and the tracing parameters.
pub fn add_tracing_arguments(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("magnetic-field-direction")
                .short('b')
                .long("magnetic-field-direction")
                .require_equals(true)
                .value_name("DIRECTION")
                .help(
                    "Direction of the external magnetic field\n\
                     (x, -x, y, -y, z, -z, or the numeric codes 0-5)",
                )
                .next_line_help(true)
                .takes_value(true)
                .allow_hyphen_values(true)
                .required(true),
        )
        .arg(
            Arg::new("step-length")
                .long("step-length")
                .require_equals(true)
                .value_name("VALUE")
                .help("Step length in lattice units")
                .next_line_help(true)
                .takes_value(true)
                .default_value("0.01"),
        )
        .arg(
            Arg::new("max-steps")
                .long("max-steps")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Maximum number of steps for each trajectory")
                .next_line_help(true)
                .takes_value(true)
                .default_value("20000"),
        )
        .arg(
            Arg::new("min-field-magnitude")
                .long("min-field-magnitude")
                .require_equals(true)
                .value_name("VALUE")
                .help("Field magnitude below which the field is considered singular")
                .next_line_help(true)
                .takes_value(true)
                .default_value("1e-12"),
        )
        .arg(
            Arg::new("stepping-scheme")
                .long("stepping-scheme")
                .require_equals(true)
                .value_name("SCHEME")
                .help("Scheme for integrating the trajectories")
                .next_line_help(true)
                .takes_value(true)
                .possible_values(["euler", "rk4"])
                .default_value("euler"),
        )
        .arg(
            Arg::new("closed-loop-tolerance")
                .long("closed-loop-tolerance")
                .require_equals(true)
                .value_name("VALUE")
                .help(
                    "Stop trajectories returning within this lattice distance of their start\n\
                     [default: no closed loop detection]",
                )
                .next_line_help(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("revolution-threshold")
                .long("revolution-threshold")
                .require_equals(true)
                .value_name("VALUE")
                .help("Number of revolutions required for a definite classification")
                .next_line_help(true)
                .takes_value(true)
                .default_value("4"),
        )
}

/// Creates a trajectory configuration from the tracing arguments.
pub fn construct_trajectory_config_from_options(arguments: &ArgMatches) -> TrajectoryConfig {
    let step_length: ftr =
        cli_utils::get_finite_float_value_from_required_parseable_argument(arguments, "step-length");
    let max_steps: usize =
        cli_utils::get_value_from_required_parseable_argument(arguments, "max-steps");
    let min_field_magnitude: ftr = cli_utils::get_finite_float_value_from_required_parseable_argument(
        arguments,
        "min-field-magnitude",
    );
    let stepping_scheme =
        cli_utils::get_value_from_required_parseable_argument(arguments, "stepping-scheme");
    let closed_loop_tolerance: Option<ftr> =
        cli_utils::get_value_from_parseable_argument(arguments, "closed-loop-tolerance");

    exit_on_false!(
        step_length > 0.0,
        "Error: step-length must be larger than zero"
    );
    exit_on_false!(max_steps > 0, "Error: max-steps must be larger than zero");
    exit_on_false!(
        min_field_magnitude >= 0.0,
        "Error: min-field-magnitude must not be negative"
    );
    if let Some(tolerance) = closed_loop_tolerance {
        exit_on_false!(
            tolerance.is_finite() && tolerance > 0.0,
            "Error: closed-loop-tolerance must be a positive finite value"
        );
    }

    TrajectoryConfig {
        step_length,
        max_steps,
        min_field_magnitude,
        stepping_scheme,
        closed_loop_tolerance,
    }
}

/// Creates a classification configuration from the tracing arguments.
pub fn construct_classification_config_from_options(
    arguments: &ArgMatches,
) -> ClassificationConfig {
    let direction_string = arguments
        .value_of("magnetic-field-direction")
        .expect("No value for required argument");
    let direction: MagneticFieldDirection = exit_on_error!(
        direction_string.parse(),
        "Error: Invalid magnetic field direction {0}: {1}",
        direction_string
    );
    let revolution_threshold: ftr = cli_utils::get_finite_float_value_from_required_parseable_argument(
        arguments,
        "revolution-threshold",
    );
    exit_on_false!(
        revolution_threshold >= 0.0,
        "Error: revolution-threshold must not be negative"
    );
    ClassificationConfig {
        direction,
        revolution_threshold,
    }
}
