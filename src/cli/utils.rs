//! Utilities for creating the command line interface.

use crate::{
    exit_on_error, exit_on_false, exit_with_error,
    geometry::Vec3,
    io::{vti::VtiFile, OverwriteMode, Verbosity},
    num::BFloat,
};
use clap::{Arg, ArgMatches, Command};
use indicatif::ProgressStyle;
use lazy_static::lazy_static;
use std::{path::Path, str::FromStr};

lazy_static! {
    static ref DEFAULT_PROGRESS_STYLE: ProgressStyle = ProgressStyle::default_bar()
        .template("Progress: {bar:40}  {percent}% | ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
}

/// Extensions of the supported text-based output formats.
#[cfg(feature = "json")]
pub const TEXT_OUTPUT_EXTENSIONS: &[&str] = &["txt", "json"];
#[cfg(not(feature = "json"))]
pub const TEXT_OUTPUT_EXTENSIONS: &[&str] = &["txt"];

pub fn parse_value_string<T>(argument_name: &str, value_string: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    exit_on_error!(
        value_string.parse(),
        "Error: Could not parse value for {0}: {1}",
        argument_name
    )
}

fn verify_finite_float_value<F: BFloat>(argument_name: &str, value: F) {
    exit_on_false!(value.is_finite(), "Error: {} must be finite", argument_name);
}

pub fn get_value_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_value_string(
        argument_name,
        arguments
            .value_of(argument_name)
            .expect("No value for required argument"),
    )
}

pub fn get_finite_float_value_from_required_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> F
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let value: F = get_value_from_required_parseable_argument(arguments, argument_name);
    verify_finite_float_value(argument_name, value);
    value
}

pub fn get_value_from_parseable_argument<T>(arguments: &ArgMatches, argument_name: &str) -> Option<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    arguments
        .value_of(argument_name)
        .map(|value_string| parse_value_string(argument_name, value_string))
}

/// Parses the three comma-separated finite values of the given required argument.
pub fn parse_3d_float_values<F>(arguments: &ArgMatches, argument_name: &str) -> Vec3<F>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: std::fmt::Display,
{
    let values: Vec<F> = arguments
        .values_of(argument_name)
        .expect("No values for required argument")
        .filter(|value_string| !value_string.is_empty())
        .map(|value_string| parse_value_string(argument_name, value_string))
        .collect();

    exit_on_false!(
        values.len() == 3,
        "Error: {} must have 3 values, got {}",
        argument_name,
        values.len()
    );
    values
        .iter()
        .for_each(|&value| verify_finite_float_value(argument_name, value));

    Vec3::new(values[0], values[1], values[2])
}

/// Returns the path given for the required argument, which must have one of
/// the given extensions.
pub fn get_output_path_with_extension<'a>(
    arguments: &'a ArgMatches,
    argument_name: &str,
    valid_extensions: &[&str],
) -> &'a Path {
    let output_file_path = Path::new(
        arguments
            .value_of(argument_name)
            .expect("No value for required argument"),
    );
    let extension = output_file_path
        .extension()
        .unwrap_or_else(|| {
            exit_with_error!(
                "Error: Missing extension for output file\n\
                 Valid extensions are: {}",
                valid_extensions.join(", ")
            )
        })
        .to_string_lossy();
    exit_on_false!(
        valid_extensions.contains(&extension.as_ref()),
        "Error: Invalid extension {} for output file\n\
         Valid extensions are: {}",
        extension,
        valid_extensions.join(", ")
    );
    output_file_path
}

/// Reads the VTK ImageData file given by the `input-file` argument.
pub fn read_input_file(arguments: &ArgMatches, verbosity: &Verbosity) -> VtiFile {
    let input_file_path = Path::new(
        arguments
            .value_of("input-file")
            .expect("No value for required argument"),
    );
    if verbosity.print_messages() {
        println!("Reading {}", input_file_path.display());
    }
    exit_on_error!(
        VtiFile::read(input_file_path),
        "Error: Could not read input file {0}: {1}",
        input_file_path.display()
    )
}

/// Adds the input file and the arguments shared by all commands.
pub fn add_common_arguments(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("input-file")
                .value_name("INPUT_FILE")
                .help("Path to the VTK ImageData (.vti) file containing the vector field")
                .index(1)
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("vector-quantity")
                .short('q')
                .long("vector-quantity")
                .require_equals(true)
                .value_name("NAME")
                .help(
                    "Name of the point data array holding the vector field\n\
                     [default: first 3-component array]",
                )
                .takes_value(true),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .help("Automatically overwrite any existing files"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print status messages"),
        )
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .help("Show progress bar for classification (also implies `verbose`)"),
        )
}

pub fn overwrite_mode_from_arguments(arguments: &ArgMatches) -> OverwriteMode {
    if arguments.is_present("overwrite") {
        OverwriteMode::Always
    } else {
        OverwriteMode::Never
    }
}

pub fn parse_verbosity(arguments: &ArgMatches, support_progress: bool) -> Verbosity {
    if support_progress && arguments.is_present("progress") {
        Verbosity::Progress(DEFAULT_PROGRESS_STYLE.clone())
    } else if arguments.is_present("verbose") || arguments.is_present("progress") {
        Verbosity::Messages
    } else {
        Verbosity::Quiet
    }
}
