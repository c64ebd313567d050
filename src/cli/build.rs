//! Function for building the command line hierarchy.

use super::{
    split_grid::create_split_grid_subcommand, split_points::create_split_points_subcommand,
    trajectory::create_trajectory_subcommand, trop_plane::create_trop_plane_subcommand,
};
use clap::{self, Arg, Command};

/// Build the `tropicity` command line hierarchy.
pub fn build() -> Command<'static> {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .propagate_version(true)
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .help("Display elapsed time when done"),
        )
        .subcommand(create_trop_plane_subcommand())
        .subcommand(create_split_grid_subcommand())
        .subcommand(create_split_points_subcommand())
        .subcommand(create_trajectory_subcommand())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_hierarchy_is_valid() {
        build().debug_assert();
    }

    #[test]
    fn tracing_options_have_defaults() {
        let arguments = build()
            .try_get_matches_from([
                "tropicity",
                "trop_plane",
                "in.vti",
                "out.txt",
                "--fixed-axis=z",
                "--fixed-coordinate=-0.5",
                "--magnetic-field-direction=-z",
            ])
            .unwrap();
        let (name, sub_arguments) = arguments.subcommand().unwrap();
        assert_eq!(name, "trop_plane");
        assert_eq!(sub_arguments.value_of("step-length"), Some("0.01"));
        assert_eq!(sub_arguments.value_of("stepping-scheme"), Some("euler"));
        assert_eq!(sub_arguments.value_of("fixed-coordinate"), Some("-0.5"));
        assert_eq!(
            sub_arguments.value_of("magnetic-field-direction"),
            Some("-z")
        );
        assert_eq!(sub_arguments.value_of("revolution-threshold"), Some("4"));
        assert!(!sub_arguments.is_present("closed-loop-tolerance"));
    }

    #[test]
    fn missing_direction_is_rejected() {
        assert!(build()
            .try_get_matches_from(["tropicity", "split_grid", "in.vti"])
            .is_err());
    }
}
