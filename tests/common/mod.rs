use lazy_static::lazy_static;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::TempDir;
use tropicity::{
    cli, exit_on_error,
    field::{ScalarField3, VectorField3},
    geometry::{In3D, Vec3},
    grid::regular::RegularGrid3,
    io::{fdt, vti, OverwriteMode},
};

#[macro_export]
macro_rules! def_test {
    (
        IN[$in_ident:ident]
        OUT[$($out_ident:ident = $out_str:expr),*]
        fn $name:ident $test_body:expr
    ) => {
        #[test]
        fn $name() {
            let test = common::Test::new();

            let $in_ident = test.input_path();
            $( let $out_ident = test.output_path($out_str); )*

            let test_body = |$in_ident, $( $out_ident, )*| $test_body;

            test_body(path_str!($in_ident), $( path_str!($out_ident), )*);
        }
    };
}

#[macro_export]
macro_rules! path_str {
    ($path:expr) => {
        $path.to_string_lossy().as_ref()
    };
}

pub fn run<I, T>(args: I)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    cli::run::run_with_args(COMMAND.clone().get_matches_from(args));
}

pub fn assert_file_exists<P: AsRef<Path>>(file_path: P) {
    let file_path = file_path.as_ref();
    assert!(
        file_path.exists(),
        "File {} does not exist",
        file_path.to_string_lossy()
    );
}

/// Number of lattice points along x and y of the test field.
pub const PLANE_SIZE: usize = 13;

/// Physical lower corner of the test field.
pub const ORIGIN: [fdt; 3] = [-6.0, -6.0, 0.0];

/// Counter-clockwise circular flow `(-y, x, 0)` around the z-axis through the
/// center of a 13x13x2 grid with unit spacing, with unit weights.
pub fn circular_field() -> (VectorField3<fdt>, ScalarField3<fdt>) {
    let grid = Arc::new(exit_on_error!(
        RegularGrid3::new(
            In3D::new(PLANE_SIZE, PLANE_SIZE, 2),
            Vec3::new(ORIGIN[0], ORIGIN[1], ORIGIN[2]),
            Vec3::equal_components(1.0),
        ),
        "Error: Could not create test grid: {}"
    ));
    let vectors = (0..grid.number_of_points())
        .map(|n| {
            let position =
                grid.lattice_to_physical(&grid.lattice_position(&grid.indices_from_linear(n)));
            Vec3::new(-position[1], position[0], 0.0)
        })
        .collect();
    let field = exit_on_error!(
        VectorField3::from_ordered_vectors("J".to_string(), Arc::clone(&grid), vectors),
        "Error: Could not create test field: {}"
    );
    let weights = exit_on_error!(
        ScalarField3::from_ordered_values(
            "weight".to_string(),
            grid,
            vec![1.0; PLANE_SIZE * PLANE_SIZE * 2]
        ),
        "Error: Could not create test weights: {}"
    );
    (field, weights)
}

#[derive(Debug)]
pub struct Test {
    output_dir: TempDir,
}

impl Test {
    /// Creates a temporary directory holding the circular test field.
    pub fn new() -> Self {
        let output_dir = exit_on_error!(
            tempfile::tempdir(),
            "Error: Could not create temporary test directory: {}"
        );
        let test = Self { output_dir };
        let (field, weights) = circular_field();
        exit_on_error!(
            vti::save_vti(test.input_path(), OverwriteMode::Never, &field, Some(&weights)),
            "Error: Could not write test input: {}"
        );
        test
    }

    pub fn input_path(&self) -> PathBuf {
        self.output_path("circular.vti")
    }

    pub fn output_path<S: AsRef<str>>(&self, file_name: S) -> PathBuf {
        self.output_dir.path().join(file_name.as_ref())
    }
}

lazy_static! {
    static ref COMMAND: clap::Command<'static> = cli::build::build().no_binary_name(true);
}
