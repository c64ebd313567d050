//! Classification of streamline rotation around a magnetic field axis.

use crate::{
    error::OutOfBoundsError,
    field::{ScalarField3, VectorField3},
    geometry::{
        Dim3::{self, X, Y, Z},
        Idx3, In3D, Vec3,
    },
    grid::BoundsCrossing,
    interpolation::Interpolator3,
    io::Verbosity,
    num::BFloat,
    tracing::{
        ftr,
        trajectory::{Trajectory, TrajectoryConfig},
    },
};
use indicatif::ParallelProgressIterator;
use ndarray::prelude::*;
use rayon::prelude::*;
use std::{fmt, str::FromStr};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Rotational character of a streamline around the magnetic field axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub enum Tropicity {
    /// Net right-handed rotation around the signed axis.
    Isotropic,
    /// No net rotation beyond the threshold.
    Undetermined,
    /// Net left-handed rotation around the signed axis.
    Paratropic,
}

impl Tropicity {
    /// Returns the integer code used for the class in text output.
    pub fn code(&self) -> i8 {
        match self {
            Self::Isotropic => -1,
            Self::Undetermined => 0,
            Self::Paratropic => 1,
        }
    }

    /// Returns a lowercase name for the class.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Isotropic => "isotropic",
            Self::Undetermined => "undetermined",
            Self::Paratropic => "paratropic",
        }
    }
}

impl fmt::Display for Tropicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A signed coordinate axis along which the magnetic field points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MagneticFieldDirection {
    axis: Dim3,
    negative: bool,
}

impl MagneticFieldDirection {
    /// Creates a new direction along the given axis, pointing in the negative
    /// sense if `negative` is true.
    pub fn new(axis: Dim3, negative: bool) -> Self {
        Self { axis, negative }
    }

    /// Returns the axis of the direction.
    pub fn axis(&self) -> Dim3 {
        self.axis
    }

    /// Whether the direction points along the negative axis.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Returns the direction with the opposite sign.
    pub fn reversed(&self) -> Self {
        Self::new(self.axis, !self.negative)
    }

    /// Returns the unit vector pointing along the direction.
    pub fn unit_vector(&self) -> Vec3<ftr> {
        let unit = Vec3::unit(self.axis);
        if self.negative {
            -unit
        } else {
            unit
        }
    }

    /// Returns the numeric code of the direction (0 for x, 1 for -x, ..., 5 for -z).
    pub fn code(&self) -> usize {
        2 * self.axis.num() + usize::from(self.negative)
    }
}

impl FromStr for MagneticFieldDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<usize>() {
            return Dim3::from_num(code / 2)
                .map(|axis| Self::new(axis, code % 2 == 1))
                .ok_or_else(|| format!("Invalid magnetic field direction code: {}", code));
        }
        let (negative, axis_name) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let axis = match axis_name.to_lowercase().as_str() {
            "x" => X,
            "y" => Y,
            "z" => Z,
            _ => return Err(format!("Invalid magnetic field direction: {}", s)),
        };
        Ok(Self::new(axis, negative))
    }
}

impl fmt::Display for MagneticFieldDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.axis)
        } else {
            write!(f, "{}", self.axis)
        }
    }
}

/// Parses a coordinate axis from `x`, `y`, `z` or the codes `0`, `1`, `2`.
pub fn parse_axis(s: &str) -> Result<Dim3, String> {
    match s.trim().to_lowercase().as_str() {
        "x" | "0" => Ok(X),
        "y" | "1" => Ok(Y),
        "z" | "2" => Ok(Z),
        _ => Err(format!("Invalid axis: {}", s)),
    }
}

/// Configuration parameters for classification.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationConfig {
    /// Direction of the magnetic field that rotation is measured around.
    pub direction: MagneticFieldDirection,
    /// Number of full revolutions a streamline must exceed to be classified.
    pub revolution_threshold: ftr,
}

impl ClassificationConfig {
    pub const DEFAULT_DIRECTION: MagneticFieldDirection = MagneticFieldDirection {
        axis: Z,
        negative: false,
    };
    pub const DEFAULT_REVOLUTION_THRESHOLD: ftr = 4.0;

    pub fn validate(&self) {
        assert!(
            self.revolution_threshold.is_finite() && self.revolution_threshold >= 0.0,
            "Revolution threshold must be larger than or equal to zero."
        );
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        ClassificationConfig {
            direction: Self::DEFAULT_DIRECTION,
            revolution_threshold: Self::DEFAULT_REVOLUTION_THRESHOLD,
        }
    }
}

/// Number of points in each class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub isotropic: usize,
    pub undetermined: usize,
    pub paratropic: usize,
}

impl ClassCounts {
    /// Counts the classes in the given sequence of classifications.
    pub fn from_classifications<'a, T>(classifications: T) -> Self
    where
        T: IntoIterator<Item = &'a Tropicity>,
    {
        let mut counts = Self::default();
        for tropicity in classifications {
            match tropicity {
                Tropicity::Isotropic => counts.isotropic += 1,
                Tropicity::Undetermined => counts.undetermined += 1,
                Tropicity::Paratropic => counts.paratropic += 1,
            }
        }
        counts
    }

    /// Returns the total number of counted points.
    pub fn total(&self) -> usize {
        self.isotropic + self.undetermined + self.paratropic
    }
}

impl fmt::Display for ClassCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} isotropic, {} paratropic, {} undetermined",
            self.isotropic, self.paratropic, self.undetermined
        )
    }
}

/// Traces a complete trajectory from the given lattice-space position, using
/// the interpolated field there as the initial direction.
///
/// # Returns
///
/// A `Result` which is either:
///
/// - `Ok`: Contains the completed trajectory.
/// - `Err`: Contains an `OutOfBoundsError` if the start position is outside the grid.
pub fn trace_from_point<F, I>(
    field: &VectorField3<F>,
    interpolator: &I,
    start: &Vec3<ftr>,
    config: &TrajectoryConfig,
) -> Result<Trajectory, OutOfBoundsError>
where
    F: BFloat,
    I: Interpolator3,
{
    let initial_direction = interpolator.interp_vector_field(field, &Vec3::from(start))?;
    let mut trajectory = Trajectory::new(*start, Vec3::from(&initial_direction), config.clone());
    trajectory.complete(field, interpolator);
    Ok(trajectory)
}

/// Classifies the streamline through the given lattice-space position.
///
/// Positions outside the grid are `Undetermined`.
pub fn classify_point<F, I>(
    field: &VectorField3<F>,
    interpolator: &I,
    position: &Vec3<ftr>,
    trajectory_config: &TrajectoryConfig,
    classification_config: &ClassificationConfig,
) -> Tropicity
where
    F: BFloat,
    I: Interpolator3,
{
    match trace_from_point(field, interpolator, position, trajectory_config) {
        Ok(trajectory) => trajectory.classify(
            &classification_config.direction,
            classification_config.revolution_threshold,
        ),
        Err(_) => Tropicity::Undetermined,
    }
}

/// Classifies the streamlines through each of the given lattice-space positions
/// in parallel. The result is in the order of the positions.
pub fn classify_points<F, I>(
    field: &VectorField3<F>,
    interpolator: &I,
    positions: &[Vec3<ftr>],
    trajectory_config: &TrajectoryConfig,
    classification_config: &ClassificationConfig,
    verbosity: &Verbosity,
) -> Vec<Tropicity>
where
    F: BFloat,
    I: Interpolator3,
{
    trajectory_config.validate();
    classification_config.validate();

    let classifications: Vec<_> = positions
        .par_iter()
        .progress_with(verbosity.create_progress_bar(positions.len()))
        .map(|position| {
            classify_point(
                field,
                interpolator,
                position,
                trajectory_config,
                classification_config,
            )
        })
        .collect();

    if verbosity.print_messages() {
        println!(
            "Classified {} points: {}",
            classifications.len(),
            ClassCounts::from_classifications(&classifications)
        );
    }
    classifications
}

/// Classifies the streamline through every lattice point of the field.
pub fn classify_grid<F, I>(
    field: &VectorField3<F>,
    interpolator: &I,
    trajectory_config: &TrajectoryConfig,
    classification_config: &ClassificationConfig,
    verbosity: &Verbosity,
) -> Array3<Tropicity>
where
    F: BFloat,
    I: Interpolator3,
{
    let grid = field.grid();
    let positions: Vec<Vec3<ftr>> = (0..grid.number_of_points())
        .map(|linear_idx| Vec3::from(&grid.lattice_position(&grid.indices_from_linear(linear_idx))))
        .collect();

    let classifications = classify_points(
        field,
        interpolator,
        &positions,
        trajectory_config,
        classification_config,
        verbosity,
    );

    Array3::from_shape_fn(grid.shape().to_tuple().f(), |(i, j, k)| {
        classifications[grid.linear_index(&Idx3::new(i, j, k))]
    })
}

/// Classifies the streamlines through the lattice points of a coordinate plane.
///
/// # Parameters
///
/// - `field`: Vector field to trace.
/// - `interpolator`: Interpolator to use.
/// - `fixed_axis`: Axis perpendicular to the plane.
/// - `fixed_coordinate`: Physical coordinate along `fixed_axis`. The plane is
///   the lattice layer nearest to it.
/// - `trajectory_config`: Configuration for the traced trajectories.
/// - `classification_config`: Configuration for the classification.
/// - `verbosity`: Whether to print status messages or show progress.
///
/// # Returns
///
/// A `Result` which is either:
///
/// - `Ok`: Contains a 2D array of classifications indexed by the two remaining
///   axes in increasing axis order.
/// - `Err`: Contains an `OutOfBoundsError` if the nearest lattice layer is
///   outside the grid.
pub fn classify_plane<F, I>(
    field: &VectorField3<F>,
    interpolator: &I,
    fixed_axis: Dim3,
    fixed_coordinate: ftr,
    trajectory_config: &TrajectoryConfig,
    classification_config: &ClassificationConfig,
    verbosity: &Verbosity,
) -> Result<Array2<Tropicity>, OutOfBoundsError>
where
    F: BFloat,
    I: Interpolator3,
{
    let grid = field.grid();
    let fixed_idx = F::from_f64(fixed_coordinate)
        .and_then(|coordinate| grid.nearest_index(fixed_axis, coordinate))
        .ok_or_else(|| {
            let lattice_coordinate = (fixed_coordinate
                - grid.origin()[fixed_axis].to_f64().unwrap_or(0.0))
                / grid.spacing()[fixed_axis].to_f64().unwrap_or(1.0);
            let mut position = Vec3::zero();
            position[fixed_axis] = lattice_coordinate;
            OutOfBoundsError {
                position,
                crossings: In3D::with_each_component(|dim| {
                    if dim != fixed_axis {
                        BoundsCrossing::None
                    } else if lattice_coordinate >= 0.0 {
                        BoundsCrossing::Upper
                    } else {
                        BoundsCrossing::Lower
                    }
                }),
            }
        })?;

    let [dim_a, dim_b] = Dim3::slice_except(fixed_axis);
    let shape = grid.shape();
    let (size_a, size_b) = (shape[dim_a], shape[dim_b]);

    if verbosity.print_messages() {
        println!(
            "Classifying {}x{} plane at {} index {}",
            size_a, size_b, fixed_axis, fixed_idx
        );
    }

    let positions: Vec<Vec3<ftr>> = (0..size_a * size_b)
        .map(|plane_idx| {
            let mut indices = Idx3::same(fixed_idx);
            indices[dim_a] = plane_idx / size_b;
            indices[dim_b] = plane_idx % size_b;
            Vec3::from(&grid.lattice_position(&indices))
        })
        .collect();

    let classifications = classify_points(
        field,
        interpolator,
        &positions,
        trajectory_config,
        classification_config,
        verbosity,
    );

    Ok(Array2::from_shape_fn((size_a, size_b), |(a, b)| {
        classifications[a * size_b + b]
    }))
}

/// A vector field (and optional weights) split by the classification of
/// each lattice point.
#[derive(Clone, Debug)]
pub struct GridPartition<F: BFloat> {
    /// Field with all non-isotropic samples set to zero.
    pub isotropic: VectorField3<F>,
    /// Field with all non-paratropic samples set to zero.
    pub paratropic: VectorField3<F>,
    /// Weights with all non-isotropic samples set to zero.
    pub isotropic_weights: Option<ScalarField3<F>>,
    /// Weights with all non-paratropic samples set to zero.
    pub paratropic_weights: Option<ScalarField3<F>>,
    /// Classification of every lattice point.
    pub classifications: Array3<Tropicity>,
}

impl<F: BFloat> GridPartition<F> {
    /// Returns the number of lattice points in each class.
    pub fn counts(&self) -> ClassCounts {
        ClassCounts::from_classifications(&self.classifications)
    }
}

/// Splits the field into its isotropic and paratropic parts by classifying
/// every lattice point. Undetermined points end up in neither part.
///
/// # Panics
///
/// If the weights are given on a grid with a different shape than the field.
pub fn partition_by_classification<F, I>(
    field: &VectorField3<F>,
    weights: Option<&ScalarField3<F>>,
    interpolator: &I,
    trajectory_config: &TrajectoryConfig,
    classification_config: &ClassificationConfig,
    verbosity: &Verbosity,
) -> GridPartition<F>
where
    F: BFloat,
    I: Interpolator3,
{
    if let Some(weights) = weights {
        assert_eq!(
            weights.shape(),
            field.shape(),
            "Shape of weights does not match shape of field."
        );
    }

    let classifications = classify_grid(
        field,
        interpolator,
        trajectory_config,
        classification_config,
        verbosity,
    );

    let isotropic_mask = classifications.mapv(|tropicity| tropicity == Tropicity::Isotropic);
    let paratropic_mask = classifications.mapv(|tropicity| tropicity == Tropicity::Paratropic);

    let masked_name = |name: &str, tropicity: Tropicity| format!("{}-{}", name, tropicity);

    GridPartition {
        isotropic: field.masked(
            masked_name(field.name(), Tropicity::Isotropic),
            &isotropic_mask,
        ),
        paratropic: field.masked(
            masked_name(field.name(), Tropicity::Paratropic),
            &paratropic_mask,
        ),
        isotropic_weights: weights.map(|weights| {
            weights.masked(
                masked_name(weights.name(), Tropicity::Isotropic),
                &isotropic_mask,
            )
        }),
        paratropic_weights: weights.map(|weights| {
            weights.masked(
                masked_name(weights.name(), Tropicity::Paratropic),
                &paratropic_mask,
            )
        }),
        classifications,
    }
}

/// A set of weighted integration points split by classification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointPartition {
    pub isotropic_points: Vec<Vec3<ftr>>,
    pub isotropic_weights: Vec<ftr>,
    pub paratropic_points: Vec<Vec3<ftr>>,
    pub paratropic_weights: Vec<ftr>,
    pub counts: ClassCounts,
}

/// Splits weighted points given in physical coordinates by the classification
/// of the streamline through each point. Points outside the grid are undetermined.
///
/// # Panics
///
/// If the number of points and weights differ.
pub fn split_point_set<F, I>(
    field: &VectorField3<F>,
    interpolator: &I,
    physical_points: &[Vec3<ftr>],
    weights: &[ftr],
    trajectory_config: &TrajectoryConfig,
    classification_config: &ClassificationConfig,
    verbosity: &Verbosity,
) -> PointPartition
where
    F: BFloat,
    I: Interpolator3,
{
    assert_eq!(
        physical_points.len(),
        weights.len(),
        "Number of points does not match number of weights."
    );
    let grid = field.grid();
    let lattice_positions: Vec<Vec3<ftr>> = physical_points
        .iter()
        .map(|point| Vec3::from(&grid.physical_to_lattice(&Vec3::from(point))))
        .collect();

    let classifications = classify_points(
        field,
        interpolator,
        &lattice_positions,
        trajectory_config,
        classification_config,
        verbosity,
    );

    let mut partition = PointPartition {
        counts: ClassCounts::from_classifications(&classifications),
        ..PointPartition::default()
    };
    for ((point, &weight), tropicity) in physical_points.iter().zip(weights).zip(classifications) {
        match tropicity {
            Tropicity::Isotropic => {
                partition.isotropic_points.push(*point);
                partition.isotropic_weights.push(weight);
            }
            Tropicity::Paratropic => {
                partition.paratropic_points.push(*point);
                partition.paratropic_weights.push(weight);
            }
            Tropicity::Undetermined => {}
        }
    }
    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::regular::RegularGrid3, interpolation::trilinear::TrilinearInterpolator3,
        tracing::stepping::SteppingScheme,
    };
    use std::sync::Arc;

    /// Counter-clockwise flow around z in the inner half of the x-y plane and
    /// clockwise flow in the outer part.
    fn two_ring_field() -> VectorField3<f64> {
        let grid = Arc::new(
            RegularGrid3::new(
                In3D::new(13, 13, 2),
                Vec3::new(-6.0, -6.0, 0.0),
                Vec3::equal_components(1.0),
            )
            .unwrap(),
        );
        let vectors = (0..grid.number_of_points())
            .map(|n| {
                let position = grid.lattice_to_physical(
                    &grid.lattice_position(&grid.indices_from_linear(n)),
                );
                let (x, y): (f64, f64) = (position[X], position[Y]);
                let radius = (x * x + y * y).sqrt();
                let sense = if radius < 3.0 { 1.0 } else { -1.0 };
                Vec3::new(-sense * y, sense * x, 0.0)
            })
            .collect();
        VectorField3::from_ordered_vectors("j".to_string(), grid, vectors).unwrap()
    }

    fn quick_trajectory_config() -> TrajectoryConfig {
        TrajectoryConfig {
            step_length: 0.05,
            max_steps: 1500,
            stepping_scheme: SteppingScheme::RungeKutta4,
            ..TrajectoryConfig::default()
        }
    }

    /// The outer ring completes fewer than three turns within the quick step budget.
    fn single_revolution_config() -> ClassificationConfig {
        ClassificationConfig {
            revolution_threshold: 1.0,
            ..ClassificationConfig::default()
        }
    }

    #[test]
    fn magnetic_field_directions_parse_from_names_and_codes() {
        let parse = |s: &str| s.parse::<MagneticFieldDirection>().unwrap();
        assert_eq!(parse("x"), MagneticFieldDirection::new(X, false));
        assert_eq!(parse("-y"), MagneticFieldDirection::new(Y, true));
        assert_eq!(parse("+Z"), MagneticFieldDirection::new(Z, false));
        assert_eq!(parse("1"), MagneticFieldDirection::new(X, true));
        assert_eq!(parse("4"), MagneticFieldDirection::new(Z, false));
        assert_eq!(parse("5"), parse("-z"));
        assert!("6".parse::<MagneticFieldDirection>().is_err());
        assert!("w".parse::<MagneticFieldDirection>().is_err());
        for code in 0..6 {
            assert_eq!(parse(&code.to_string()).code(), code);
        }
        assert_eq!(parse("-z").unit_vector(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(parse("-z").reversed(), parse("z"));
        assert_eq!(parse("-x").to_string(), "-x");
    }

    #[test]
    fn axes_parse_from_names_and_codes() {
        assert_eq!(parse_axis("x"), Ok(X));
        assert_eq!(parse_axis("1"), Ok(Y));
        assert_eq!(parse_axis("Z"), Ok(Z));
        assert!(parse_axis("3").is_err());
    }

    #[test]
    fn tropicity_codes_are_signed() {
        assert_eq!(Tropicity::Isotropic.code(), -1);
        assert_eq!(Tropicity::Undetermined.code(), 0);
        assert_eq!(Tropicity::Paratropic.code(), 1);
    }

    #[test]
    fn plane_classification_separates_opposite_rings() {
        let field = two_ring_field();
        let classifications = classify_plane(
            &field,
            &TrilinearInterpolator3::new(),
            Z,
            0.2,
            &quick_trajectory_config(),
            &single_revolution_config(),
            &Verbosity::Quiet,
        )
        .unwrap();
        assert_eq!(classifications.shape(), &[13, 13]);
        assert_eq!(classifications[[7, 6]], Tropicity::Isotropic);
        assert_eq!(classifications[[5, 6]], Tropicity::Isotropic);
        assert_eq!(classifications[[11, 6]], Tropicity::Paratropic);
        assert_eq!(classifications[[6, 1]], Tropicity::Paratropic);
    }

    #[test]
    fn plane_outside_grid_is_out_of_bounds() {
        let field = two_ring_field();
        let result = classify_plane(
            &field,
            &TrilinearInterpolator3::new(),
            Z,
            1.6,
            &quick_trajectory_config(),
            &single_revolution_config(),
            &Verbosity::Quiet,
        );
        let err = result.unwrap_err();
        assert_eq!(err.crossings[Z], BoundsCrossing::Upper);
        assert_eq!(err.crossings[X], BoundsCrossing::None);
    }

    #[test]
    fn partition_is_disjoint_and_complete() {
        let field = two_ring_field();
        let weights = ScalarField3::new(
            "w".to_string(),
            field.arc_with_grid(),
            Array3::from_elem((13, 13, 2).f(), 2.0),
        );
        let partition = partition_by_classification(
            &field,
            Some(&weights),
            &TrilinearInterpolator3::new(),
            &quick_trajectory_config(),
            &single_revolution_config(),
            &Verbosity::Quiet,
        );
        let counts = partition.counts();
        assert_eq!(counts.total(), field.grid().number_of_points());
        assert!(counts.isotropic > 0);
        assert!(counts.paratropic > 0);

        assert_eq!(partition.isotropic.name(), "j-isotropic");
        let isotropic_weights = partition.isotropic_weights.as_ref().unwrap();
        let paratropic_weights = partition.paratropic_weights.as_ref().unwrap();
        assert_eq!(paratropic_weights.name(), "w-paratropic");

        for linear_idx in 0..field.grid().number_of_points() {
            let indices = field.grid().indices_from_linear(linear_idx);
            let original = field.vector(&indices);
            let isotropic = partition.isotropic.vector(&indices);
            let paratropic = partition.paratropic.vector(&indices);
            let tropicity = partition.classifications[[indices[X], indices[Y], indices[Z]]];

            assert!(isotropic.is_zero() || paratropic.is_zero());
            match tropicity {
                Tropicity::Isotropic => {
                    assert_eq!(isotropic, original);
                    assert_eq!(isotropic_weights.value(&indices), 2.0);
                    assert_eq!(paratropic_weights.value(&indices), 0.0);
                }
                Tropicity::Paratropic => {
                    assert_eq!(paratropic, original);
                    assert_eq!(isotropic_weights.value(&indices), 0.0);
                    assert_eq!(paratropic_weights.value(&indices), 2.0);
                }
                Tropicity::Undetermined => {
                    assert!(isotropic.is_zero() && paratropic.is_zero());
                    assert_eq!(isotropic_weights.value(&indices), 0.0);
                    assert_eq!(paratropic_weights.value(&indices), 0.0);
                }
            }
        }
    }

    #[test]
    fn parallel_classification_matches_sequential() {
        let field = two_ring_field();
        let interpolator = TrilinearInterpolator3::new();
        let trajectory_config = quick_trajectory_config();
        let classification_config = single_revolution_config();
        let classifications = classify_grid(
            &field,
            &interpolator,
            &trajectory_config,
            &classification_config,
            &Verbosity::Quiet,
        );
        for ((i, j, k), &tropicity) in classifications.indexed_iter() {
            let position = Vec3::new(i as f64, j as f64, k as f64);
            assert_eq!(
                classify_point(
                    &field,
                    &interpolator,
                    &position,
                    &trajectory_config,
                    &classification_config
                ),
                tropicity
            );
        }
    }

    #[test]
    fn points_are_split_by_classification() {
        let field = two_ring_field();
        let points = vec![
            Vec3::new(1.0, 0.0, 0.5),
            Vec3::new(0.0, 5.0, 0.5),
            Vec3::new(100.0, 0.0, 0.5),
            Vec3::new(0.0, -1.5, 0.0),
        ];
        let weights = vec![0.1, 0.2, 0.3, 0.4];
        let partition = split_point_set(
            &field,
            &TrilinearInterpolator3::new(),
            &points,
            &weights,
            &quick_trajectory_config(),
            &single_revolution_config(),
            &Verbosity::Quiet,
        );
        assert_eq!(partition.isotropic_points, vec![points[0], points[3]]);
        assert_eq!(partition.isotropic_weights, vec![0.1, 0.4]);
        assert_eq!(partition.paratropic_points, vec![points[1]]);
        assert_eq!(partition.paratropic_weights, vec![0.2]);
        assert_eq!(partition.counts.undetermined, 1);
    }

    #[test]
    fn default_threshold_requires_four_revolutions() {
        let field = two_ring_field();
        let interpolator = TrilinearInterpolator3::new();
        let trajectory_config = quick_trajectory_config();
        let classification_config = ClassificationConfig::default();
        assert_eq!(classification_config.revolution_threshold, 4.0);

        let classify = |position: Vec3<f64>| {
            classify_point(
                &field,
                &interpolator,
                &position,
                &trajectory_config,
                &classification_config,
            )
        };
        assert_eq!(classify(Vec3::new(7.0, 6.0, 0.0)), Tropicity::Isotropic);
        assert_eq!(classify(Vec3::new(11.0, 6.0, 0.0)), Tropicity::Undetermined);
    }
}
