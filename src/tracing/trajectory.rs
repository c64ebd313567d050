//! Streamlines traced with a fixed step length, and their rotational character.

use super::{
    ftr,
    stepping::{self, StepperResult, SteppingScheme, StoppingCause},
};
use crate::{
    field::VectorField3,
    geometry::Vec3,
    grid::regular::RegularGrid3,
    interpolation::Interpolator3,
    num::BFloat,
    tropicity::{MagneticFieldDirection, Tropicity},
};
use std::f64::consts::{PI, TAU};

/// Projected segments shorter than this fraction of the step length are
/// treated as degenerate and contribute no rotation.
const DEGENERATE_SEGMENT_FRACTION: ftr = 1e-6;

/// Configuration parameters for trajectories.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryConfig {
    /// Distance between consecutive trajectory points, in lattice units.
    pub step_length: ftr,
    /// Maximum number of steps to take before terminating.
    pub max_steps: usize,
    /// Field magnitudes below this are considered too weak to define a direction.
    pub min_field_magnitude: ftr,
    /// Integration scheme to use for each step.
    pub stepping_scheme: SteppingScheme,
    /// If set, the trajectory terminates when it returns to within this
    /// distance (in lattice units) of its start point after having left it.
    pub closed_loop_tolerance: Option<ftr>,
}

impl TrajectoryConfig {
    pub const DEFAULT_STEP_LENGTH: ftr = 1e-2;
    pub const DEFAULT_MAX_STEPS: usize = 20000;
    pub const DEFAULT_MIN_FIELD_MAGNITUDE: ftr = 1e-12;
    pub const DEFAULT_STEPPING_SCHEME: SteppingScheme = SteppingScheme::Euler;
    pub const DEFAULT_CLOSED_LOOP_TOLERANCE: Option<ftr> = None;

    pub fn validate(&self) {
        assert!(
            self.step_length.is_finite() && self.step_length > 0.0,
            "Step length must be larger than zero."
        );
        assert!(
            self.max_steps > 0,
            "Maximum number of steps must be larger than zero."
        );
        assert!(
            self.min_field_magnitude >= 0.0,
            "Minimum field magnitude must be larger than or equal to zero."
        );
        if let Some(tolerance) = self.closed_loop_tolerance {
            assert!(
                tolerance > 0.0,
                "Closed loop tolerance must be larger than zero."
            );
        }
    }
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        TrajectoryConfig {
            step_length: Self::DEFAULT_STEP_LENGTH,
            max_steps: Self::DEFAULT_MAX_STEPS,
            min_field_magnitude: Self::DEFAULT_MIN_FIELD_MAGNITUDE,
            stepping_scheme: Self::DEFAULT_STEPPING_SCHEME,
            closed_loop_tolerance: Self::DEFAULT_CLOSED_LOOP_TOLERANCE,
        }
    }
}

/// A streamline through a vector field, stored as lattice-space positions
/// in traversal order.
///
/// A new trajectory holds only its start point. `complete` steps it until
/// a terminal condition is met, after which it no longer changes.
#[derive(Clone, Debug)]
pub struct Trajectory {
    config: TrajectoryConfig,
    initial_direction: Vec3<ftr>,
    positions: Vec<Vec3<ftr>>,
    stopping_cause: Option<StoppingCause>,
}

impl Trajectory {
    /// Creates a new trajectory starting at the given lattice-space position.
    ///
    /// The first step follows `initial_direction` (normalized), later steps
    /// follow the interpolated field.
    ///
    /// # Panics
    ///
    /// If the configuration is invalid.
    pub fn new(start: Vec3<ftr>, initial_direction: Vec3<ftr>, config: TrajectoryConfig) -> Self {
        config.validate();
        Self {
            config,
            initial_direction,
            positions: vec![start],
            stopping_cause: None,
        }
    }

    /// Returns a reference to the configuration of the trajectory.
    pub fn config(&self) -> &TrajectoryConfig {
        &self.config
    }

    /// Returns the traced lattice-space positions, start included.
    pub fn positions(&self) -> &[Vec3<ftr>] {
        &self.positions
    }

    /// Returns the number of steps taken.
    pub fn number_of_steps(&self) -> usize {
        self.positions.len() - 1
    }

    /// Returns the reason for termination, or `None` if `complete` has not run.
    pub fn stopping_cause(&self) -> Option<StoppingCause> {
        self.stopping_cause
    }

    /// Returns the traced positions converted to physical coordinates of the given grid.
    pub fn physical_positions<F: BFloat>(&self, grid: &RegularGrid3<F>) -> Vec<Vec3<ftr>> {
        self.positions
            .iter()
            .map(|position| Vec3::from(&grid.lattice_to_physical(&Vec3::from(position))))
            .collect()
    }

    /// Steps the trajectory through the field until it terminates.
    ///
    /// # Parameters
    ///
    /// - `field`: Vector field to trace.
    /// - `interpolator`: Interpolator to use.
    ///
    /// # Returns
    ///
    /// The `StoppingCause` of the trajectory. Calling this on a trajectory that
    /// has already terminated returns the existing cause without stepping.
    ///
    /// # Type parameters
    ///
    /// - `F`: Floating point type of the field data.
    /// - `I`: Type of interpolator.
    pub fn complete<F, I>(&mut self, field: &VectorField3<F>, interpolator: &I) -> StoppingCause
    where
        F: BFloat,
        I: Interpolator3,
    {
        if let Some(cause) = self.stopping_cause {
            return cause;
        }
        let cause = self.step_until_stopped(field, interpolator);
        self.stopping_cause = Some(cause);
        cause
    }

    fn step_until_stopped<F, I>(&mut self, field: &VectorField3<F>, interpolator: &I) -> StoppingCause
    where
        F: BFloat,
        I: Interpolator3,
    {
        let TrajectoryConfig {
            step_length,
            max_steps,
            min_field_magnitude,
            stepping_scheme,
            closed_loop_tolerance,
        } = self.config;

        let start = self.positions[0];
        let mut position = start;
        let mut has_left_start = false;

        let mut direction =
            match stepping::unit_direction(&self.initial_direction, min_field_magnitude) {
                StepperResult::Ok(direction) => direction,
                StepperResult::Stopped(cause) => return cause,
            };

        loop {
            let next = match stepping_scheme.advance(
                field,
                interpolator,
                &position,
                &direction,
                step_length,
                min_field_magnitude,
            ) {
                StepperResult::Ok(next) => next,
                StepperResult::Stopped(cause) => return cause,
            };
            if !field.grid().contains(&Vec3::from(&next)) {
                return StoppingCause::LeftGrid;
            }
            self.positions.push(next);
            position = next;

            if let Some(tolerance) = closed_loop_tolerance {
                let distance_from_start = Vec3::distance(&position, &start);
                if !has_left_start {
                    has_left_start = distance_from_start > tolerance;
                } else if distance_from_start <= tolerance {
                    return StoppingCause::ClosedLoop;
                }
            }

            if self.number_of_steps() >= max_steps {
                return StoppingCause::MaxStepsReached;
            }

            direction =
                match stepping::field_direction(field, interpolator, &position, min_field_magnitude)
                {
                    StepperResult::Ok(direction) => direction,
                    StepperResult::Stopped(cause) => return cause,
                };
        }
    }

    /// Computes the net rotation of the trajectory around the given axis, in radians.
    ///
    /// Consecutive segments are projected onto the plane perpendicular to the
    /// axis and the signed angles between them are summed, with positive angles
    /// corresponding to right-handed rotation around the axis. A segment whose
    /// projection is degenerate (near-zero length, or near-parallel to the axis)
    /// contributes no rotation with either of its neighbours.
    pub fn accumulated_rotation(&self, axis: &Vec3<ftr>) -> ftr {
        let axis = axis.normalized();
        let min_projected_length = DEGENERATE_SEGMENT_FRACTION * self.config.step_length;

        let projected_segments: Vec<Option<Vec3<ftr>>> = self
            .positions
            .windows(2)
            .map(|pair| {
                let segment = (&pair[1] - &pair[0]).rejected_from(&axis);
                if segment.length() < min_projected_length {
                    None
                } else {
                    Some(segment)
                }
            })
            .collect();

        projected_segments
            .windows(2)
            .map(|pair| match (&pair[0], &pair[1]) {
                (Some(previous), Some(current)) => {
                    previous.cross(current).dot(&axis).atan2(previous.dot(current))
                }
                _ => 0.0,
            })
            .sum()
    }

    /// Classifies the rotational character of the trajectory around the given
    /// magnetic field direction.
    ///
    /// # Parameters
    ///
    /// - `direction`: Signed axis to measure rotation around.
    /// - `revolution_threshold`: Number of full revolutions the net rotation
    ///   must exceed for the trajectory to be classified.
    ///
    /// # Returns
    ///
    /// `Isotropic` for net right-handed rotation beyond the threshold,
    /// `Paratropic` for net left-handed rotation beyond the threshold and
    /// `Undetermined` otherwise. A trajectory that closed on itself is
    /// classified by the sign of its rotation if it turned at least half a revolution.
    pub fn classify(
        &self,
        direction: &MagneticFieldDirection,
        revolution_threshold: ftr,
    ) -> Tropicity {
        let rotation = self.accumulated_rotation(&direction.unit_vector());
        if let Some(StoppingCause::ClosedLoop) = self.stopping_cause {
            if rotation >= PI {
                Tropicity::Isotropic
            } else if rotation <= -PI {
                Tropicity::Paratropic
            } else {
                Tropicity::Undetermined
            }
        } else {
            let limit = revolution_threshold * TAU;
            if rotation > limit {
                Tropicity::Isotropic
            } else if rotation < -limit {
                Tropicity::Paratropic
            } else {
                Tropicity::Undetermined
            }
        }
    }
}
