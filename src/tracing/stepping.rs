//! Stepping along streamlines of a vector field.

use super::ftr;
use crate::{field::VectorField3, geometry::Vec3, interpolation::Interpolator3, num::BFloat};
use std::{fmt, str::FromStr};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// A stepper result which is either OK (with an arbitrary value) or stopped (with a cause).
#[derive(Clone, Debug, PartialEq)]
pub enum StepperResult<T> {
    Ok(T),
    Stopped(StoppingCause),
}

/// Reason for terminating stepping.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "snake_case"))]
pub enum StoppingCause {
    /// The next position (or an intermediate evaluation point) was outside the grid.
    LeftGrid,
    /// The configured number of steps was taken.
    MaxStepsReached,
    /// The field was too weak to define a direction.
    SingularField,
    /// The streamline returned to its start point.
    ClosedLoop,
}

impl StoppingCause {
    /// Returns a lowercase identifier for the stopping cause.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LeftGrid => "left_grid",
            Self::MaxStepsReached => "max_steps_reached",
            Self::SingularField => "singular_field",
            Self::ClosedLoop => "closed_loop",
        }
    }
}

impl fmt::Display for StoppingCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Integration scheme used for advancing along the normalized field direction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SteppingScheme {
    /// Forward Euler: one field evaluation per step.
    Euler,
    /// Classical fourth-order Runge–Kutta: four field evaluations per step.
    RungeKutta4,
}

impl SteppingScheme {
    /// Advances the given position by one step.
    ///
    /// # Parameters
    ///
    /// - `field`: Vector field to step in.
    /// - `interpolator`: Interpolator to use.
    /// - `position`: Lattice-space position to step from.
    /// - `direction`: Unit stepping direction at `position`.
    /// - `step_length`: Length of the step in lattice units.
    /// - `min_field_magnitude`: Field magnitudes below this make the direction undefined.
    ///
    /// # Returns
    ///
    /// A `StepperResult<Vec3<ftr>>` which is either:
    ///
    /// - `Ok`: Contains the next position (not checked against the grid bounds).
    /// - `Stopped`: Contains a `StoppingCause` indicating why an intermediate
    ///   field evaluation failed.
    ///
    /// # Type parameters
    ///
    /// - `F`: Floating point type of the field data.
    /// - `I`: Type of interpolator.
    pub fn advance<F, I>(
        &self,
        field: &VectorField3<F>,
        interpolator: &I,
        position: &Vec3<ftr>,
        direction: &Vec3<ftr>,
        step_length: ftr,
        min_field_magnitude: ftr,
    ) -> StepperResult<Vec3<ftr>>
    where
        F: BFloat,
        I: Interpolator3,
    {
        match self {
            Self::Euler => StepperResult::Ok(position + direction * step_length),
            Self::RungeKutta4 => {
                let half_step = 0.5 * step_length;
                let stage = |stage_position: Vec3<ftr>| {
                    field_direction(field, interpolator, &stage_position, min_field_magnitude)
                };
                let k2 = match stage(position + direction * half_step) {
                    StepperResult::Ok(k) => k,
                    StepperResult::Stopped(cause) => return StepperResult::Stopped(cause),
                };
                let k3 = match stage(position + &k2 * half_step) {
                    StepperResult::Ok(k) => k,
                    StepperResult::Stopped(cause) => return StepperResult::Stopped(cause),
                };
                let k4 = match stage(position + &k3 * step_length) {
                    StepperResult::Ok(k) => k,
                    StepperResult::Stopped(cause) => return StepperResult::Stopped(cause),
                };
                let displacement = (direction + &(k2 + k3) * 2.0 + k4) * (step_length / 6.0);
                StepperResult::Ok(position + displacement)
            }
        }
    }
}

impl FromStr for SteppingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "euler" => Ok(Self::Euler),
            "rk4" | "runge_kutta4" => Ok(Self::RungeKutta4),
            other => Err(format!("Invalid stepping scheme: {}", other)),
        }
    }
}

impl fmt::Display for SteppingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euler => write!(f, "euler"),
            Self::RungeKutta4 => write!(f, "rk4"),
        }
    }
}

/// Computes the normalized field direction at the given lattice-space position.
///
/// Positions outside the grid stop with `LeftGrid`, and fields weaker than
/// `min_field_magnitude` stop with `SingularField`.
pub fn field_direction<F, I>(
    field: &VectorField3<F>,
    interpolator: &I,
    position: &Vec3<ftr>,
    min_field_magnitude: ftr,
) -> StepperResult<Vec3<ftr>>
where
    F: BFloat,
    I: Interpolator3,
{
    match interpolator.interp_vector_field(field, &Vec3::from(position)) {
        Ok(field_vector) => unit_direction(&Vec3::from(&field_vector), min_field_magnitude),
        Err(_) => StepperResult::Stopped(StoppingCause::LeftGrid),
    }
}

/// Normalizes the given vector, stopping with `SingularField` if it is too short
/// (or not finite).
pub fn unit_direction(vector: &Vec3<ftr>, min_field_magnitude: ftr) -> StepperResult<Vec3<ftr>> {
    let length = vector.length();
    if length.is_finite() && length > 0.0 && length >= min_field_magnitude {
        StepperResult::Ok(vector / length)
    } else {
        StepperResult::Stopped(StoppingCause::SingularField)
    }
}
