//! Plain text input and output of classifications, trajectories and point sets.

use super::{utils, OverwriteMode};
use crate::{
    geometry::{
        Dim3::{X, Y, Z},
        Vec3,
    },
    tracing::ftr,
    tropicity::Tropicity,
};
use ndarray::prelude::*;
use std::{
    fmt::Write as _,
    io::{self, Write},
    path::Path,
};

#[cfg(feature = "json")]
use crate::tracing::{stepping::StoppingCause, trajectory::Trajectory};
#[cfg(feature = "json")]
use serde::Serialize;

fn invalid_data<S: Into<String>>(message: S) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

/// Writes the classification codes of a plane as a whitespace separated
/// integer matrix, one row per index along the first plane axis.
pub fn write_trop_plane(writer: &mut dyn Write, classifications: &Array2<Tropicity>) -> io::Result<()> {
    for row in classifications.rows() {
        let line = row
            .iter()
            .map(|tropicity| tropicity.code().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

/// Writes the classification codes of a plane as a nested JSON array.
#[cfg(feature = "json")]
pub fn write_trop_plane_as_json(
    writer: &mut dyn Write,
    classifications: &Array2<Tropicity>,
) -> io::Result<()> {
    let codes: Vec<Vec<i8>> = classifications
        .rows()
        .into_iter()
        .map(|row| row.iter().map(Tropicity::code).collect())
        .collect();
    utils::write_data_as_json(writer, &codes)
}

/// Formats the given positions as a Mathematica list of 3D points.
pub fn format_positions_as_mathematica_list(positions: &[Vec3<ftr>]) -> String {
    let mut text = String::from("{");
    for (idx, position) in positions.iter().enumerate() {
        if idx > 0 {
            text.push(',');
        }
        // Writing to a string cannot fail
        let _ = write!(
            text,
            "{{{},{},{}}}",
            position[X], position[Y], position[Z]
        );
    }
    text.push('}');
    text
}

/// Writes the given positions as a Mathematica list of 3D points.
pub fn write_trajectory(writer: &mut dyn Write, positions: &[Vec3<ftr>]) -> io::Result<()> {
    writeln!(writer, "{}", format_positions_as_mathematica_list(positions))
}

/// Summary of a traced trajectory for serialization.
#[cfg(feature = "json")]
#[derive(Clone, Debug, Serialize)]
pub struct TrajectoryRecord {
    pub positions: Vec<[ftr; 3]>,
    pub stopping_cause: Option<StoppingCause>,
    pub accumulated_rotation: ftr,
    pub classification: Tropicity,
}

#[cfg(feature = "json")]
impl TrajectoryRecord {
    /// Creates a record of the given trajectory with the given output positions.
    pub fn new(
        trajectory: &Trajectory,
        positions: &[Vec3<ftr>],
        accumulated_rotation: ftr,
        classification: Tropicity,
    ) -> Self {
        Self {
            positions: positions
                .iter()
                .map(|position| [position[X], position[Y], position[Z]])
                .collect(),
            stopping_cause: trajectory.stopping_cause(),
            accumulated_rotation,
            classification,
        }
    }
}

/// Parses points given as one whitespace separated `x y z` triple per line.
/// Blank lines are ignored.
pub fn parse_points(text: &str) -> io::Result<Vec<Vec3<ftr>>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_idx, line)| {
            let coords = line
                .split_whitespace()
                .map(|value| value.parse::<ftr>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| {
                    invalid_data(format!("Invalid point on line {}: {}", line_idx + 1, err))
                })?;
            if coords.len() != 3 {
                return Err(invalid_data(format!(
                    "Expected 3 coordinates on line {} but got {}",
                    line_idx + 1,
                    coords.len()
                )));
            }
            Ok(Vec3::new(coords[0], coords[1], coords[2]))
        })
        .collect()
}

/// Parses one weight per line. Blank lines are ignored.
pub fn parse_weights(text: &str) -> io::Result<Vec<ftr>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_idx, line)| {
            line.trim().parse::<ftr>().map_err(|err| {
                invalid_data(format!("Invalid weight on line {}: {}", line_idx + 1, err))
            })
        })
        .collect()
}

/// Reads points from the text file at the given path.
pub fn read_points<P: AsRef<Path>>(input_file_path: P) -> io::Result<Vec<Vec3<ftr>>> {
    parse_points(&utils::read_text_file(input_file_path)?)
}

/// Reads weights from the text file at the given path.
pub fn read_weights<P: AsRef<Path>>(input_file_path: P) -> io::Result<Vec<ftr>> {
    parse_weights(&utils::read_text_file(input_file_path)?)
}

/// Writes points atomically as one `x y z` triple per line.
pub fn save_points<P: AsRef<Path>>(
    output_file_path: P,
    overwrite_mode: OverwriteMode,
    points: &[Vec3<ftr>],
) -> io::Result<()> {
    utils::write_atomically(output_file_path, overwrite_mode, |writer| {
        for point in points {
            writeln!(writer, "{} {} {}", point[X], point[Y], point[Z])?;
        }
        Ok(())
    })
}

/// Writes weights atomically as one value per line.
pub fn save_weights<P: AsRef<Path>>(
    output_file_path: P,
    overwrite_mode: OverwriteMode,
    weights: &[ftr],
) -> io::Result<()> {
    utils::write_atomically(output_file_path, overwrite_mode, |writer| {
        for weight in weights {
            writeln!(writer, "{}", weight)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trop_plane_is_written_as_code_matrix() {
        let classifications = Array2::from_shape_vec(
            (2, 3),
            vec![
                Tropicity::Isotropic,
                Tropicity::Undetermined,
                Tropicity::Paratropic,
                Tropicity::Paratropic,
                Tropicity::Paratropic,
                Tropicity::Isotropic,
            ],
        )
        .unwrap();
        let mut buffer = Vec::new();
        write_trop_plane(&mut buffer, &classifications).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "-1 0 1\n1 1 -1\n");
    }

    #[test]
    fn trajectories_are_written_as_mathematica_lists() {
        let positions = vec![Vec3::new(0.0, 1.5, -2.0), Vec3::new(0.25, 1.5, -2.0)];
        assert_eq!(
            format_positions_as_mathematica_list(&positions),
            "{{0,1.5,-2},{0.25,1.5,-2}}"
        );
        assert_eq!(format_positions_as_mathematica_list(&[]), "{}");
    }

    #[test]
    fn points_and_weights_parse() {
        let points = parse_points("1 2 3\n\n -0.5 0 1e-3 \n").unwrap();
        assert_eq!(
            points,
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-0.5, 0.0, 1e-3)]
        );
        assert!(parse_points("1 2\n").is_err());
        assert!(parse_points("1 2 x\n").is_err());

        assert_eq!(parse_weights("0.5\n2\n\n").unwrap(), vec![0.5, 2.0]);
        assert_eq!(
            parse_weights("0.5\nnope\n").unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }

    #[test]
    fn saved_points_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points");
        let points = vec![Vec3::new(0.1, -2.0, 3e10), Vec3::new(0.0, 0.0, 0.0)];
        save_points(&path, OverwriteMode::Never, &points).unwrap();
        assert_eq!(read_points(&path).unwrap(), points);
    }
}
