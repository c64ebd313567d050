//! Reading and writing fields in the VTK ImageData XML format.

use super::{fdt, utils, OverwriteMode};
use crate::{
    error::GridError,
    field::{ScalarField3, VectorField3},
    geometry::{
        Dim3::{X, Y, Z},
        In3D, Vec3,
    },
    grid::regular::RegularGrid3,
};
use std::{io, path::Path, sync::Arc};
use xml::{
    reader::{EventReader, XmlEvent as ReaderEvent},
    writer::{EventWriter, XmlEvent as WriterEvent},
    EmitterConfig,
};

/// A named array of point data.
#[derive(Clone, Debug, PartialEq)]
pub struct DataArray {
    name: String,
    number_of_components: usize,
    values: Vec<fdt>,
}

impl DataArray {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number_of_components(&self) -> usize {
        self.number_of_components
    }

    pub fn values(&self) -> &[fdt] {
        &self.values
    }
}

/// Content of a VTK ImageData file: the lattice geometry and all point data arrays.
#[derive(Clone, Debug)]
pub struct VtiFile {
    grid: Arc<RegularGrid3<fdt>>,
    arrays: Vec<DataArray>,
}

#[derive(Default)]
struct ImageDataMetadata {
    whole_extent: Option<Vec<i64>>,
    origin: Option<Vec<fdt>>,
    spacing: Option<Vec<fdt>>,
}

struct PendingArray {
    name: String,
    number_of_components: usize,
    text: String,
}

fn invalid_data<S: Into<String>>(message: S) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

fn parse_numbers<T>(attribute_name: &str, text: &str, expected_count: usize) -> io::Result<Vec<T>>
where
    T: std::str::FromStr,
{
    let values = text
        .split_whitespace()
        .map(|value| {
            value.parse().map_err(|_| {
                invalid_data(format!("Invalid value {} in {}", value, attribute_name))
            })
        })
        .collect::<io::Result<Vec<T>>>()?;
    if values.len() != expected_count {
        return Err(invalid_data(format!(
            "Expected {} values in {} but got {}",
            expected_count,
            attribute_name,
            values.len()
        )));
    }
    Ok(values)
}

impl VtiFile {
    /// Reads the VTK ImageData file at the given path.
    ///
    /// Only ASCII point data arrays are supported; binary or appended data
    /// is reported as invalid data.
    pub fn read<P: AsRef<Path>>(input_file_path: P) -> io::Result<Self> {
        let text = utils::read_text_file(input_file_path)?;
        Self::parse(&text)
    }

    /// Parses VTK ImageData XML content.
    pub fn parse(text: &str) -> io::Result<Self> {
        let mut metadata = ImageDataMetadata::default();
        let mut arrays = Vec::new();
        let mut found_image_data_file = false;
        let mut inside_point_data = false;
        let mut pending_array: Option<PendingArray> = None;

        for event in EventReader::new(text.as_bytes()) {
            let event = event.map_err(|err| invalid_data(format!("Invalid XML: {}", err)))?;
            match event {
                ReaderEvent::StartElement {
                    name, attributes, ..
                } => {
                    let attribute = |attribute_name: &str| {
                        attributes
                            .iter()
                            .find(|attribute| attribute.name.local_name == attribute_name)
                            .map(|attribute| attribute.value.as_str())
                    };
                    match name.local_name.as_str() {
                        "VTKFile" => {
                            if attribute("type") != Some("ImageData") {
                                return Err(invalid_data("VTK file type is not ImageData"));
                            }
                            if attribute("compressor").is_some() {
                                return Err(invalid_data("Compressed VTK files are not supported"));
                            }
                            found_image_data_file = true;
                        }
                        "ImageData" => {
                            metadata.whole_extent = attribute("WholeExtent")
                                .map(|text| parse_numbers("WholeExtent", text, 6))
                                .transpose()?;
                            metadata.origin = attribute("Origin")
                                .map(|text| parse_numbers("Origin", text, 3))
                                .transpose()?;
                            metadata.spacing = attribute("Spacing")
                                .map(|text| parse_numbers("Spacing", text, 3))
                                .transpose()?;
                        }
                        "PointData" => inside_point_data = true,
                        "DataArray" if inside_point_data => {
                            let format = attribute("format").unwrap_or("ascii");
                            if format != "ascii" {
                                return Err(invalid_data(format!(
                                    "Unsupported DataArray format {} (only ascii is supported)",
                                    format
                                )));
                            }
                            let number_of_components = match attribute("NumberOfComponents") {
                                Some(text) => text.trim().parse().map_err(|_| {
                                    invalid_data(format!("Invalid NumberOfComponents {}", text))
                                })?,
                                None => 1,
                            };
                            pending_array = Some(PendingArray {
                                name: attribute("Name").unwrap_or("").to_string(),
                                number_of_components,
                                text: String::new(),
                            });
                        }
                        "AppendedData" => {
                            return Err(invalid_data("Appended VTK data is not supported"))
                        }
                        _ => {}
                    }
                }
                ReaderEvent::Characters(characters) => {
                    if let Some(array) = pending_array.as_mut() {
                        array.text.push(' ');
                        array.text.push_str(&characters);
                    }
                }
                ReaderEvent::EndElement { name } => match name.local_name.as_str() {
                    "PointData" => inside_point_data = false,
                    "DataArray" => {
                        if let Some(array) = pending_array.take() {
                            let values = array
                                .text
                                .split_whitespace()
                                .map(|value| {
                                    value.parse().map_err(|_| {
                                        invalid_data(format!(
                                            "Invalid value {} in DataArray {}",
                                            value, array.name
                                        ))
                                    })
                                })
                                .collect::<io::Result<Vec<fdt>>>()?;
                            arrays.push(DataArray {
                                name: array.name,
                                number_of_components: array.number_of_components,
                                values,
                            });
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        if !found_image_data_file {
            return Err(invalid_data("Missing VTKFile element"));
        }
        let grid = Self::grid_from_metadata(metadata)?;
        Ok(Self {
            grid: Arc::new(grid),
            arrays,
        })
    }

    fn grid_from_metadata(metadata: ImageDataMetadata) -> Result<RegularGrid3<fdt>, GridError> {
        let extent = metadata
            .whole_extent
            .ok_or_else(|| GridError::MissingMetadata("WholeExtent".to_string()))?;
        let origin = metadata
            .origin
            .ok_or_else(|| GridError::MissingMetadata("Origin".to_string()))?;
        let spacing = metadata
            .spacing
            .ok_or_else(|| GridError::MissingMetadata("Spacing".to_string()))?;

        let mut shape = In3D::same(0);
        for dim in [X, Y, Z] {
            let (start, end) = (extent[2 * dim.num()], extent[2 * dim.num() + 1]);
            if end >= start {
                shape[dim] = end
                    .checked_sub(start)
                    .and_then(|span| span.checked_add(1))
                    .and_then(|size| usize::try_from(size).ok())
                    .ok_or(GridError::InvalidExtent { start, end })?;
            }
        }
        let spacing = Vec3::new(spacing[0], spacing[1], spacing[2]);
        let origin = Vec3::with_each_component(|dim| {
            origin[dim.num()] + extent[2 * dim.num()] as fdt * spacing[dim]
        });

        RegularGrid3::new(shape, origin, spacing)
    }

    /// Returns a reference to the grid.
    pub fn grid(&self) -> &RegularGrid3<fdt> {
        self.grid.as_ref()
    }

    /// Returns the point data arrays in file order.
    pub fn arrays(&self) -> &[DataArray] {
        &self.arrays
    }

    fn find_array(&self, name: Option<&str>, number_of_components: usize) -> Option<&DataArray> {
        match name {
            Some(name) => self.arrays.iter().find(|array| array.name == name),
            None => self
                .arrays
                .iter()
                .find(|array| array.number_of_components == number_of_components),
        }
    }

    /// Creates a vector field from the 3-component array with the given name,
    /// or from the first 3-component array if no name is given.
    pub fn vector_field(&self, name: Option<&str>) -> io::Result<VectorField3<fdt>> {
        let array = self.find_array(name, 3).ok_or_else(|| {
            invalid_data(match name {
                Some(name) => format!("No point data array named {}", name),
                None => "No 3-component point data array".to_string(),
            })
        })?;
        if array.number_of_components != 3 {
            return Err(invalid_data(format!(
                "Point data array {} has {} components, expected 3",
                array.name, array.number_of_components
            )));
        }
        let expected = self
            .grid
            .number_of_points()
            .checked_mul(3)
            .ok_or_else(|| GridError::TooManyPoints(*self.grid.shape()))?;
        if array.values.len() != expected {
            return Err(GridError::SampleCountMismatch {
                expected,
                actual: array.values.len(),
            }
            .into());
        }
        let vectors = array
            .values
            .chunks_exact(3)
            .map(|components| Vec3::new(components[0], components[1], components[2]))
            .collect();
        Ok(VectorField3::from_ordered_vectors(
            array.name.clone(),
            Arc::clone(&self.grid),
            vectors,
        )?)
    }

    /// Creates a scalar field from the single-component array with the given
    /// name, or from the first single-component array if no name is given.
    ///
    /// Returns `None` if no name is given and there is no single-component array.
    pub fn scalar_field(&self, name: Option<&str>) -> io::Result<Option<ScalarField3<fdt>>> {
        let array = match (self.find_array(name, 1), name) {
            (Some(array), _) => array,
            (None, Some(name)) => {
                return Err(invalid_data(format!("No point data array named {}", name)))
            }
            (None, None) => return Ok(None),
        };
        if array.number_of_components != 1 {
            return Err(invalid_data(format!(
                "Point data array {} has {} components, expected 1",
                array.name, array.number_of_components
            )));
        }
        Ok(Some(ScalarField3::from_ordered_values(
            array.name.clone(),
            Arc::clone(&self.grid),
            array.values.clone(),
        )?))
    }
}

fn write_event<'a, W, E>(xml_writer: &mut EventWriter<W>, event: E) -> io::Result<()>
where
    W: io::Write,
    E: Into<WriterEvent<'a>>,
{
    xml_writer
        .write(event)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))
}

fn write_data_array<W: io::Write>(
    xml_writer: &mut EventWriter<W>,
    name: &str,
    number_of_components: usize,
    values: &[fdt],
) -> io::Result<()> {
    let number_of_components = number_of_components.to_string();
    write_event(
        xml_writer,
        WriterEvent::start_element("DataArray")
            .attr("type", "Float64")
            .attr("Name", name)
            .attr("NumberOfComponents", &number_of_components)
            .attr("format", "ascii"),
    )?;
    write_event(xml_writer, WriterEvent::characters(&format_values(values)))?;
    write_event(xml_writer, WriterEvent::end_element())
}

fn format_values<'a, I: IntoIterator<Item = &'a fdt>>(values: I) -> String {
    values
        .into_iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes the given vector field and optional weights as a VTK ImageData file.
pub fn write_vti<W: io::Write>(
    writer: W,
    field: &VectorField3<fdt>,
    weights: Option<&ScalarField3<fdt>>,
) -> io::Result<()> {
    let grid = field.grid();
    let shape = grid.shape();
    let extent = format!(
        "0 {} 0 {} 0 {}",
        shape[X] - 1,
        shape[Y] - 1,
        shape[Z] - 1
    );
    let origin = format_values(grid.origin());
    let spacing = format_values(grid.spacing());

    let mut xml_writer = EmitterConfig::new()
        .perform_indent(true)
        .create_writer(writer);

    write_event(
        &mut xml_writer,
        WriterEvent::start_element("VTKFile")
            .attr("type", "ImageData")
            .attr("version", "1.0")
            .attr("byte_order", "LittleEndian"),
    )?;
    write_event(
        &mut xml_writer,
        WriterEvent::start_element("ImageData")
            .attr("WholeExtent", &extent)
            .attr("Origin", &origin)
            .attr("Spacing", &spacing),
    )?;
    write_event(
        &mut xml_writer,
        WriterEvent::start_element("Piece").attr("Extent", &extent),
    )?;

    let mut point_data = WriterEvent::start_element("PointData").attr("Vectors", field.name());
    if let Some(weights) = weights {
        point_data = point_data.attr("Scalars", weights.name());
    }
    write_event(&mut xml_writer, point_data)?;

    let vector_values: Vec<fdt> = field
        .ordered_vectors()
        .iter()
        .flat_map(|vector| [vector[X], vector[Y], vector[Z]])
        .collect();
    write_data_array(&mut xml_writer, field.name(), 3, &vector_values)?;

    if let Some(weights) = weights {
        write_data_array(&mut xml_writer, weights.name(), 1, &weights.ordered_values())?;
    }

    write_event(&mut xml_writer, WriterEvent::end_element())?; // PointData
    write_event(&mut xml_writer, WriterEvent::start_element("CellData"))?;
    write_event(&mut xml_writer, WriterEvent::end_element())?;
    write_event(&mut xml_writer, WriterEvent::end_element())?; // Piece
    write_event(&mut xml_writer, WriterEvent::end_element())?; // ImageData
    write_event(&mut xml_writer, WriterEvent::end_element())?; // VTKFile
    Ok(())
}

/// Writes the given vector field and optional weights atomically to a VTK ImageData file.
pub fn save_vti<P: AsRef<Path>>(
    output_file_path: P,
    overwrite_mode: OverwriteMode,
    field: &VectorField3<fdt>,
    weights: Option<&ScalarField3<fdt>>,
) -> io::Result<()> {
    utils::write_atomically(output_file_path, overwrite_mode, |writer| {
        write_vti(writer, field, weights)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Idx3;

    const SMALL_VTI: &str = r#"<?xml version="1.0"?>
<VTKFile type="ImageData" version="1.0" byte_order="LittleEndian">
  <ImageData WholeExtent="1 2 0 1 0 0" Origin="0.5 -1 2" Spacing="0.25 0.5 1">
    <Piece Extent="1 2 0 1 0 0">
      <PointData Vectors="J" Scalars="rho">
        <DataArray type="Float64" Name="rho" format="ascii">
          1 2 3 4
        </DataArray>
        <DataArray type="Float32" Name="J" NumberOfComponents="3" format="ascii">
          0 0 1  1 0 0
          0 1 0  -1 -1 -1
        </DataArray>
      </PointData>
    </Piece>
  </ImageData>
</VTKFile>
"#;

    #[test]
    fn image_data_is_parsed() {
        let file = VtiFile::parse(SMALL_VTI).unwrap();
        let grid = file.grid();
        assert_eq!(grid.shape(), &In3D::new(2, 2, 1));
        assert_eq!(grid.origin(), &Vec3::new(0.75, -1.0, 2.0));
        assert_eq!(grid.spacing(), &Vec3::new(0.25, 0.5, 1.0));

        let field = file.vector_field(None).unwrap();
        assert_eq!(field.name(), "J");
        assert_eq!(field.vector(&Idx3::new(1, 0, 0)), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(
            field.vector(&Idx3::new(1, 1, 0)),
            Vec3::new(-1.0, -1.0, -1.0)
        );

        let weights = file.scalar_field(None).unwrap().unwrap();
        assert_eq!(weights.name(), "rho");
        assert_eq!(weights.value(&Idx3::new(0, 1, 0)), 3.0);
        assert!(file.scalar_field(Some("J")).is_err());
        assert!(file.vector_field(Some("missing")).is_err());
    }

    #[test]
    fn written_file_reads_back_identically() {
        let source = VtiFile::parse(SMALL_VTI).unwrap();
        let field = source.vector_field(Some("J")).unwrap();
        let weights = source.scalar_field(Some("rho")).unwrap();

        let mut buffer = Vec::new();
        write_vti(&mut buffer, &field, weights.as_ref()).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let file = VtiFile::parse(&text).unwrap();
        assert_eq!(file.grid(), source.grid());
        assert_eq!(
            file.vector_field(None).unwrap().ordered_vectors(),
            field.ordered_vectors()
        );
        assert_eq!(
            file.scalar_field(None).unwrap().unwrap().ordered_values(),
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn missing_metadata_is_invalid_data() {
        let text = SMALL_VTI.replace(r#"Spacing="0.25 0.5 1""#, "");
        let err = VtiFile::parse(&text).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("Spacing"));
    }

    #[test]
    fn sample_count_mismatch_is_invalid_data() {
        let text = SMALL_VTI.replace("-1 -1 -1", "-1 -1");
        let file = VtiFile::parse(&text).unwrap();
        let err = file.vector_field(None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn oversized_extent_is_invalid_data() {
        let huge_shape = SMALL_VTI.replace(
            r#"WholeExtent="1 2 0 1 0 0""#,
            r#"WholeExtent="0 3000000 0 3000000 0 3000000""#,
        );
        let err = VtiFile::parse(&huge_shape).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("too many points"));

        let huge_span = SMALL_VTI.replace(
            r#"WholeExtent="1 2 0 1 0 0""#,
            r#"WholeExtent="-9223372036854775808 9223372036854775807 0 1 0 0""#,
        );
        let err = VtiFile::parse(&huge_span).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn unsupported_content_is_rejected() {
        let binary = SMALL_VTI.replace(
            r#"NumberOfComponents="3" format="ascii""#,
            r#"NumberOfComponents="3" format="binary""#,
        );
        assert!(VtiFile::parse(&binary).is_err());

        let other_type = SMALL_VTI.replace(r#"type="ImageData""#, r#"type="PolyData""#);
        assert!(VtiFile::parse(&other_type).is_err());

        let bad_number = SMALL_VTI.replace("1 2 3 4", "1 2 three 4");
        assert!(VtiFile::parse(&bad_number).is_err());

        let zero_spacing =
            SMALL_VTI.replace(r#"Spacing="0.25 0.5 1""#, r#"Spacing="0.25 0 1""#);
        assert!(VtiFile::parse(&zero_spacing).is_err());

        assert!(VtiFile::parse("<VTKFile").is_err());
    }
}
