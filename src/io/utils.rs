//! Utilities for input/output.

use super::OverwriteMode;
use std::{
    fs,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

#[cfg(feature = "json")]
use serde::Serialize;

/// Reads and returns the content of the specified text file.
pub fn read_text_file<P: AsRef<Path>>(file_path: P) -> io::Result<String> {
    let file_path = file_path.as_ref();
    let file = fs::File::open(file_path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Could not open {}: {}", file_path.display(), err),
        )
    })?;
    let mut text = String::new();
    let _ = io::BufReader::new(file).read_to_string(&mut text)?;
    Ok(text)
}

/// Checks whether the given output path may be written to.
///
/// Fails with `io::ErrorKind::AlreadyExists` if the file exists and may not
/// be overwritten.
pub fn check_if_write_allowed<P: AsRef<Path>>(
    output_file_path: P,
    overwrite_mode: OverwriteMode,
) -> io::Result<()> {
    let output_file_path = output_file_path.as_ref();
    if overwrite_mode == OverwriteMode::Never && output_file_path.exists() {
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "{} already exists (use --overwrite to replace it)",
                output_file_path.display()
            ),
        ))
    } else {
        Ok(())
    }
}

/// Writes to a temporary file in the directory of the given output path and
/// moves it into place once `write` has succeeded.
///
/// The output file is left untouched if writing fails.
pub fn write_atomically<P, W>(
    output_file_path: P,
    overwrite_mode: OverwriteMode,
    write: W,
) -> io::Result<()>
where
    P: AsRef<Path>,
    W: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let output_file_path = output_file_path.as_ref();
    check_if_write_allowed(output_file_path, overwrite_mode)?;

    let output_dir = match output_file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = tempfile::NamedTempFile::new_in(output_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file
        .persist(output_file_path)
        .map_err(|err| err.error)?;
    Ok(())
}

/// Writes the given text to the given path atomically.
pub fn write_text_file<P: AsRef<Path>>(
    output_file_path: P,
    overwrite_mode: OverwriteMode,
    text: &str,
) -> io::Result<()> {
    write_atomically(output_file_path, overwrite_mode, |writer| {
        writer.write_all(text.as_bytes())
    })
}

/// Serializes the given data into JSON format and writes it to the given writer.
#[cfg(feature = "json")]
pub fn write_data_as_json<T: Serialize>(writer: &mut dyn Write, data: &T) -> io::Result<()> {
    serde_json::to_writer(writer, data).map_err(io::Error::from)
}

/// Serializes the given data into JSON format and saves it atomically at the given path.
#[cfg(feature = "json")]
pub fn save_data_as_json<P, T>(
    output_file_path: P,
    overwrite_mode: OverwriteMode,
    data: &T,
) -> io::Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    write_atomically(output_file_path, overwrite_mode, |writer| {
        write_data_as_json(writer, data)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_files_are_only_replaced_when_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_text_file(&path, OverwriteMode::Never, "first").unwrap();
        assert_eq!(read_text_file(&path).unwrap(), "first");

        let err = write_text_file(&path, OverwriteMode::Never, "second").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(read_text_file(&path).unwrap(), "first");

        write_text_file(&path, OverwriteMode::Always, "third").unwrap();
        assert_eq!(read_text_file(&path).unwrap(), "third");
    }

    #[test]
    fn failed_writes_leave_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let result = write_atomically(&path, OverwriteMode::Never, |writer| {
            writer.write_all(b"partial")?;
            Err(io::Error::new(io::ErrorKind::Other, "interrupted"))
        });
        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_input_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text_file(dir.path().join("missing.vti")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("missing.vti"));
    }
}
