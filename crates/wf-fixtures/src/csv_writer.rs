//! Writes fixture content to disk, one line per string.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create or truncate `path` and write each string followed by `\n`.
///
/// No quoting is applied; every string must already be a valid CSV row.
///
/// # Errors
///
/// Returns the underlying `io::Error` unchanged, e.g. `NotFound` when the
/// parent directory does not exist.
pub fn write_csv<S: AsRef<str>>(content: &[S], path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in content {
        writer.write_all(line.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn lines_are_newline_terminated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&["a,b", "1,'x,y'"], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,'x,y'\n");
    }

    #[test]
    fn existing_file_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old contents that are longer\n").unwrap();
        write_csv(&["new"], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn empty_content_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv::<&str>(&[], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn missing_parent_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("out.csv");
        let err = write_csv(&["a"], &path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
