//! Output files that only appear once fully written.
//!
//! Content is streamed into `<path>.tmp` and renamed onto `<path>` by
//! [`AtomicOutput::commit`]. Dropping an uncommitted output removes the
//! temporary file, so a failed run leaves no report behind.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};

/// Buffered writer over a temporary sibling of the destination path
pub struct AtomicOutput {
    writer: BufWriter<File>,
    temp_path: PathBuf,
    path: PathBuf,
    committed: bool,
}

impl AtomicOutput {
    /// Create the temporary file, creating parent directories as needed
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory '{}'", parent.display()))?;
        }

        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        let file = File::create(&temp_path)
            .with_context(|| format!("Failed to create output file '{}'", temp_path.display()))?;

        Ok(Self {
            writer: BufWriter::with_capacity(64 * 1024, file),
            temp_path,
            path: path.to_path_buf(),
            committed: false,
        })
    }

    /// Flush and move the finished file into place
    pub fn commit(mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush '{}'", self.temp_path.display()))?;
        fs::rename(&self.temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename '{}' to '{}'",
                self.temp_path.display(),
                self.path.display()
            )
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Write for AtomicOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for AtomicOutput {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

/// Write a whole string atomically
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut output = AtomicOutput::create(path)?;
    output
        .write_all(content.as_bytes())
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    output.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_moves_file_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.txt");

        let mut output = AtomicOutput::create(&path).unwrap();
        writeln!(output, "hello").unwrap();
        assert!(!path.exists());
        output.commit().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        assert!(!dir.path().join("nested").join("report.txt.tmp").exists());
    }

    #[test]
    fn test_uncommitted_output_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        {
            let mut output = AtomicOutput::create(&path).unwrap();
            writeln!(output, "partial").unwrap();
        }
        assert!(!path.exists());
        assert!(!dir.path().join("report.txt.tmp").exists());
    }

    #[test]
    fn test_write_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.txt");
        write_atomic(&path, "a\nb\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }
}
