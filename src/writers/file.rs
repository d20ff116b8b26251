//! File sink

use crate::core::Result;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only log file
///
/// Each write holds an advisory exclusive lock on the file, so whole lines
/// from several processes sharing the file do not interleave.
#[derive(Debug)]
pub struct FileWriter {
    file: File,
    path: PathBuf,
}

impl FileWriter {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        FileExt::lock_exclusive(&self.file)?;
        let written = self.file.write_all(buf);
        let unlocked = FileExt::unlock(&self.file);
        written?;
        unlocked?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
