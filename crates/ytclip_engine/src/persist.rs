use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;
use ytclip_core::SavedArtifact;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the output directory exists and accepts new files.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        }
        Err(err) => return Err(PersistError::OutputDir(err.to_string())),
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Lowercase hex SHA-256 of `content`.
pub fn sha256_hex(content: &[u8]) -> String {
    to_hex(&Sha256::digest(content))
}

fn to_hex(digest: &[u8]) -> String {
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

/// Writes whole files into one directory; readers never see a partial file.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `content` to `{dir}/{name}` via a temp file and rename,
    /// replacing any existing file of that name.
    pub fn write(&self, name: &str, content: &[u8]) -> Result<SavedArtifact, PersistError> {
        let mut file = ArtifactFile::create(&self.dir, name)?;
        file.write_all(content)?;
        file.finish()
    }
}

/// A file filled incrementally in a temp location, hashed as bytes arrive.
///
/// Nothing appears at the target path until [`ArtifactFile::finish`]; dropping
/// the value discards the partial data.
pub struct ArtifactFile {
    tmp: NamedTempFile,
    target: PathBuf,
    hasher: Sha256,
    bytes: u64,
}

impl ArtifactFile {
    pub fn create(dir: &Path, name: &str) -> Result<Self, PersistError> {
        ensure_output_dir(dir)?;
        Ok(Self {
            tmp: NamedTempFile::new_in(dir)?,
            target: dir.join(name),
            hasher: Sha256::new(),
            bytes: 0,
        })
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Syncs the data and renames it into place.
    pub fn finish(mut self) -> Result<SavedArtifact, PersistError> {
        self.tmp.flush()?;
        self.tmp.as_file_mut().sync_all()?;
        let sha256 = to_hex(&self.hasher.finalize());
        self.tmp
            .persist(&self.target)
            .map_err(|e| PersistError::Io(e.error))?;

        Ok(SavedArtifact {
            path: self.target,
            bytes: self.bytes,
            sha256,
        })
    }
}

impl Write for ArtifactFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.tmp.write(buf)?;
        self.hasher.update(&buf[..written]);
        self.bytes += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.tmp.flush()
    }
}
