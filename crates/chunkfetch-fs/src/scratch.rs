use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

const MAX_ALLOCATE_ATTEMPTS: u32 = 3;

/// A directory that holds chunk parts and assembled downloads.
///
/// The directory is created on construction and again before every
/// allocation if it has gone missing. Nothing is removed on drop: assembled files outlive the scratch handle
/// and cleanup of leftovers is the caller's business.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let scratch = Self { root: root.into() };
        scratch.ensure_root()?;
        Ok(scratch)
    }

    /// Creates the root again if something removed it since construction.
    fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|source| Error::CreateDir {
            path: self.root.clone(),
            source,
        })
    }

    /// `<system temp dir>/chunkfetch`.
    pub fn default_root() -> PathBuf { std::env::temp_dir().join("chunkfetch") }

    pub fn path(&self) -> &Path { &self.root }

    /// Reserves a fresh, uniquely named empty file and returns its path.
    ///
    /// The name is a random UUID with `extension` appended when given, so
    /// `allocate(Some("zip"))` yields something like `3f2c...e1.zip`.
    pub fn allocate(&self, extension: Option<&str>) -> Result<PathBuf> {
        let extension = extension.map(normalize_extension).transpose()?;
        self.ensure_root()?;

        for _ in 0..MAX_ALLOCATE_ATTEMPTS {
            let mut name = uuid::Uuid::new_v4().simple().to_string();
            if let Some(ext) = extension {
                name.push('.');
                name.push_str(ext);
            }
            let path = self.root.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(Error::Allocate { path, source }),
            }
        }

        Err(Error::RetryLimitExceeded)
    }

    /// Path for a named entry inside the directory. Does not touch the disk.
    pub fn entry(&self, name: &str) -> PathBuf { self.root.join(name) }
}

fn normalize_extension(ext: &str) -> Result<&str> {
    let ext = ext.trim_start_matches('.');
    if ext.is_empty() || ext.contains(['/', '\\']) {
        return Err(Error::InvalidExtension(ext.to_string()));
    }
    Ok(ext)
}
