//! Fragment sources backed by files already on disk.
//!
//! Fetching from the documentation site happens elsewhere; these sources
//! read what that step saved so the merge can be re-run offline.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use specfold_openapi::Fragment;

use crate::error::{Error, Result};

/// Produces the ordered fragment list a run merges.
pub trait FragmentSource {
    /// Load every fragment, in discovery order.
    fn load(&self) -> Result<Vec<Fragment>>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// A JSON array of `{title, referenceLink, specLink, specData}` records,
/// the same format as the raw dump artifact.
#[derive(Debug, Clone)]
pub struct RawDumpSource {
    path: PathBuf,
}

impl RawDumpSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FragmentSource for RawDumpSource {
    fn load(&self) -> Result<Vec<Fragment>> {
        let bytes = fs::read(&self.path).map_err(|e| Error::io(&self.path, e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::invalid_source(&self.path, format!("not a fragment list: {e}")))
    }

    fn describe(&self) -> String {
        format!("raw dump {}", self.path.display())
    }
}

/// One spec document per `*.json` file, ordered by file name.
///
/// The file stem becomes the fragment title and the file path its spec link.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn spec_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| Error::io(&self.dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&self.dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl FragmentSource for DirectorySource {
    fn load(&self) -> Result<Vec<Fragment>> {
        self.spec_files()?
            .into_iter()
            .map(|path| -> Result<Fragment> {
                let bytes = fs::read(&path).map_err(|e| Error::io(&path, e))?;
                let spec: Value = serde_json::from_slice(&bytes)
                    .map_err(|e| Error::invalid_source(&path, format!("not JSON: {e}")))?;
                let title = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(Fragment::new(title, spec).with_spec_link(path.display().to_string()))
            })
            .collect()
    }

    fn describe(&self) -> String {
        format!("spec directory {}", self.dir.display())
    }
}

/// Pick a source for `path`: a directory of specs or a raw dump file.
pub fn open(path: &Path) -> Result<Box<dyn FragmentSource>> {
    let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;
    if meta.is_dir() {
        Ok(Box::new(DirectorySource::new(path)))
    } else {
        Ok(Box::new(RawDumpSource::new(path)))
    }
}
