//! Document finalizer: canonical ordering and artifact output.
//!
//! Paths are sorted so the committed document does not depend on the order
//! fragments were discovered in. Component categories and their entries keep
//! fold order.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::Result;
use crate::builder::MergeOutput;
use crate::error::SpecError;
use crate::types::{Fragment, MergedDocument};

/// Indentation used by every artifact.
const INDENT: &[u8] = b"    ";

/// Sort a document's paths by key.
pub fn sort_paths(document: &mut MergedDocument) {
    let mut entries: Vec<_> = std::mem::take(&mut document.paths).into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    document.paths = entries.into_iter().collect();
}

/// Bring a merge result into its canonical, serializable order.
pub fn finalize(mut output: MergeOutput) -> MergeOutput {
    sort_paths(&mut output.document);
    output
}

/// Serialize `value` as pretty JSON with 4-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Output file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactNames {
    /// Per-fragment info index.
    pub infos: String,
    /// Merged document.
    pub document: String,
    /// Unnormalized fragment dump.
    pub raw: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            infos: "SaaS_infos.json".to_string(),
            document: "SaaS_Swagger_Data.json".to_string(),
            raw: "SaaS_raw_data.json".to_string(),
        }
    }
}

/// One rendered artifact, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Writes the finalized artifacts into one output directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
    names: ArtifactNames,
}

impl ArtifactWriter {
    /// Create a writer for `dir` with default file names.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            names: ArtifactNames::default(),
        }
    }

    /// Override the file names.
    pub fn with_names(mut self, names: ArtifactNames) -> Self {
        self.names = names;
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render every artifact in memory.
    ///
    /// `raw` is the unnormalized fragment list; it is only rendered when given.
    pub fn render(
        &self,
        output: &MergeOutput,
        raw: Option<&[Fragment]>,
    ) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::with_capacity(3);
        if let Some(raw) = raw {
            artifacts.push(Artifact {
                path: self.dir.join(&self.names.raw),
                bytes: to_pretty_json(raw)?,
            });
        }
        artifacts.push(Artifact {
            path: self.dir.join(&self.names.infos),
            bytes: to_pretty_json(&output.infos)?,
        });
        artifacts.push(Artifact {
            path: self.dir.join(&self.names.document),
            bytes: to_pretty_json(&output.document.to_value())?,
        });
        Ok(artifacts)
    }

    /// Render then write every artifact, returning the written paths.
    ///
    /// Nothing touches the disk until all artifacts rendered. Every artifact
    /// is then staged in a temporary sibling file, and only once all of them
    /// are staged are they renamed into place. Atomicity is per file: a
    /// failing rename can still leave earlier artifacts replaced.
    pub fn write(
        &self,
        output: &MergeOutput,
        raw: Option<&[Fragment]>,
    ) -> Result<Vec<PathBuf>> {
        let artifacts = self.render(output, raw)?;

        fs::create_dir_all(&self.dir).map_err(|e| SpecError::io(&self.dir, e))?;

        let staged = artifacts
            .iter()
            .map(|artifact| stage(&self.dir, artifact))
            .collect::<Result<Vec<_>>>()?;

        let mut written = Vec::with_capacity(artifacts.len());
        for (file, artifact) in staged.into_iter().zip(artifacts) {
            file.persist(&artifact.path)
                .map_err(|e| SpecError::io(&artifact.path, e.error))?;
            tracing::info!(
                path = %artifact.path.display(),
                bytes = artifact.bytes.len(),
                "wrote artifact"
            );
            written.push(artifact.path);
        }
        Ok(written)
    }
}

/// Write `artifact` into a temporary file in `dir`, removed on drop unless persisted.
fn stage(dir: &Path, artifact: &Artifact) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new_in(dir).map_err(|e| SpecError::io(dir, e))?;
    file.write_all(&artifact.bytes)
        .map_err(|e| SpecError::io(file.path(), e))?;
    Ok(file)
}
