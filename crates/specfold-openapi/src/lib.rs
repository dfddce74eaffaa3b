//! Fragment normalization and merge engine for specfold.
//!
//! Takes independently fetched OpenAPI fragments, reshapes each into a
//! canonical component bucket, repairs known path defects, folds them into
//! one document and writes it out with deterministic path ordering.
//!
//! # Example
//!
//! ```ignore
//! use specfold_openapi::{ArtifactWriter, Normalizer, PathRepairer, SpecMerger, finalize};
//!
//! let normalizer = Normalizer::default();
//! let repairer = PathRepairer::default();
//!
//! let mut merger = SpecMerger::new();
//! for fragment in &fragments {
//!     let mut normalized = normalizer.normalize(fragment)?;
//!     repairer.repair_in_place(&mut normalized.paths);
//!     merger = merger.merge(normalized)?;
//! }
//!
//! let output = finalize(merger.build());
//! ArtifactWriter::new("data").write(&output, None)?;
//! ```

mod builder;
mod error;
mod finalize;
mod normalize;
mod repair;
mod types;

pub use builder::{MergeOutput, PathCollisionPolicy, SpecMerger};
pub use error::SpecError;
pub use finalize::{Artifact, ArtifactNames, ArtifactWriter, finalize, sort_paths, to_pretty_json};
pub use normalize::{LegacySchemaSource, NormalizeOptions, Normalizer};
pub use repair::{HTTP_VERBS, PathRepairer, TagRule};
pub use types::*;

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, SpecError>;
