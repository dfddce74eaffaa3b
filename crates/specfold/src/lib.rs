//! specfold - merge published API specification fragments into one document.
//!
//! A documentation site publishes one OpenAPI document per API area. specfold
//! takes those fragments, repairs known upstream defects, and folds them into
//! a single specification plus an index of each area's `info` block.
//!
//! # Quick Start
//!
//! ```ignore
//! use specfold::{Config, pipeline, source};
//!
//! let config = Config::discover(None)?;
//! let fragments = source::open("data/SaaS_raw_data.json".as_ref())?.load()?;
//! let output = pipeline::run(fragments, &config)?;
//! pipeline::write_outputs(&output, &config)?;
//! ```
//!
//! # Merge Rules
//!
//! | Part | Collision | Output order |
//! |------|-----------|--------------|
//! | `paths` | last fragment wins (or reject) | sorted by path |
//! | `components.<category>` | union; last fragment wins per name | fold order |
//! | info index | last fragment wins per title | fold order |
//!
//! # Artifacts
//!
//! Written to `output_dir` with 4-space indentation:
//! - `SaaS_infos.json` - `info` object per fragment title
//! - `SaaS_Swagger_Data.json` - the merged document, `swagger: "2.0"`
//! - `SaaS_raw_data.json` - the input fragments, only with `save_raw_data`

pub mod config;
pub mod error;
pub mod pipeline;
pub mod source;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{PipelineOutput, run, write_outputs};
pub use source::{DirectorySource, FragmentSource, RawDumpSource};

// Re-export the merge engine
pub use specfold_openapi::*;

// Re-export serde_json for callers building fragments by hand
pub use serde_json;
