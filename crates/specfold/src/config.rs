//! Run configuration, loaded from `specfold.toml`.
//!
//! ```toml
//! title = "Open API specification for Qlik SaaS REST API"
//! output_dir = "data"
//! save_raw_data = false
//! layout = "components"            # or "definitions"
//! legacy_schemas = "both"          # "definitions" | "components" | "both"
//! fold_errors_into_schemas = false
//! path_collisions = "last-write-wins"  # or "reject"
//! reference_filter = "/apis/rest/"
//!
//! [[tag_repair]]
//! prefix = "/v1/apps"
//! tag = "apps"
//!
//! [artifacts]
//! infos = "SaaS_infos.json"
//! document = "SaaS_Swagger_Data.json"
//! raw = "SaaS_raw_data.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use specfold_openapi::{
    ArtifactNames, ArtifactWriter, DEFAULT_TITLE, DocumentLayout, LegacySchemaSource,
    NormalizeOptions, Normalizer, PathCollisionPolicy, PathRepairer, SpecMerger, TagRule,
};

use crate::error::{Error, Result};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "specfold.toml";

/// Everything a run can be configured with. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub title: String,
    pub output_dir: PathBuf,
    pub save_raw_data: bool,
    pub layout: DocumentLayout,
    pub legacy_schemas: LegacySchemaSource,
    pub fold_errors_into_schemas: bool,
    pub path_collisions: PathCollisionPolicy,
    /// Keep only fragments whose `referenceLink` contains this.
    pub reference_filter: Option<String>,
    pub tag_repair: Vec<TagRule>,
    pub artifacts: ArtifactNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            output_dir: PathBuf::from("data"),
            save_raw_data: false,
            layout: DocumentLayout::default(),
            legacy_schemas: LegacySchemaSource::default(),
            fold_errors_into_schemas: false,
            path_collisions: PathCollisionPolicy::default(),
            reference_filter: None,
            tag_repair: PathRepairer::default().rules().to_vec(),
            artifacts: ArtifactNames::default(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text; `path` is only used in errors.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&text, path)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    tracing::debug!(path = %default.display(), "using config file");
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Normalizer configured from this config.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(NormalizeOptions {
            legacy_schemas: self.legacy_schemas,
            fold_errors_into_schemas: self.fold_errors_into_schemas,
        })
    }

    /// Path repairer configured from this config.
    pub fn repairer(&self) -> PathRepairer {
        PathRepairer::new(self.tag_repair.clone())
    }

    /// Empty merge accumulator configured from this config.
    pub fn merger(&self) -> SpecMerger {
        SpecMerger::new()
            .title(self.title.clone())
            .layout(self.layout)
            .path_collisions(self.path_collisions)
    }

    /// Artifact writer configured from this config.
    pub fn writer(&self) -> ArtifactWriter {
        ArtifactWriter::new(self.output_dir.clone()).with_names(self.artifacts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config> {
        Config::from_toml(text, Path::new("specfold.toml"))
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.output_dir, PathBuf::from("data"));
        assert!(!config.save_raw_data);
        assert_eq!(config.tag_repair, vec![TagRule::new("/v1/apps", "apps")]);
        assert_eq!(config.artifacts.document, "SaaS_Swagger_Data.json");
    }

    #[test]
    fn test_full_file() {
        let config = parse(
            r#"
            title = "Merged"
            output_dir = "out"
            save_raw_data = true
            layout = "definitions"
            legacy_schemas = "components"
            fold_errors_into_schemas = true
            path_collisions = "reject"
            reference_filter = "/apis/rest/"

            [[tag_repair]]
            prefix = "/v1/apps"
            tag = "apps"

            [[tag_repair]]
            prefix = "/v1/reloads"
            tag = "reloads"

            [artifacts]
            document = "merged.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Merged");
        assert_eq!(config.layout, DocumentLayout::Definitions);
        assert_eq!(config.legacy_schemas, LegacySchemaSource::ComponentSchemas);
        assert_eq!(config.path_collisions, PathCollisionPolicy::Reject);
        assert_eq!(config.reference_filter.as_deref(), Some("/apis/rest/"));
        assert_eq!(config.tag_repair.len(), 2);
        assert_eq!(config.artifacts.document, "merged.json");
        // Unset artifact names keep their defaults
        assert_eq!(config.artifacts.infos, "SaaS_infos.json");
        assert!(config.normalizer().options().fold_errors_into_schemas);
        assert_eq!(config.repairer().rules()[1].tag, "reloads");
    }

    #[test]
    fn test_empty_tag_repair_disables_repair() {
        let config = parse("tag_repair = []").unwrap();
        assert!(config.repairer().rules().is_empty());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = parse("titel = \"typo\"").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_bad_enum_value_is_rejected() {
        assert!(parse("path_collisions = \"first-write-wins\"").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/specfold.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
