//! Reshape a fragment's component groups into a canonical bucket set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;
use crate::types::{
    ComponentBucket, ComponentCategory, Fragment, LegacySpec, ModernSpec, NormalizedFragment,
    RawSpec,
};

/// Which legacy field supplies the schema category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacySchemaSource {
    /// Top-level `definitions` only.
    Definitions,
    /// `components.schemas` only.
    #[serde(rename = "components")]
    ComponentSchemas,
    /// `definitions` first, then `components.schemas` on top.
    #[default]
    Both,
}

/// Normalization switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub legacy_schemas: LegacySchemaSource,
    /// Write `errors` entries into `schemas` instead of their own category.
    pub fold_errors_into_schemas: bool,
}

/// Converts raw fragments into [`NormalizedFragment`]s.
///
/// Pure: the same input always yields the same output, and absent optional
/// fields only make the output smaller.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Classify and normalize one fragment.
    ///
    /// Fails only when the spec data has no `paths` object or is not an object.
    pub fn normalize(&self, fragment: &Fragment) -> Result<NormalizedFragment> {
        let raw = RawSpec::from_fragment(fragment)?;
        Ok(self.normalize_spec(&fragment.title, &raw))
    }

    /// Normalize an already classified spec.
    pub fn normalize_spec(&self, title: &str, raw: &RawSpec) -> NormalizedFragment {
        let components = match raw {
            RawSpec::Modern(spec) => self.modern_bucket(spec),
            RawSpec::Legacy(spec) => self.legacy_bucket(spec),
        };

        NormalizedFragment {
            title: title.to_string(),
            info: raw
                .info()
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            paths: raw.paths().clone(),
            components,
        }
    }

    fn modern_bucket(&self, spec: &ModernSpec) -> ComponentBucket {
        let mut bucket = ComponentBucket::new();
        self.copy_categories(&spec.components, ComponentCategory::ALL, &mut bucket);
        bucket
    }

    fn legacy_bucket(&self, spec: &LegacySpec) -> ComponentBucket {
        let schemas = match self.options.legacy_schemas {
            LegacySchemaSource::Definitions => spec.definitions.clone(),
            LegacySchemaSource::ComponentSchemas => spec.schemas().cloned(),
            LegacySchemaSource::Both => match (&spec.definitions, spec.schemas()) {
                (None, None) => None,
                (definitions, schemas) => {
                    let mut merged = definitions.clone().unwrap_or_default();
                    if let Some(schemas) = schemas {
                        merged.extend(schemas.clone());
                    }
                    Some(merged)
                }
            },
        };

        let mut bucket = ComponentBucket::new();
        if let Some(schemas) = schemas {
            bucket.insert(ComponentCategory::Schemas, schemas);
        }
        // Schemas were resolved above; the rest of `components` copies as-is.
        let rest = ComponentCategory::ALL
            .into_iter()
            .filter(|category| *category != ComponentCategory::Schemas);
        self.copy_categories(&spec.components, rest, &mut bucket);
        bucket
    }

    fn copy_categories(
        &self,
        components: &Map<String, Value>,
        categories: impl IntoIterator<Item = ComponentCategory>,
        bucket: &mut ComponentBucket,
    ) {
        for category in categories {
            // Non-object categories are treated as absent.
            let Some(entries) = components.get(category.as_str()).and_then(Value::as_object)
            else {
                continue;
            };

            let target = match category {
                ComponentCategory::Errors if self.options.fold_errors_into_schemas => {
                    ComponentCategory::Schemas
                }
                other => other,
            };
            bucket.entry(target).extend(entries.clone());
        }
    }
}
