//! Fragment and merged-document structures.
//!
//! Spec bodies stay as `serde_json::Value`: the merge never looks inside a
//! schema, operation or parameter beyond the keys it has to route.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::Result;
use crate::error::SpecError;

/// The `swagger` field written into every merged document.
pub const SWAGGER_VERSION: &str = "2.0";

/// Default `info.title` of the merged document.
pub const DEFAULT_TITLE: &str = "Open API specification for Qlik SaaS REST API";

/// Per-fragment `info` objects keyed by fragment title.
pub type InfoIndex = Map<String, Value>;

/// One fetched API-area specification plus its discovery metadata.
///
/// Field names follow the raw dump format (`referenceLink`, `specLink`,
/// `specData`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    /// Area title as shown on the documentation site.
    pub title: String,
    /// Link to the human-readable reference page.
    #[serde(default)]
    pub reference_link: String,
    /// Link the spec document was downloaded from.
    #[serde(default)]
    pub spec_link: String,
    /// The downloaded spec document, unmodified.
    #[serde(default)]
    pub spec_data: Value,
}

impl Fragment {
    /// Create a fragment with empty links.
    pub fn new(title: impl Into<String>, spec_data: Value) -> Self {
        Self {
            title: title.into(),
            reference_link: String::new(),
            spec_link: String::new(),
            spec_data,
        }
    }

    /// Set the reference page link.
    pub fn with_reference_link(mut self, link: impl Into<String>) -> Self {
        self.reference_link = link.into();
        self
    }

    /// Set the spec download link.
    pub fn with_spec_link(mut self, link: impl Into<String>) -> Self {
        self.spec_link = link.into();
        self
    }
}

/// Recognized component categories, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentCategory {
    Schemas,
    Errors,
    RequestBodies,
    Responses,
    Parameters,
    Headers,
    Examples,
}

impl ComponentCategory {
    /// Every recognized category.
    pub const ALL: [ComponentCategory; 7] = [
        ComponentCategory::Schemas,
        ComponentCategory::Errors,
        ComponentCategory::RequestBodies,
        ComponentCategory::Responses,
        ComponentCategory::Parameters,
        ComponentCategory::Headers,
        ComponentCategory::Examples,
    ];

    /// Key used for this category under `components`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentCategory::Schemas => "schemas",
            ComponentCategory::Errors => "errors",
            ComponentCategory::RequestBodies => "requestBodies",
            ComponentCategory::Responses => "responses",
            ComponentCategory::Parameters => "parameters",
            ComponentCategory::Headers => "headers",
            ComponentCategory::Examples => "examples",
        }
    }

    /// Look up a category by its `components` key (case-sensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == key)
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named entries grouped by component category.
///
/// Categories keep the order in which they were first inserted; a category
/// is only present once something put it there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentBucket {
    categories: Vec<(ComponentCategory, Map<String, Value>)>,
}

impl ComponentBucket {
    /// Create an empty bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of one category, if present.
    pub fn get(&self, category: ComponentCategory) -> Option<&Map<String, Value>> {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, entries)| entries)
    }

    /// Entries of one category, inserting an empty map at the end if absent.
    pub fn entry(&mut self, category: ComponentCategory) -> &mut Map<String, Value> {
        let index = match self.categories.iter().position(|(c, _)| *c == category) {
            Some(index) => index,
            None => {
                self.categories.push((category, Map::new()));
                self.categories.len() - 1
            }
        };
        &mut self.categories[index].1
    }

    /// Replace a category wholesale, returning the previous entries.
    pub fn insert(
        &mut self,
        category: ComponentCategory,
        entries: Map<String, Value>,
    ) -> Option<Map<String, Value>> {
        match self.categories.iter_mut().find(|(c, _)| *c == category) {
            Some((_, existing)) => Some(std::mem::replace(existing, entries)),
            None => {
                self.categories.push((category, entries));
                None
            }
        }
    }

    /// Remove a category, keeping the order of the rest.
    pub fn remove(&mut self, category: ComponentCategory) -> Option<Map<String, Value>> {
        let index = self.categories.iter().position(|(c, _)| *c == category)?;
        Some(self.categories.remove(index).1)
    }

    /// Whether a category is present.
    pub fn contains(&self, category: ComponentCategory) -> bool {
        self.get(category).is_some()
    }

    /// Number of categories present.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether no category is present.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Present categories with their entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentCategory, &Map<String, Value>)> {
        self.categories.iter().map(|(c, entries)| (*c, entries))
    }

    /// Render as a `components` JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(c, entries)| (c.as_str().to_string(), Value::Object(entries.clone())))
                .collect(),
        )
    }
}

impl IntoIterator for ComponentBucket {
    type Item = (ComponentCategory, Map<String, Value>);
    type IntoIter = std::vec::IntoIter<(ComponentCategory, Map<String, Value>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.into_iter()
    }
}

impl Serialize for ComponentBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(c, entries)| (c.as_str(), entries)))
    }
}

/// A fragment's spec data, classified by upstream format generation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSpec {
    /// `components.{schemas,errors,requestBodies,...}` buckets.
    Modern(ModernSpec),
    /// Flat `definitions` map, possibly alongside a `components` object.
    Legacy(LegacySpec),
}

/// Modern spec shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ModernSpec {
    pub info: Option<Value>,
    pub paths: Map<String, Value>,
    pub components: Map<String, Value>,
}

/// Legacy spec shape.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacySpec {
    pub info: Option<Value>,
    pub paths: Map<String, Value>,
    /// Top-level `definitions`.
    pub definitions: Option<Map<String, Value>>,
    /// The `components` object, empty when absent.
    pub components: Map<String, Value>,
}

impl LegacySpec {
    /// `components.schemas`, if present as an object.
    pub fn schemas(&self) -> Option<&Map<String, Value>> {
        self.components.get("schemas").and_then(Value::as_object)
    }
}

impl RawSpec {
    /// Classify a fragment's spec data.
    ///
    /// A spec is legacy when it carries `definitions` or has no `components`
    /// object. A missing `paths` object is fatal.
    pub fn parse(title: &str, spec: &Value) -> Result<Self> {
        let obj = spec.as_object().ok_or_else(|| SpecError::InvalidSpec {
            title: title.to_string(),
            message: "spec data is not a JSON object".to_string(),
        })?;

        let paths = obj
            .get("paths")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| SpecError::MissingPaths {
                title: title.to_string(),
            })?;
        let info = obj.get("info").cloned();
        let components = obj.get("components").and_then(Value::as_object);
        let definitions = obj.get("definitions").and_then(Value::as_object);

        match (components, definitions) {
            (Some(components), None) => Ok(RawSpec::Modern(ModernSpec {
                info,
                paths,
                components: components.clone(),
            })),
            (components, definitions) => Ok(RawSpec::Legacy(LegacySpec {
                info,
                paths,
                definitions: definitions.cloned(),
                components: components.cloned().unwrap_or_default(),
            })),
        }
    }

    /// Classify a fragment's spec data, using its title for error messages.
    pub fn from_fragment(fragment: &Fragment) -> Result<Self> {
        Self::parse(&fragment.title, &fragment.spec_data)
    }

    /// The spec's `info` object, if any.
    pub fn info(&self) -> Option<&Value> {
        match self {
            RawSpec::Modern(spec) => spec.info.as_ref(),
            RawSpec::Legacy(spec) => spec.info.as_ref(),
        }
    }

    /// The spec's `paths` map.
    pub fn paths(&self) -> &Map<String, Value> {
        match self {
            RawSpec::Modern(spec) => &spec.paths,
            RawSpec::Legacy(spec) => &spec.paths,
        }
    }

    /// Whether this is the legacy shape.
    pub fn is_legacy(&self) -> bool {
        matches!(self, RawSpec::Legacy(_))
    }
}

/// A fragment reduced to canonical shape, ready to fold.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFragment {
    pub title: String,
    pub info: Value,
    pub paths: Map<String, Value>,
    pub components: ComponentBucket,
}

/// Where merged components are placed in the emitted document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentLayout {
    /// `components.<category>` buckets.
    #[default]
    Components,
    /// Swagger 2.0 style: the schema category becomes top-level `definitions`.
    Definitions,
}

/// The accumulated result of folding every fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDocument {
    pub title: String,
    pub paths: Map<String, Value>,
    pub components: ComponentBucket,
    pub layout: DocumentLayout,
}

impl MergedDocument {
    /// An empty document.
    pub fn new(title: impl Into<String>, layout: DocumentLayout) -> Self {
        Self {
            title: title.into(),
            paths: Map::new(),
            components: ComponentBucket::new(),
            layout,
        }
    }

    /// Render the document as JSON.
    ///
    /// With [`DocumentLayout::Definitions`] the schema category is written as
    /// `definitions`; any other categories stay under `components` and that
    /// key is only written when such categories exist.
    pub fn to_value(&self) -> Value {
        let mut doc = Map::new();
        doc.insert(
            "swagger".to_string(),
            Value::String(SWAGGER_VERSION.to_string()),
        );

        let mut info = Map::new();
        info.insert("title".to_string(), Value::String(self.title.clone()));
        doc.insert("info".to_string(), Value::Object(info));

        doc.insert("paths".to_string(), Value::Object(self.paths.clone()));

        match self.layout {
            DocumentLayout::Components => {
                doc.insert("components".to_string(), self.components.to_value());
            }
            DocumentLayout::Definitions => {
                let mut rest = self.components.clone();
                let definitions = rest.remove(ComponentCategory::Schemas).unwrap_or_default();
                doc.insert("definitions".to_string(), Value::Object(definitions));
                if !rest.is_empty() {
                    doc.insert("components".to_string(), rest.to_value());
                }
            }
        }

        Value::Object(doc)
    }
}
