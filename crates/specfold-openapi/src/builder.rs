//! Merge engine: folds normalized fragments into one document.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use crate::error::SpecError;
use crate::types::{DEFAULT_TITLE, DocumentLayout, InfoIndex, MergedDocument, NormalizedFragment};

/// What to do when two fragments define the same path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathCollisionPolicy {
    /// The later fragment's path item replaces the earlier one.
    #[default]
    LastWriteWins,
    /// Abort the merge with [`SpecError::PathConflict`].
    Reject,
}

/// Accumulator for folding fragments in discovery order.
///
/// # Example
///
/// ```ignore
/// use specfold_openapi::{Normalizer, SpecMerger};
///
/// let normalizer = Normalizer::default();
/// let output = SpecMerger::new()
///     .title("Merged API")
///     .merge(normalizer.normalize(&users)?)?
///     .merge(normalizer.normalize(&apps)?)?
///     .build();
/// ```
///
/// # Conflict Resolution
///
/// - **Paths**: Last write wins for the whole path item, unless
///   [`PathCollisionPolicy::Reject`] is set.
/// - **Components**: Categories are unioned; within a category, a name
///   defined twice keeps the later body.
/// - **Info**: One entry per fragment title; a repeated title keeps the later `info`.
#[derive(Debug, Clone)]
pub struct SpecMerger {
    document: MergedDocument,
    infos: InfoIndex,
    path_policy: PathCollisionPolicy,
    /// Fragment title that last wrote each path.
    path_owners: HashMap<String, String>,
}

/// What a finished merge produces.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutput {
    pub document: MergedDocument,
    pub infos: InfoIndex,
}

impl Default for SpecMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecMerger {
    /// Create an empty accumulator titled [`DEFAULT_TITLE`].
    pub fn new() -> Self {
        Self {
            document: MergedDocument::new(DEFAULT_TITLE, DocumentLayout::default()),
            infos: InfoIndex::new(),
            path_policy: PathCollisionPolicy::default(),
            path_owners: HashMap::new(),
        }
    }

    /// Set the merged document title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.document.title = title.into();
        self
    }

    /// Set where components are emitted.
    pub fn layout(mut self, layout: DocumentLayout) -> Self {
        self.document.layout = layout;
        self
    }

    /// Set the path collision policy.
    pub fn path_collisions(mut self, policy: PathCollisionPolicy) -> Self {
        self.path_policy = policy;
        self
    }

    /// Fold one fragment into the accumulator.
    pub fn merge(mut self, fragment: NormalizedFragment) -> Result<Self> {
        let NormalizedFragment {
            title,
            info,
            paths,
            components,
        } = fragment;

        for (path, item) in paths {
            if let Some(previous) = self.path_owners.get(&path) {
                if self.path_policy == PathCollisionPolicy::Reject {
                    return Err(SpecError::PathConflict {
                        path,
                        first: previous.clone(),
                        second: title,
                    });
                }
                tracing::debug!(
                    path = %path,
                    previous = %previous,
                    fragment = %title,
                    "path overwritten"
                );
            }
            self.path_owners.insert(path.clone(), title.clone());
            self.document.paths.insert(path, item);
        }

        for (category, entries) in components {
            let merged = self.document.components.entry(category);
            for (name, body) in entries {
                if merged.contains_key(&name) {
                    tracing::debug!(%category, name = %name, fragment = %title, "component overwritten");
                }
                merged.insert(name, body);
            }
        }

        if self.infos.contains_key(&title) {
            tracing::debug!(fragment = %title, "duplicate fragment title, info replaced");
        }
        self.infos.insert(title, info);

        Ok(self)
    }

    /// Fold every fragment in iteration order.
    pub fn merge_all<I>(self, fragments: I) -> Result<Self>
    where
        I: IntoIterator<Item = NormalizedFragment>,
    {
        fragments
            .into_iter()
            .try_fold(self, |merger, fragment| merger.merge(fragment))
    }

    /// Number of distinct paths merged so far.
    pub fn path_count(&self) -> usize {
        self.document.paths.len()
    }

    /// Finish the fold.
    pub fn build(self) -> MergeOutput {
        MergeOutput {
            document: self.document,
            infos: self.infos,
        }
    }
}

impl MergeOutput {
    /// `info` recorded for one fragment title.
    pub fn info(&self, title: &str) -> Option<&Value> {
        self.infos.get(title)
    }
}
