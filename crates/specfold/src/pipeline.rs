//! One merge run: filter, normalize, repair, fold, finalize.
//!
//! Nothing is written until the whole fold has succeeded.

use std::path::PathBuf;

use specfold_openapi::{ComponentCategory, Fragment, MergeOutput, finalize};

use crate::config::Config;
use crate::error::Result;

/// Result of a successful run, ready to be written.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Finalized merge result.
    pub merged: MergeOutput,
    /// Fragments that passed the reference filter, unmodified.
    pub fragments: Vec<Fragment>,
    /// Operations that received a tag from path repair.
    pub repaired_operations: usize,
}

impl PipelineOutput {
    /// Number of named entries per component category.
    pub fn component_counts(&self) -> Vec<(ComponentCategory, usize)> {
        self.merged
            .document
            .components
            .iter()
            .map(|(category, entries)| (category, entries.len()))
            .collect()
    }
}

/// Whether `fragment` passes the configured reference filter.
fn keep(config: &Config, fragment: &Fragment) -> bool {
    config
        .reference_filter
        .as_deref()
        .is_none_or(|filter| fragment.reference_link.contains(filter))
}

/// Merge `fragments` in order.
///
/// A fragment without a `paths` object aborts the run.
pub fn run(fragments: Vec<Fragment>, config: &Config) -> Result<PipelineOutput> {
    let (fragments, skipped): (Vec<_>, Vec<_>) =
        fragments.into_iter().partition(|f| keep(config, f));
    for fragment in &skipped {
        tracing::debug!(
            title = %fragment.title,
            reference_link = %fragment.reference_link,
            "skipped by reference filter"
        );
    }

    let normalizer = config.normalizer();
    let repairer = config.repairer();
    let mut merger = config.merger();
    let mut repaired_operations = 0;

    let total = fragments.len();
    for (index, fragment) in fragments.iter().enumerate() {
        tracing::info!(
            "{}/{} {} --> {}",
            index + 1,
            total,
            fragment.title,
            fragment.reference_link
        );

        let mut normalized = normalizer.normalize(fragment)?;
        repaired_operations += repairer.repair_in_place(&mut normalized.paths);
        merger = merger.merge(normalized)?;
    }

    let merged = finalize(merger.build());
    tracing::info!(
        fragments = total,
        paths = merged.document.paths.len(),
        categories = merged.document.components.len(),
        repaired_operations,
        "merged fragments"
    );

    Ok(PipelineOutput {
        merged,
        fragments,
        repaired_operations,
    })
}

/// Write the configured artifacts for a finished run.
///
/// The raw dump is included only when `save_raw_data` is set.
pub fn write_outputs(output: &PipelineOutput, config: &Config) -> Result<Vec<PathBuf>> {
    let raw = config.save_raw_data.then_some(output.fragments.as_slice());
    Ok(config.writer().write(&output.merged, raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use specfold_openapi::SpecError;

    fn fragment(title: &str, reference: &str, paths: serde_json::Value) -> Fragment {
        Fragment::new(title, json!({"info": {"title": title}, "paths": paths}))
            .with_reference_link(reference)
    }

    #[test]
    fn test_reference_filter() {
        let config = Config {
            reference_filter: Some("/apis/rest/".to_string()),
            ..Default::default()
        };
        let output = run(
            vec![
                fragment("Users", "/apis/rest/users", json!({"/v1/users": {}})),
                fragment("Engine", "/apis/json-rpc/qix", json!({"/engine": {}})),
            ],
            &config,
        )
        .unwrap();

        assert_eq!(output.fragments.len(), 1);
        assert!(output.merged.document.paths.contains_key("/v1/users"));
        assert!(!output.merged.document.paths.contains_key("/engine"));
        assert!(output.merged.info("Engine").is_none());
    }

    #[test]
    fn test_missing_paths_aborts_run() {
        let fragments = vec![
            fragment("Users", "", json!({"/v1/users": {}})),
            Fragment::new("Broken", json!({"info": {}})),
        ];

        let err = run(fragments, &Config::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Spec(SpecError::MissingPaths { title }) if title == "Broken"
        ));
    }

    #[test]
    fn test_repair_runs_before_merge() {
        let output = run(
            vec![fragment("Apps", "", json!({"/v1/apps": {"get": {}}}))],
            &Config::default(),
        )
        .unwrap();

        assert_eq!(output.repaired_operations, 1);
        assert_eq!(
            output.merged.document.paths["/v1/apps"]["get"]["tags"],
            json!(["apps"])
        );
    }

    #[test]
    fn test_component_counts() {
        let fragments = vec![Fragment::new(
            "Users",
            json!({
                "paths": {},
                "components": {"schemas": {"A": {}, "B": {}}, "responses": {"C": {}}}
            }),
        )];

        let output = run(fragments, &Config::default()).unwrap();
        assert_eq!(
            output.component_counts(),
            vec![(ComponentCategory::Schemas, 2), (ComponentCategory::Responses, 1)]
        );
    }
}
