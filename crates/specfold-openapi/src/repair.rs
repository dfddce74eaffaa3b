//! Targeted repairs of known upstream path defects.
//!
//! The upstream source omits operation tags for whole resource families,
//! which breaks tooling that groups operations by tag. Each [`TagRule`]
//! names one such family by path prefix and the tag to give its untagged
//! operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys of a path item that hold operations.
pub const HTTP_VERBS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Tag untagged operations under one path family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    /// Path family prefix, e.g. `/v1/apps`.
    pub prefix: String,
    /// Tag assigned to untagged operations.
    pub tag: String,
}

impl TagRule {
    /// Create a rule.
    pub fn new(prefix: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            tag: tag.into(),
        }
    }

    /// Whether `path` belongs to this rule's family.
    ///
    /// The path must equal the prefix or continue it at a `/` boundary, so
    /// `/v1/apps` covers `/v1/apps/{appId}` but not `/v1/appsettings`.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => {
                rest.is_empty() || rest.starts_with('/') || self.prefix.ends_with('/')
            }
            None => false,
        }
    }
}

/// Applies [`TagRule`]s to a fragment's paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRepairer {
    rules: Vec<TagRule>,
}

impl Default for PathRepairer {
    /// The one family known to ship without tags.
    fn default() -> Self {
        Self::new(vec![TagRule::new("/v1/apps", "apps")])
    }
}

impl PathRepairer {
    /// Create a repairer; rules are tried in order and the first match wins.
    pub fn new(rules: Vec<TagRule>) -> Self {
        Self { rules }
    }

    /// A repairer that leaves every path untouched.
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    /// Rules in effect.
    pub fn rules(&self) -> &[TagRule] {
        &self.rules
    }

    /// Return a repaired copy of `paths`.
    pub fn repair(&self, paths: &Map<String, Value>) -> Map<String, Value> {
        let mut repaired = paths.clone();
        self.repair_in_place(&mut repaired);
        repaired
    }

    /// Repair `paths` in place, returning the number of operations tagged.
    pub fn repair_in_place(&self, paths: &mut Map<String, Value>) -> usize {
        let mut tagged = 0;
        for (path, item) in paths.iter_mut() {
            let Some(rule) = self.rules.iter().find(|rule| rule.matches(path)) else {
                continue;
            };
            let Some(item) = item.as_object_mut() else {
                continue;
            };

            for verb in HTTP_VERBS {
                let Some(operation) = item.get_mut(verb).and_then(Value::as_object_mut) else {
                    continue;
                };
                if !operation.contains_key("tags") {
                    operation.insert(
                        "tags".to_string(),
                        Value::Array(vec![Value::String(rule.tag.clone())]),
                    );
                    tagged += 1;
                }
            }
        }
        tagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_untagged_operation_gets_family_tag() {
        let input = paths(json!({
            "/v1/apps": {"get": {"summary": "List apps"}}
        }));

        let repaired = PathRepairer::default().repair(&input);
        assert_eq!(repaired["/v1/apps"]["get"]["tags"], json!(["apps"]));
        assert_eq!(repaired["/v1/apps"]["get"]["summary"], "List apps");
    }

    #[test]
    fn test_existing_tags_are_left_alone() {
        let input = paths(json!({
            "/v1/apps": {"get": {"tags": ["custom"]}}
        }));

        let repaired = PathRepairer::default().repair(&input);
        assert_eq!(repaired, input);
    }

    #[test]
    fn test_empty_tags_count_as_present() {
        let input = paths(json!({
            "/v1/apps": {"get": {"tags": []}}
        }));

        assert_eq!(PathRepairer::default().repair(&input), input);
    }

    #[test]
    fn test_every_verb_and_sub_path_is_repaired() {
        let mut input = paths(json!({
            "/v1/apps/{appId}": {
                "parameters": [{"name": "appId", "in": "path"}],
                "get": {},
                "put": {"tags": ["apps-admin"]},
                "delete": {}
            }
        }));

        let tagged = PathRepairer::default().repair_in_place(&mut input);
        assert_eq!(tagged, 2);
        let item = &input["/v1/apps/{appId}"];
        assert_eq!(item["get"]["tags"], json!(["apps"]));
        assert_eq!(item["put"]["tags"], json!(["apps-admin"]));
        assert_eq!(item["delete"]["tags"], json!(["apps"]));
        assert!(item["parameters"].is_array());
    }

    #[test]
    fn test_other_paths_pass_through() {
        let input = paths(json!({
            "/v1/users": {"get": {}},
            "/v1/appsettings": {"get": {}}
        }));

        assert_eq!(PathRepairer::default().repair(&input), input);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let repairer = PathRepairer::new(vec![
            TagRule::new("/v1/apps/{appId}/media", "media"),
            TagRule::new("/v1/apps", "apps"),
            TagRule::new("/v1/reloads", "reloads"),
        ]);
        let input = paths(json!({
            "/v1/apps/{appId}/media/files": {"get": {}},
            "/v1/apps": {"post": {}},
            "/v1/reloads": {"get": {}}
        }));

        let repaired = repairer.repair(&input);
        assert_eq!(
            repaired["/v1/apps/{appId}/media/files"]["get"]["tags"],
            json!(["media"])
        );
        assert_eq!(repaired["/v1/apps"]["post"]["tags"], json!(["apps"]));
        assert_eq!(repaired["/v1/reloads"]["get"]["tags"], json!(["reloads"]));
    }

    #[test]
    fn test_no_rules_is_identity() {
        let input = paths(json!({"/v1/apps": {"get": {}}}));
        assert_eq!(PathRepairer::none().repair(&input), input);
    }
}
