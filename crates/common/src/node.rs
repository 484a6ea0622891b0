use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::workspace::LIVE_WORKSPACE;

/// Path of the conceptual root of every content tree.
pub const ROOT_PATH: &str = "/";

/// Property holding the URL segment of a document node.
pub const URI_PATH_SEGMENT_PROPERTY: &str = "uriPathSegment";

/// Property holding the human readable title of a document node.
pub const TITLE_PROPERTY: &str = "title";

/// A single node record within one workspace of the content tree.
///
/// The record is a plain value: reading children, removing or publishing
/// nodes goes through a [`NodeRepository`](crate::repository::NodeRepository).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Opaque key, stable across workspaces for the same logical node
    pub identifier: String,
    /// `/`-delimited position in the tree, unique per workspace
    pub path: String,
    /// Schema name, e.g. `Neos.Neos:Document`
    pub node_type: String,
    /// Workspace the record belongs to
    #[serde(default = "default_workspace")]
    pub workspace: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Position among its siblings, lower comes first
    #[serde(default)]
    pub sorting_index: i64,
    /// Marks a pending removal recorded in a non-live workspace
    #[serde(default)]
    pub removed: bool,
}

fn default_workspace() -> String {
    LIVE_WORKSPACE.to_string()
}

impl Node {
    pub fn new(
        identifier: impl Into<String>,
        path: impl Into<String>,
        node_type: impl Into<String>,
        workspace: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            path: path.into(),
            node_type: node_type.into(),
            workspace: workspace.into(),
            properties: Map::new(),
            sorting_index: 0,
            removed: false,
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_sorting_index(mut self, sorting_index: i64) -> Self {
        self.sorting_index = sorting_index;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// String value of a property, `None` for missing or non-string values
    pub fn string_property(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Value::as_str)
    }

    /// Last path segment, empty for the root
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    pub fn parent_path(&self) -> Option<String> {
        parent_path(&self.path)
    }

    /// Properties as stored JSON text
    pub fn serialized_properties(&self) -> String {
        Value::Object(self.properties.clone()).to_string()
    }

    /// Case-folded serialized properties, the text free-text search runs against
    pub fn search_text(&self) -> String {
        fold_case(&self.serialized_properties())
    }

    /// Whether this node sits strictly below `ancestor` in the tree
    pub fn is_descendant_of(&self, ancestor: &str) -> bool {
        if ancestor == ROOT_PATH {
            return self.path != ROOT_PATH;
        }
        self.path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.path, self.node_type)
    }
}

/// Unicode default case folding, applied to both sides of a free-text search.
///
/// Unlike `to_lowercase` it does not depend on context (a final `Σ` and a
/// medial one both become `σ`) and it expands `ß` to `ss`.
pub fn fold_case(text: &str) -> String {
    caseless::default_case_fold_str(text)
}

/// Parent of a `/`-delimited path. `/a` has the root as parent, the root has none.
pub fn parent_path(path: &str) -> Option<String> {
    if path == ROOT_PATH || path.is_empty() {
        return None;
    }
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => Some(ROOT_PATH.to_string()),
        Some(idx) => Some(trimmed[..idx].to_string()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/sites/demo/news"), Some("/sites/demo".to_string()));
        assert_eq!(parent_path("/sites"), Some("/".to_string()));
        assert_eq!(parent_path("/"), None);
        assert_eq!(parent_path("relative"), None);
    }

    #[test]
    fn test_name_and_descendants() {
        let node = Node::new("n1", "/sites/demo/news", "Neos.Neos:Document", "live");
        assert_eq!(node.name(), "news");
        assert!(node.is_descendant_of("/sites/demo"));
        assert!(node.is_descendant_of("/"));
        assert!(!node.is_descendant_of("/sites/dem"));
        assert!(!node.is_descendant_of("/sites/demo/news"));
    }

    #[test]
    fn test_search_text_is_case_folded_json() {
        let node = Node::new("n1", "/sites/a", "Page", "live").with_property("city", "MÜNCHEN");
        assert_eq!(node.serialized_properties(), r#"{"city":"MÜNCHEN"}"#);
        assert_eq!(node.search_text(), r#"{"city":"münchen"}"#);
    }

    #[test]
    fn test_deserialize_defaults() {
        let node: Node = serde_json::from_str(
            r#"{"identifier": "abc", "path": "/sites", "node_type": "Neos.Neos:Sites"}"#,
        )
        .unwrap();
        assert_eq!(node.workspace, LIVE_WORKSPACE);
        assert!(node.properties.is_empty());
        assert_eq!(node.sorting_index, 0);
        assert!(!node.removed);
    }
}
