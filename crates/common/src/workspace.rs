use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::node::Node;

/// The published workspace, and the default scope of every query.
pub const LIVE_WORKSPACE: &str = "live";

/// Personal workspaces are named `user-<name>`
pub const USER_WORKSPACE_PREFIX: &str = "user-";

/// A named branch of the content tree.
///
/// Reads in a workspace fall through to its base workspace for nodes it has
/// no record of; `live` has no base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    #[serde(default)]
    pub base_workspace: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Workspace {
    pub fn live() -> Self {
        Self {
            name: LIVE_WORKSPACE.to_string(),
            base_workspace: None,
            title: Some("Live".to_string()),
        }
    }

    pub fn new(name: impl Into<String>, base_workspace: Option<String>) -> Self {
        Self {
            name: name.into(),
            base_workspace,
            title: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.name == LIVE_WORKSPACE
    }
}

/// Workspace name for a user, or `live` when there is none.
pub fn user_workspace_name(user: Option<&str>) -> String {
    match user {
        Some(user) if !user.is_empty() => format!("{}{}", USER_WORKSPACE_PREFIX, user),
        _ => LIVE_WORKSPACE.to_string(),
    }
}

/// Collapse records gathered from a workspace chain into what the first
/// workspace of the chain sees.
///
/// `chain` is ordered from the workspace being read to its last base. For
/// every identifier the record of the earliest workspace in the chain wins;
/// winners marked as removed are hidden. The relative order of the winners is
/// preserved.
pub fn overlay(chain: &[String], records: Vec<Node>) -> Vec<Node> {
    let rank = |node: &Node| {
        chain
            .iter()
            .position(|name| name == &node.workspace)
            .unwrap_or(usize::MAX)
    };

    let mut ranked: Vec<(usize, usize, Node)> = records
        .into_iter()
        .enumerate()
        .map(|(position, node)| (rank(&node), position, node))
        .filter(|(rank, _, _)| *rank != usize::MAX)
        .collect();
    ranked.sort_by_key(|(rank, _, _)| *rank);

    let mut seen = HashSet::new();
    let mut winners: Vec<(usize, Node)> = ranked
        .into_iter()
        .filter(|(_, _, node)| seen.insert(node.identifier.clone()))
        .filter(|(_, _, node)| !node.removed)
        .map(|(_, position, node)| (position, node))
        .collect();
    winners.sort_by_key(|(position, _)| *position);

    winners.into_iter().map(|(_, node)| node).collect()
}

/// Order siblings the way the tree presents them
pub fn sort_siblings(nodes: &mut [Node]) {
    nodes.sort_by(|a, b| {
        a.sorting_index
            .cmp(&b.sorting_index)
            .then_with(|| a.path.cmp(&b.path))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<String> {
        vec!["user-admin".to_string(), LIVE_WORKSPACE.to_string()]
    }

    #[test]
    fn test_user_workspace_name() {
        assert_eq!(user_workspace_name(Some("admin")), "user-admin");
        assert_eq!(user_workspace_name(Some("")), "live");
        assert_eq!(user_workspace_name(None), "live");
    }

    #[test]
    fn test_overlay_prefers_first_workspace() {
        let live = Node::new("a", "/sites/a", "Page", "live").with_property("title", "old");
        let draft = Node::new("a", "/sites/a", "Page", "user-admin").with_property("title", "new");
        let other = Node::new("b", "/sites/b", "Page", "live");

        let seen = overlay(&chain(), vec![live, other.clone(), draft.clone()]);
        assert_eq!(seen, vec![other, draft]);
    }

    #[test]
    fn test_overlay_hides_removed() {
        let live = Node::new("a", "/sites/a", "Page", "live");
        let mut marker = Node::new("a", "/sites/a", "Page", "user-admin");
        marker.removed = true;

        assert!(overlay(&chain(), vec![live.clone(), marker]).is_empty());
        assert_eq!(overlay(&[LIVE_WORKSPACE.to_string()], vec![live.clone()]), vec![live]);
    }

    #[test]
    fn test_overlay_ignores_foreign_workspaces() {
        let foreign = Node::new("a", "/sites/a", "Page", "user-other");
        assert!(overlay(&chain(), vec![foreign]).is_empty());
    }

    #[test]
    fn test_sort_siblings() {
        let mut nodes = vec![
            Node::new("c", "/s/c", "Page", "live").with_sorting_index(2),
            Node::new("b", "/s/b", "Page", "live").with_sorting_index(1),
            Node::new("a", "/s/a", "Page", "live").with_sorting_index(2),
        ];
        sort_siblings(&mut nodes);
        let paths: Vec<_> = nodes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["/s/b", "/s/a", "/s/c"]);
    }
}
