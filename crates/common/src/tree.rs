use std::fmt;

use serde::Serialize;

use crate::node::{Node, TITLE_PROPERTY, URI_PATH_SEGMENT_PROPERTY};
use crate::query::TypeFilter;
use crate::repository::{NodeRepository, RepositoryError};

/// Segment the site's start page is published under; rendered empty in URLs
pub const HOME_SEGMENT: &str = "home";

/// One document of a [`DocumentTree`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRow {
    /// `/`-joined URI path segments from the root down to this document
    pub url_path: String,
    pub title: Option<String>,
    pub node_type: String,
    /// Node path relative to the tree's root, empty for the root itself
    pub path: String,
    pub depth: usize,
}

/// Documents below a root in pre-order, down to a maximum depth.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentTree {
    rows: Vec<DocumentRow>,
}

impl DocumentTree {
    /// Collect the documents below `root` as seen from `workspace`.
    ///
    /// The root is row zero at depth 0; children are followed while the
    /// current depth is below `max_depth`, in repository child order.
    pub async fn build<R: NodeRepository>(
        repository: &R,
        workspace: &str,
        root: &Node,
        max_depth: usize,
        filter: &TypeFilter,
    ) -> Result<Self, RepositoryError<R::Error>> {
        let mut rows = Vec::new();
        // (node, depth, url segments of its parent)
        let mut pending: Vec<(Node, usize, Vec<String>)> = vec![(root.clone(), 0, Vec::new())];

        while let Some((node, depth, mut segments)) = pending.pop() {
            segments.push(url_segment(&node));
            rows.push(DocumentRow {
                url_path: segments.join("/"),
                title: node.string_property(TITLE_PROPERTY).map(str::to_string),
                node_type: node.node_type.clone(),
                path: relative_path(&root.path, &node.path),
                depth,
            });

            if depth < max_depth {
                let children = repository.child_nodes(workspace, &node, filter).await?;
                // reversed so the first child is popped first
                for child in children.into_iter().rev() {
                    pending.push((child, depth + 1, segments.clone()));
                }
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[DocumentRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn url_segment(node: &Node) -> String {
    match node.string_property(URI_PATH_SEGMENT_PROPERTY) {
        Some(HOME_SEGMENT) | None => String::new(),
        Some(segment) => segment.to_string(),
    }
}

fn relative_path(root: &str, path: &str) -> String {
    path.strip_prefix(root).unwrap_or(path).to_string()
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &[&str; 4], widths: &[usize; 4]) -> fmt::Result {
    let padded: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}

impl fmt::Display for DocumentTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = ["URL path", "Page Title", "Node Type", "Node Path"];
        let cells: Vec<[&str; 4]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.url_path.as_str(),
                    row.title.as_deref().unwrap_or(""),
                    row.node_type.as_str(),
                    row.path.as_str(),
                ]
            })
            .collect();

        let mut widths = headers.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_row(f, &headers, &widths)?;
        for row in &cells {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}
