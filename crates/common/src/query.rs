//! Composable node queries.
//!
//! A [`NodeQuery`] accumulates conjunctive [`Constraint`]s and hands out
//! immutable descriptors for the three things that can be done with them:
//! list ([`ListQuery`]), count ([`CountQuery`]) and bulk delete
//! ([`DeleteQuery`]). Producing one descriptor never changes what another
//! one sees, so counting and listing can be interleaved freely.
//!
//! Every query is scoped to a workspace. An absent or empty workspace means
//! [`LIVE_WORKSPACE`], never "all workspaces".

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::like;
use crate::node::{fold_case, Node};
use crate::repository::{NodeRepository, RepositoryError};
use crate::workspace::LIVE_WORKSPACE;

/// A set of node type names.
///
/// Empty means "no restriction" wherever a filter is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter(BTreeSet<String>);

impl TypeFilter {
    /// Split a comma separated list, ignoring blanks
    pub fn parse(csv: &str) -> Self {
        csv.split(',').collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the filter is empty or lists `node_type`
    pub fn matches(&self, node_type: &str) -> bool {
        self.0.is_empty() || self.0.contains(node_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for TypeFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }
}

impl From<&str> for TypeFilter {
    fn from(csv: &str) -> Self {
        Self::parse(csv)
    }
}

impl From<&String> for TypeFilter {
    fn from(csv: &String) -> Self {
        Self::parse(csv)
    }
}

impl From<Vec<String>> for TypeFilter {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<&[&str]> for TypeFilter {
    fn from(names: &[&str]) -> Self {
        names.iter().collect()
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().cloned().collect::<Vec<_>>().join(","))
    }
}

/// A single predicate over node attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// workspace is one of the set
    Workspaces(BTreeSet<String>),
    /// node type is one of the set
    NodeTypes(TypeFilter),
    /// path starts with the prefix, without a separator boundary check
    PathPrefix(String),
    /// lower-cased serialized properties contain the needle
    PropertiesContain(String),
    /// identifier starts with the prefix
    IdentifierPrefix(String),
}

impl Constraint {
    /// `LIKE` pattern of the pattern-based constraints
    pub fn like_pattern(&self) -> Option<String> {
        match self {
            Constraint::PathPrefix(prefix) | Constraint::IdentifierPrefix(prefix) => {
                Some(like::prefix_pattern(prefix))
            }
            Constraint::PropertiesContain(needle) => Some(like::contains_pattern(needle)),
            Constraint::Workspaces(_) | Constraint::NodeTypes(_) => None,
        }
    }

    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Constraint::Workspaces(workspaces) => workspaces.contains(&node.workspace),
            Constraint::NodeTypes(types) => types.matches(&node.node_type),
            Constraint::PathPrefix(_) => self.matches_pattern(&node.path),
            Constraint::PropertiesContain(_) => self.matches_pattern(&node.search_text()),
            Constraint::IdentifierPrefix(_) => self.matches_pattern(&node.identifier),
        }
    }

    fn matches_pattern(&self, text: &str) -> bool {
        self.like_pattern()
            .is_some_and(|pattern| like::matches(&pattern, text))
    }
}

/// Conjunction of constraints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet(Vec<Constraint>);

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.0.push(constraint);
    }

    /// Replace the constraint of the same kind in place, or append it.
    /// Used for the constraints where the last write wins.
    fn replace(&mut self, constraint: Constraint) {
        let kind = std::mem::discriminant(&constraint);
        match self
            .0
            .iter_mut()
            .find(|existing| std::mem::discriminant(&**existing) == kind)
        {
            Some(existing) => *existing = constraint,
            None => self.0.push(constraint),
        }
    }

    /// Workspaces this set is scoped to
    pub fn workspaces(&self) -> BTreeSet<String> {
        self.0
            .iter()
            .filter_map(|constraint| match constraint {
                Constraint::Workspaces(workspaces) => Some(workspaces.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn matches(&self, node: &Node) -> bool {
        self.0.iter().all(|constraint| constraint.matches(node))
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseOrderError {
    #[error("unknown order field: {0}")]
    Field(String),
    #[error("unknown order direction: {0} (expected asc or desc)")]
    Direction(String),
}

/// Node attributes a listing can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderField {
    #[default]
    Path,
    Identifier,
    NodeType,
    Workspace,
    SortingIndex,
}

impl OrderField {
    pub fn column(&self) -> &'static str {
        match self {
            OrderField::Path => "path",
            OrderField::Identifier => "identifier",
            OrderField::NodeType => "node_type",
            OrderField::Workspace => "workspace",
            OrderField::SortingIndex => "sorting_index",
        }
    }

    fn compare(&self, a: &Node, b: &Node) -> Ordering {
        match self {
            OrderField::Path => a.path.cmp(&b.path),
            OrderField::Identifier => a.identifier.cmp(&b.identifier),
            OrderField::NodeType => a.node_type.cmp(&b.node_type),
            OrderField::Workspace => a.workspace.cmp(&b.workspace),
            OrderField::SortingIndex => a.sorting_index.cmp(&b.sorting_index),
        }
    }
}

impl FromStr for OrderField {
    type Err = ParseOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "path" => Ok(OrderField::Path),
            "identifier" | "id" => Ok(OrderField::Identifier),
            "node_type" | "nodetype" | "type" => Ok(OrderField::NodeType),
            "workspace" => Ok(OrderField::Workspace),
            "sorting_index" | "index" => Ok(OrderField::SortingIndex),
            other => Err(ParseOrderError::Field(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl FromStr for OrderDirection {
    type Err = ParseOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(OrderDirection::Asc),
            "desc" => Ok(OrderDirection::Desc),
            other => Err(ParseOrderError::Direction(other.to_string())),
        }
    }
}

/// Ordering of a listing. Ties are always broken by path, then identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderBy {
    pub field: OrderField,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub fn new(field: OrderField, direction: OrderDirection) -> Self {
        Self { field, direction }
    }

    pub fn compare(&self, a: &Node, b: &Node) -> Ordering {
        let primary = match self.direction {
            OrderDirection::Asc => self.field.compare(a, b),
            OrderDirection::Desc => self.field.compare(b, a),
        };
        primary
            .then_with(|| a.path.cmp(&b.path))
            .then_with(|| a.identifier.cmp(&b.identifier))
    }
}

/// Lazily executed listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub constraints: ConstraintSet,
    pub order_by: OrderBy,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub async fn execute<R: NodeRepository>(
        &self,
        repository: &R,
    ) -> Result<Vec<Node>, RepositoryError<R::Error>> {
        repository.query(self).await
    }
}

/// Lazily executed count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    pub constraints: ConstraintSet,
}

impl CountQuery {
    pub async fn execute<R: NodeRepository>(
        &self,
        repository: &R,
    ) -> Result<u64, RepositoryError<R::Error>> {
        repository.count(&self.constraints).await
    }
}

/// Lazily executed bulk delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteQuery {
    pub constraints: ConstraintSet,
}

impl DeleteQuery {
    pub async fn execute<R: NodeRepository>(
        &self,
        repository: &R,
    ) -> Result<u64, RepositoryError<R::Error>> {
        repository.delete_matching(&self.constraints).await
    }
}

/// Initial constraints of a [`NodeQuery`]
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub node_types: Option<TypeFilter>,
    pub path: Option<String>,
    pub search_term: Option<String>,
    /// `None` or empty selects [`LIVE_WORKSPACE`]
    pub workspace: Option<String>,
}

impl QueryOptions {
    pub fn node_types(mut self, types: impl Into<TypeFilter>) -> Self {
        self.node_types = Some(types.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }
}

/// Builder for node queries, see the module docs.
#[derive(Debug, Clone)]
pub struct NodeQuery {
    constraints: ConstraintSet,
    order_by: Option<OrderBy>,
    limit: Option<u32>,
}

impl Default for NodeQuery {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}

impl NodeQuery {
    /// Build a query and apply the initial constraints in the order
    /// workspace, path, node types, search term.
    pub fn new(options: QueryOptions) -> Self {
        let workspace = options
            .workspace
            .filter(|workspace| !workspace.is_empty())
            .unwrap_or_else(|| LIVE_WORKSPACE.to_string());

        let mut query = Self {
            constraints: ConstraintSet::new(),
            order_by: None,
            limit: None,
        };
        query.set_workspaces([workspace]);

        if let Some(path) = options.path {
            query.add_path_constraint(&path);
        }
        if let Some(types) = options.node_types {
            query.add_type_constraint(types);
        }
        if let Some(term) = options.search_term {
            query.add_search_term_constraint(&term);
        }
        query
    }

    /// Scope the query to these workspaces, replacing the current scope.
    /// An empty list keeps the current scope.
    pub fn set_workspaces<I, S>(&mut self, workspaces: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let workspaces: BTreeSet<String> = workspaces
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.is_empty())
            .collect();
        if !workspaces.is_empty() {
            tracing::debug!(?workspaces, "scoping node query");
            self.constraints.replace(Constraint::Workspaces(workspaces));
        }
        self
    }

    /// Restrict node types. A later call replaces an earlier one; a list
    /// without any valid name leaves the query unchanged.
    pub fn add_type_constraint(&mut self, types: impl Into<TypeFilter>) -> &mut Self {
        let types = types.into();
        if types.is_empty() {
            tracing::debug!("ignoring empty node type constraint");
            return self;
        }
        tracing::debug!(%types, "adding node type constraint");
        self.constraints.replace(Constraint::NodeTypes(types));
        self
    }

    /// Only nodes whose path starts with `path`. There is no separator
    /// boundary: `/a/b` also selects `/a/bc`.
    pub fn add_path_constraint(&mut self, path: &str) -> &mut Self {
        if path.is_empty() {
            return self;
        }
        tracing::debug!(path, "adding path constraint");
        self.constraints.push(Constraint::PathPrefix(path.to_string()));
        self
    }

    /// Only nodes whose serialized properties contain `term`, ignoring case.
    pub fn add_search_term_constraint(&mut self, term: &str) -> &mut Self {
        if term.is_empty() {
            return self;
        }
        let needle = search_needle(term);
        tracing::debug!(term, needle = %needle, "adding search term constraint");
        self.constraints.push(Constraint::PropertiesContain(needle));
        self
    }

    /// Only nodes whose identifier starts with `identifier`
    pub fn add_identifier_constraint(&mut self, identifier: &str) -> &mut Self {
        if identifier.is_empty() {
            return self;
        }
        tracing::debug!(identifier, "adding identifier constraint");
        self.constraints.push(Constraint::IdentifierPrefix(identifier.to_string()));
        self
    }

    pub fn set_order_by(&mut self, field: OrderField, direction: OrderDirection) -> &mut Self {
        self.order_by = Some(OrderBy::new(field, direction));
        self
    }

    pub fn set_limit(&mut self, limit: Option<u32>) -> &mut Self {
        self.limit = limit.filter(|limit| *limit > 0);
        self
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Listing descriptor, ordered by path ascending unless overridden
    pub fn query(&self) -> ListQuery {
        ListQuery {
            constraints: self.constraints.clone(),
            order_by: self.order_by.unwrap_or_default(),
            limit: self.limit,
        }
    }

    pub fn count_query(&self) -> CountQuery {
        CountQuery {
            constraints: self.constraints.clone(),
        }
    }

    pub fn delete_query(&self) -> DeleteQuery {
        DeleteQuery {
            constraints: self.constraints.clone(),
        }
    }

    pub async fn fetch<R: NodeRepository>(
        &self,
        repository: &R,
    ) -> Result<Vec<Node>, RepositoryError<R::Error>> {
        self.query().execute(repository).await
    }

    pub async fn count<R: NodeRepository>(
        &self,
        repository: &R,
    ) -> Result<u64, RepositoryError<R::Error>> {
        self.count_query().execute(repository).await
    }

    /// Delete every matching record in one repository call and return how
    /// many were removed.
    pub async fn delete_all<R: NodeRepository>(
        &self,
        repository: &R,
    ) -> Result<u64, RepositoryError<R::Error>> {
        let deleted = self.delete_query().execute(repository).await?;
        tracing::info!(deleted, "deleted matching nodes");
        Ok(deleted)
    }
}

/// Turn a user supplied search term into the text searched for in the
/// case-folded serialized properties: fold it, then apply JSON string
/// escaping so quotes and backslashes line up with the stored JSON.
pub fn search_needle(term: &str) -> String {
    let encoded = Value::String(fold_case(term)).to_string();
    encoded
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(&encoded)
        .to_string()
}
