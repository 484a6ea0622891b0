use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use common::node::{Node, ROOT_PATH};
use common::query::{ConstraintSet, ListQuery, TypeFilter};
use common::repository::{NodeRepository, RepositoryError};
use common::workspace::{overlay, sort_siblings, Workspace};

use crate::database::constraints::{push_in, push_order, push_where};
use crate::database::{types::DProperties, Database};

const NODE_COLUMNS: &str =
    "identifier, path, node_type, workspace, properties, sorting_index, removed";

type Result<T> = std::result::Result<T, RepositoryError<sqlx::Error>>;

#[derive(Debug, sqlx::FromRow)]
struct NodeRow {
    identifier: String,
    path: String,
    node_type: String,
    workspace: String,
    properties: DProperties,
    sorting_index: i64,
    removed: bool,
}

impl From<NodeRow> for Node {
    fn from(row: NodeRow) -> Self {
        Node {
            identifier: row.identifier,
            path: row.path,
            node_type: row.node_type,
            workspace: row.workspace,
            properties: row.properties.into(),
            sorting_index: row.sorting_index,
            removed: row.removed,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WorkspaceRow {
    name: String,
    base_workspace: Option<String>,
    title: Option<String>,
}

impl From<WorkspaceRow> for Workspace {
    fn from(row: WorkspaceRow) -> Self {
        Workspace {
            name: row.name,
            base_workspace: row.base_workspace,
            title: row.title,
        }
    }
}

/// Column a tree read looks a node up by
#[derive(Debug, Clone, Copy)]
enum Lookup {
    Path,
    ParentPath,
}

impl Lookup {
    fn column(&self) -> &'static str {
        match self {
            Lookup::Path => "path",
            Lookup::ParentPath => "parent_path",
        }
    }
}

/// Store `node` as a record of `workspace`
async fn insert_row(
    conn: &mut SqliteConnection,
    node: &Node,
    workspace: &str,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO nodes (
            workspace, identifier, path, parent_path, node_type,
            properties, properties_search, sorting_index, removed
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(workspace)
    .bind(&node.identifier)
    .bind(&node.path)
    .bind(node.parent_path())
    .bind(&node.node_type)
    .bind(DProperties::from(node.properties.clone()))
    .bind(node.search_text())
    .bind(node.sorting_index)
    .bind(node.removed)
    .execute(conn)
    .await?;
    Ok(())
}

/// Records of `chain` whose lookup column equals `value`, as seen from the
/// first workspace of the chain, in insertion order
async fn visible(
    conn: &mut SqliteConnection,
    chain: &[String],
    lookup: Lookup,
    value: &str,
    filter: Option<&TypeFilter>,
) -> std::result::Result<Vec<Node>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM nodes WHERE ", NODE_COLUMNS));
    push_in(&mut builder, "workspace", chain.iter().map(String::as_str));
    builder
        .push(format!(" AND {} = ", lookup.column()))
        .push_bind(value.to_string());
    if let Some(filter) = filter.filter(|filter| !filter.is_empty()) {
        builder.push(" AND ");
        push_in(&mut builder, "node_type", filter.iter());
    }
    builder.push(" ORDER BY id ASC");

    let rows: Vec<NodeRow> = builder.build_query_as().fetch_all(&mut *conn).await?;
    Ok(overlay(chain, rows.into_iter().map(Node::from).collect()))
}

async fn occupied(
    conn: &mut SqliteConnection,
    workspace: &str,
    column: &str,
    value: &str,
) -> std::result::Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM nodes WHERE workspace = ? AND {} = ?",
        column
    ))
    .bind(workspace)
    .bind(value)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

/// Check `node` against what `conn` sees and store it
async fn checked_insert(conn: &mut SqliteConnection, chain: &[String], node: &Node) -> Result<()> {
    if let Some(parent) = node.parent_path().filter(|parent| parent != ROOT_PATH) {
        let parents = visible(conn, chain, Lookup::Path, &parent, None)
            .await
            .map_err(RepositoryError::Provider)?;
        if parents.is_empty() {
            return Err(RepositoryError::MissingParent(node.path.clone()));
        }
    }

    if occupied(conn, &node.workspace, "path", &node.path)
        .await
        .map_err(RepositoryError::Provider)?
    {
        return Err(RepositoryError::PathConflict {
            workspace: node.workspace.clone(),
            path: node.path.clone(),
        });
    }
    if occupied(conn, &node.workspace, "identifier", &node.identifier)
        .await
        .map_err(RepositoryError::Provider)?
    {
        return Err(RepositoryError::IdentifierConflict {
            workspace: node.workspace.clone(),
            identifier: node.identifier.clone(),
        });
    }

    insert_row(conn, node, &node.workspace)
        .await
        .map_err(RepositoryError::Provider)
}

#[async_trait]
impl NodeRepository for Database {
    type Error = sqlx::Error;

    async fn query(&self, query: &ListQuery) -> Result<Vec<Node>> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM nodes", NODE_COLUMNS));
        push_where(&mut builder, &query.constraints);
        push_order(&mut builder, &query.order_by);
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let rows: Vec<NodeRow> = builder
            .build_query_as()
            .fetch_all(&**self)
            .await
            .map_err(RepositoryError::Provider)?;

        Ok(rows.into_iter().map(Node::from).collect())
    }

    async fn count(&self, constraints: &ConstraintSet) -> Result<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM nodes");
        push_where(&mut builder, constraints);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&**self)
            .await
            .map_err(RepositoryError::Provider)?;

        Ok(count as u64)
    }

    async fn delete_matching(&self, constraints: &ConstraintSet) -> Result<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM nodes");
        push_where(&mut builder, constraints);

        let result = builder
            .build()
            .execute(&**self)
            .await
            .map_err(RepositoryError::Provider)?;

        Ok(result.rows_affected())
    }

    async fn node_at_path(&self, workspace: &str, path: &str) -> Result<Option<Node>> {
        let chain = self.workspace_chain(workspace).await?;
        let mut conn = self.acquire().await.map_err(RepositoryError::Provider)?;
        let mut nodes = visible(&mut conn, &chain, Lookup::Path, path, None)
            .await
            .map_err(RepositoryError::Provider)?;
        Ok(nodes.pop())
    }

    async fn child_nodes(
        &self,
        workspace: &str,
        parent: &Node,
        filter: &TypeFilter,
    ) -> Result<Vec<Node>> {
        let chain = self.workspace_chain(workspace).await?;
        let mut conn = self.acquire().await.map_err(RepositoryError::Provider)?;
        let mut children = visible(
            &mut conn,
            &chain,
            Lookup::ParentPath,
            &parent.path,
            Some(filter),
        )
        .await
        .map_err(RepositoryError::Provider)?;
        sort_siblings(&mut children);
        Ok(children)
    }

    async fn insert(&self, node: &Node) -> Result<()> {
        let chain = self.workspace_chain(&node.workspace).await?;
        let mut conn = self.acquire().await.map_err(RepositoryError::Provider)?;
        checked_insert(&mut conn, &chain, node).await
    }

    async fn insert_all(&self, nodes: &[Node]) -> Result<()> {
        // resolved up front: the transaction holds the only connection of
        // an in-memory pool
        let mut chains: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for node in nodes {
            if !chains.contains_key(node.workspace.as_str()) {
                let chain = self.workspace_chain(&node.workspace).await?;
                chains.insert(&node.workspace, chain);
            }
        }

        let mut tx = self.begin().await.map_err(RepositoryError::Provider)?;
        for node in nodes {
            let chain = chains
                .get(node.workspace.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            // dropping the transaction on error rolls the batch back
            checked_insert(&mut tx, chain, node).await?;
        }
        tx.commit().await.map_err(RepositoryError::Provider)?;

        tracing::info!(nodes = nodes.len(), "inserted node batch");
        Ok(())
    }

    async fn remove(&self, workspace: &str, node: &Node) -> Result<()> {
        let target = self
            .workspace(workspace)
            .await?
            .ok_or_else(|| RepositoryError::UnknownWorkspace(workspace.to_string()))?;

        if target.base_workspace.is_none() {
            sqlx::query("DELETE FROM nodes WHERE workspace = ? AND identifier = ?")
                .bind(workspace)
                .bind(&node.identifier)
                .execute(&**self)
                .await
                .map_err(RepositoryError::Provider)?;
            return Ok(());
        }

        let marked =
            sqlx::query("UPDATE nodes SET removed = 1 WHERE workspace = ? AND identifier = ?")
                .bind(workspace)
                .bind(&node.identifier)
                .execute(&**self)
                .await
                .map_err(RepositoryError::Provider)?;

        if marked.rows_affected() == 0 {
            let mut marker = node.clone();
            marker.removed = true;
            let mut conn = self.acquire().await.map_err(RepositoryError::Provider)?;
            insert_row(&mut conn, &marker, workspace)
                .await
                .map_err(RepositoryError::Provider)?;
        }
        Ok(())
    }

    async fn workspace(&self, name: &str) -> Result<Option<Workspace>> {
        let row: Option<WorkspaceRow> =
            sqlx::query_as("SELECT name, base_workspace, title FROM workspaces WHERE name = ?")
                .bind(name)
                .fetch_optional(&**self)
                .await
                .map_err(RepositoryError::Provider)?;
        Ok(row.map(Workspace::from))
    }

    async fn workspaces(&self) -> Result<Vec<Workspace>> {
        let rows: Vec<WorkspaceRow> =
            sqlx::query_as("SELECT name, base_workspace, title FROM workspaces ORDER BY name")
                .fetch_all(&**self)
                .await
                .map_err(RepositoryError::Provider)?;
        Ok(rows.into_iter().map(Workspace::from).collect())
    }

    async fn create_workspace(&self, workspace: &Workspace) -> Result<()> {
        if self.workspace(&workspace.name).await?.is_some() {
            return Err(RepositoryError::WorkspaceExists(workspace.name.clone()));
        }
        if let Some(base) = &workspace.base_workspace {
            if self.workspace(base).await?.is_none() {
                return Err(RepositoryError::UnknownWorkspace(base.clone()));
            }
        }

        sqlx::query("INSERT INTO workspaces (name, base_workspace, title) VALUES (?, ?, ?)")
            .bind(&workspace.name)
            .bind(&workspace.base_workspace)
            .bind(&workspace.title)
            .execute(&**self)
            .await
            .map_err(RepositoryError::Provider)?;
        Ok(())
    }

    async fn publish(&self, source: &str, target: &str) -> Result<u64> {
        for name in [source, target] {
            if self.workspace(name).await?.is_none() {
                return Err(RepositoryError::UnknownWorkspace(name.to_string()));
            }
        }

        let mut tx = self.begin().await.map_err(RepositoryError::Provider)?;

        let changes: Vec<NodeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM nodes WHERE workspace = ? ORDER BY id ASC",
            NODE_COLUMNS
        ))
        .bind(source)
        .fetch_all(&mut *tx)
        .await
        .map_err(RepositoryError::Provider)?;
        let changes: Vec<Node> = changes.into_iter().map(Node::from).collect();

        sqlx::query("DELETE FROM nodes WHERE workspace = ?")
            .bind(source)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::Provider)?;

        for change in &changes {
            sqlx::query("DELETE FROM nodes WHERE workspace = ? AND identifier = ?")
                .bind(target)
                .bind(&change.identifier)
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::Provider)?;
            if change.removed {
                continue;
            }

            let taken = occupied(&mut tx, target, "path", &change.path)
                .await
                .map_err(RepositoryError::Provider)?;
            if taken {
                // dropping the transaction rolls everything back
                return Err(RepositoryError::PathConflict {
                    workspace: target.to_string(),
                    path: change.path.clone(),
                });
            }
            insert_row(&mut tx, change, target)
                .await
                .map_err(RepositoryError::Provider)?;
        }

        tx.commit().await.map_err(RepositoryError::Provider)?;

        tracing::info!(source, target, changes = changes.len(), "published workspace");
        Ok(changes.len() as u64)
    }
}
