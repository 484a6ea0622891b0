/**
 * SQL `LIKE` pattern escaping and evaluation,
 *  shared by every repository backend.
 */
pub mod like;
/**
 * The node record: identifier, path, type,
 *  workspace and JSON properties.
 */
pub mod node;
/**
 * Constraint builder over node records.
 * Composes type, path, search, identifier and
 *  workspace constraints into immutable list,
 *  count and delete descriptors.
 */
pub mod query;
/**
 * Storage abstraction for node records and
 *  workspaces, plus an in-memory implementation.
 */
pub mod repository;
/**
 * Depth-bounded, pre-order listing of documents.
 */
pub mod tree;
/**
 * Mapping of public URLs onto document nodes.
 */
pub mod uri;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;
/**
 * Post-order traversal of document subtrees.
 */
pub mod walker;
/**
 * Workspace model and the overlay of a workspace
 *  on top of its base workspaces.
 */
pub mod workspace;

pub mod prelude {
    pub use crate::build_info;
    pub use crate::node::{Node, ROOT_PATH, TITLE_PROPERTY, URI_PATH_SEGMENT_PROPERTY};
    pub use crate::query::{
        CountQuery, DeleteQuery, ListQuery, NodeQuery, OrderDirection, OrderField, QueryOptions,
        TypeFilter,
    };
    pub use crate::repository::{MemoryNodeRepository, NodeRepository, RepositoryError};
    pub use crate::tree::{DocumentRow, DocumentTree};
    pub use crate::uri::{resolve_url, ResolveError};
    pub use crate::version::BuildInfo;
    pub use crate::walker::{DocumentWalker, DOCUMENT_NODE_TYPE};
    pub use crate::workspace::{user_workspace_name, Workspace, LIVE_WORKSPACE};
}
