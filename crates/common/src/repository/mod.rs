mod memory;
mod provider;

pub use memory::{MemoryNodeRepository, MemoryNodeRepositoryError};
pub use provider::{NodeRepository, RepositoryError};
