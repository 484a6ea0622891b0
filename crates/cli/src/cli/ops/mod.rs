pub mod info;
pub mod init;
pub mod node;
pub mod page;
pub mod version;
pub mod workspace;

pub use info::Info;
pub use init::Init;
pub use node::NodeCmd;
pub use page::Page;
pub use version::Version;
pub use workspace::WorkspaceCmd;
