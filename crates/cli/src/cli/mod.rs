pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Info, Init, NodeCmd, Page, Version, WorkspaceCmd};
