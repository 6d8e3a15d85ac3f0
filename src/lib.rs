pub mod arguments;
pub mod coordinator;
pub mod error;
pub mod parsers;
pub mod version;

pub use error::{Result, VersionSyncError};
