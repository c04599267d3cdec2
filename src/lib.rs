pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use domain::scope::{Scope, ScopeRegistry, ScopeStructure};
pub use storage::{BlobStore, StoreError};
