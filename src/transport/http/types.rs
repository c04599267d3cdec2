use crate::domain::scope::ScopeRegistry;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handler state.
///
/// The registry sits behind an `RwLock`: reads run concurrently, while a
/// mutation holds the write lock across its write-through persist, so
/// parallel request handling cannot produce lost updates.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RwLock<ScopeRegistry>>,
}

/// Pagination over the insertion-ordered record set: a contiguous slice
/// starting at `from` (default 0) of at most `count` records (default
/// unlimited). Records are not filtered by field value.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub from: usize,
    pub count: Option<usize>,
}
