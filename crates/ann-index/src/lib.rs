//! HNSW approximate nearest neighbor index over an `ann-core` vector store.
//!
//! - [`HnswIndex`]: multi-layer graph ANN index, borrowing its backing
//!   [`ann_core::VectorStore`] for the index's lifetime.
//! - Exact brute-force search lives on the store itself
//!   ([`ann_core::VectorStore::brute_force_search`]) and serves as the
//!   recall oracle this index is measured against.

mod hnsw;

pub use hnsw::{HnswConfig, HnswIndex};
