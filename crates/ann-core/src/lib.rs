//! Core types for the vector store: the distance kernel, the vector id,
//! the error type, and the brute-force vector store itself.

pub mod distance;
pub mod error;
pub mod ids;
pub mod store;

pub use distance::{cosine, cosine_distance, dot, magnitude, normalize, ZERO_MAGNITUDE_THRESHOLD};
pub use error::{CoreError, CoreResult};
pub use ids::VectorId;
pub use store::{Neighbor, VectorStore};
