//! Vector store: owns vector payloads and provides exact brute-force search.

use std::collections::HashMap;

use tracing::debug;

use crate::distance::cosine_distance;
use crate::error::{CoreError, CoreResult};
use crate::ids::VectorId;

/// An `(id, distance)` pair, the result type returned by both brute-force
/// and HNSW search. Ordered on `distance` ascending — smaller is closer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Identifier of the matched vector.
    pub id: VectorId,
    /// Cosine distance from the query, `1 - cos(query, vector)`.
    pub distance: f32,
}

impl Neighbor {
    #[must_use]
    pub const fn new(id: VectorId, distance: f32) -> Self {
        Self { id, distance }
    }
}

fn reject_non_finite(v: &[f32]) -> CoreResult<()> {
    if v.iter().any(|x| !x.is_finite()) {
        return Err(CoreError::invalid_argument(
            "vector contains a non-finite component (NaN or Infinity)",
        ));
    }
    Ok(())
}

/// In-memory store of fixed-dimension vectors keyed by [`VectorId`].
///
/// The store owns every vector payload for its lifetime; callers receive
/// borrowed views via [`VectorStore::get_vector`]. There is no removal
/// operation, so a borrowed view stays valid for as long as the store does.
#[derive(Debug)]
pub struct VectorStore {
    dimension: usize,
    vectors: HashMap<VectorId, Vec<f32>>,
}

impl VectorStore {
    /// Creates an empty store fixed to `dimension`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `dimension` is `0`.
    pub fn new(dimension: usize) -> CoreResult<Self> {
        if dimension == 0 {
            return Err(CoreError::invalid_argument(
                "store dimension must be greater than 0",
            ));
        }
        Ok(Self {
            dimension,
            vectors: HashMap::new(),
        })
    }

    /// Returns the dimension every vector in this store must have.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the number of vectors currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns `true` if the store holds no vectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Returns `true` if `id` is present in the store.
    #[must_use]
    pub fn contains(&self, id: VectorId) -> bool {
        self.vectors.contains_key(&id)
    }

    /// Inserts `vector` under `id`, taking ownership of a copy of it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DimensionMismatch`] if `vector.len() != self.dimension()`,
    /// [`CoreError::InvalidArgument`] if `vector` contains a non-finite component,
    /// or [`CoreError::DuplicateId`] if `id` is already present.
    pub fn add_vector(&mut self, id: VectorId, vector: Vec<f32>) -> CoreResult<()> {
        if vector.len() != self.dimension {
            return Err(CoreError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        reject_non_finite(&vector)?;
        if self.vectors.contains_key(&id) {
            return Err(CoreError::DuplicateId { id });
        }
        self.vectors.insert(id, vector);
        Ok(())
    }

    /// Returns a borrowed view of the vector stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if `id` is absent.
    pub fn get_vector(&self, id: VectorId) -> CoreResult<&[f32]> {
        self.vectors
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(CoreError::NotFound { id })
    }

    /// Exact cosine top-k search by brute-force linear scan. Defines the
    /// recall oracle the HNSW index is measured against.
    ///
    /// Returns up to `min(k, self.len())` results sorted by distance
    /// ascending. Returns the empty sequence on an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DimensionMismatch`] if `query.len() != self.dimension()`,
    /// or [`CoreError::InvalidArgument`] if `query` contains a non-finite component.
    pub fn brute_force_search(&self, query: &[f32], k: usize) -> CoreResult<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(CoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        reject_non_finite(query)?;

        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<Neighbor> = Vec::with_capacity(self.vectors.len());
        for (&id, vector) in &self.vectors {
            let distance = cosine_distance(query, vector)?;
            scored.push(Neighbor::new(id, distance));
        }

        let k = k.min(scored.len());
        // Partition so the k smallest land in the first k slots, then sort
        // just that prefix — the same two-phase shape as a full sort
        // followed by truncation, without paying for a full sort when
        // k is much smaller than the corpus.
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, |a, b| a.distance.total_cmp(&b.distance));
            scored.truncate(k);
        }
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        debug!(k, found = scored.len(), "brute_force_search");
        Ok(scored)
    }
}
