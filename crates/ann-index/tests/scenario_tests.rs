//! End-to-end scenarios exercising the store and index together.

use ann_core::{cosine, CoreError, VectorId, VectorStore};
use ann_index::{HnswConfig, HnswIndex};

/// D=3, insert {1:(1,0,0), 2:(0,1,0), 3:(0,0,1)} into store and index
/// (M=4, ef=50). Query (1, 0.1, 0), k=1, ef_search=10 -> single result id=1.
#[test]
fn scenario_single_nearest_neighbor_on_axis_vectors() {
    let mut store = VectorStore::new(3).unwrap();
    store.add_vector(VectorId::new(1), vec![1.0, 0.0, 0.0]).unwrap();
    store.add_vector(VectorId::new(2), vec![0.0, 1.0, 0.0]).unwrap();
    store.add_vector(VectorId::new(3), vec![0.0, 0.0, 1.0]).unwrap();

    let config = HnswConfig::new(4, 50).unwrap();
    let index = HnswIndex::new_seeded(&store, config, 42);
    for id in [1, 2, 3] {
        index.add_vector(VectorId::new(id)).unwrap();
    }

    let results = index.search(&[1.0, 0.1, 0.0], 1, 10).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, VectorId::new(1));
}

/// Same store as above, plus 4:(1,1,0)/sqrt(2), 5:(0,1,1)/sqrt(2).
/// Brute force with query (1,0,0), k=2 -> ids (1, 4) in that order;
/// distance of 1 is approximately 0.
#[test]
fn scenario_brute_force_orders_axis_and_diagonal_vectors() {
    let mut store = VectorStore::new(3).unwrap();
    store.add_vector(VectorId::new(1), vec![1.0, 0.0, 0.0]).unwrap();
    store.add_vector(VectorId::new(2), vec![0.0, 1.0, 0.0]).unwrap();
    store.add_vector(VectorId::new(3), vec![0.0, 0.0, 1.0]).unwrap();
    let inv_sqrt2 = 1.0 / 2f32.sqrt();
    store
        .add_vector(VectorId::new(4), vec![inv_sqrt2, inv_sqrt2, 0.0])
        .unwrap();
    store
        .add_vector(VectorId::new(5), vec![0.0, inv_sqrt2, inv_sqrt2])
        .unwrap();

    let results = store.brute_force_search(&[1.0, 0.0, 0.0], 2).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, VectorId::new(1));
    assert!(results[0].distance.abs() < 1e-5);
    assert_eq!(results[1].id, VectorId::new(4));
}

/// A store with dimension 3; calling `add_vector(1, [1,2])` raises
/// `DimensionMismatch`; subsequent `len()` is 0.
#[test]
fn scenario_dimension_mismatch_on_add_leaves_store_empty() {
    let mut store = VectorStore::new(3).unwrap();
    let err = store.add_vector(VectorId::new(1), vec![1.0, 2.0]).unwrap_err();
    assert!(matches!(
        err,
        CoreError::DimensionMismatch {
            expected: 3,
            actual: 2
        }
    ));
    assert_eq!(store.len(), 0);
}

/// A store with id 1 present; `add_vector(1, ...)` a second time raises
/// `DuplicateId`; `get_vector(1)` still returns the original payload.
#[test]
fn scenario_duplicate_id_preserves_original_payload() {
    let mut store = VectorStore::new(3).unwrap();
    store.add_vector(VectorId::new(1), vec![1.0, 2.0, 3.0]).unwrap();
    let err = store
        .add_vector(VectorId::new(1), vec![9.0, 9.0, 9.0])
        .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateId { id } if id == VectorId::new(1)));
    assert_eq!(store.get_vector(VectorId::new(1)).unwrap(), &[1.0, 2.0, 3.0]);
}

/// `cosine([1,0,0], [0,0,0])` raises `ZeroMagnitude`.
#[test]
fn scenario_cosine_against_zero_vector_raises_zero_magnitude() {
    let err = cosine(&[1.0, 0.0, 0.0], &[0.0, 0.0, 0.0]).unwrap_err();
    assert!(matches!(err, CoreError::ZeroMagnitude));
}

/// Index insertion rejects an id absent from the backing store, and leaves
/// the graph untouched.
#[test]
fn scenario_add_vector_to_index_requires_store_membership() {
    let store = VectorStore::new(3).unwrap();
    let config = HnswConfig::new(4, 50).unwrap();
    let index = HnswIndex::new_seeded(&store, config, 1);
    let err = index.add_vector(VectorId::new(1)).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { id } if id == VectorId::new(1)));
    assert!(index.is_empty());
}
