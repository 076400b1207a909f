//! Recall test comparing HNSW against the brute-force baseline it is
//! measured against.

use ann_core::{VectorId, VectorStore};
use ann_index::{HnswConfig, HnswIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn random_vector(rng: &mut StdRng, dim: usize) -> Vec<f32> {
    (0..dim).map(|_| rng.gen::<f32>()).collect()
}

fn recall_at_k(ground_truth: &[VectorId], found: &[VectorId], k: usize) -> f64 {
    let gt: HashSet<_> = ground_truth.iter().take(k).collect();
    let hits = found.iter().take(k).filter(|id| gt.contains(id)).count();
    hits as f64 / k as f64
}

/// Seed 42, D=32, N=100, k=5, M=16, ef_construction=100, ef_search=50:
/// recall must be at least 0.6.
#[test]
fn hnsw_recall_meets_bound_at_moderate_scale() {
    let seed = 42;
    let dim = 32;
    let n = 100;
    let k = 5;
    let m = 16;
    let ef_construction = 100;
    let ef_search = 50;
    let n_queries = 20;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = VectorStore::new(dim).unwrap();
    for i in 0..n {
        store
            .add_vector(VectorId::new(i as u64), random_vector(&mut rng, dim))
            .unwrap();
    }

    let config = HnswConfig::new(m, ef_construction).unwrap();
    let index = HnswIndex::new_seeded(&store, config, seed);
    for i in 0..n {
        index.add_vector(VectorId::new(i as u64)).unwrap();
    }

    let mut total_recall = 0.0;
    for _ in 0..n_queries {
        let query = random_vector(&mut rng, dim);
        let ground_truth: Vec<VectorId> = store
            .brute_force_search(&query, k)
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        let found: Vec<VectorId> = index
            .search(&query, k, ef_search)
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        total_recall += recall_at_k(&ground_truth, &found, k);
    }

    let avg_recall = total_recall / n_queries as f64;
    assert!(avg_recall >= 0.6, "recall too low: {avg_recall:.3} < 0.6");
}

#[test]
fn hnsw_recall_is_high_with_generous_ef_search() {
    let seed = 7;
    let dim = 16;
    let n = 200;
    let k = 10;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = VectorStore::new(dim).unwrap();
    for i in 0..n {
        store
            .add_vector(VectorId::new(i as u64), random_vector(&mut rng, dim))
            .unwrap();
    }

    let config = HnswConfig::new(16, 200).unwrap();
    let index = HnswIndex::new_seeded(&store, config, seed);
    for i in 0..n {
        index.add_vector(VectorId::new(i as u64)).unwrap();
    }

    let query = random_vector(&mut rng, dim);
    let ground_truth: Vec<VectorId> = store
        .brute_force_search(&query, k)
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    let found: Vec<VectorId> = index
        .search(&query, k, 200)
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();

    assert!(recall_at_k(&ground_truth, &found, k) >= 0.8);
}
