//! HNSW (Hierarchical Navigable Small World) index implementation.
//!
//! This implements the HNSW algorithm from Malkov & Yashunin (2018):
//! "Efficient and robust approximate nearest neighbor search using Hierarchical
//! Navigable Small World graphs" <https://arxiv.org/abs/1603.09320>, specialized
//! to a single fixed distance: cosine distance over a borrowed [`VectorStore`].

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use ann_core::{cosine_distance, CoreError, CoreResult, Neighbor, VectorId, VectorStore};

/// HNSW index configuration parameters.
#[derive(Debug, Clone, Copy)]
pub struct HnswConfig {
    /// Target out-degree per node per layer. Must be at least 2.
    pub m: usize,
    /// Candidate-list size used during insertion. Must be at least `m`.
    pub ef_construction: usize,
    /// Level-generation normalization factor, `1 / ln(m)`.
    ml: f64,
}

impl HnswConfig {
    /// Creates a validated HNSW configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `m < 2` or `ef_construction < m`.
    pub fn new(m: usize, ef_construction: usize) -> CoreResult<Self> {
        if m < 2 {
            return Err(CoreError::invalid_argument("M must be at least 2"));
        }
        if ef_construction < m {
            return Err(CoreError::invalid_argument(
                "ef_construction must be at least M",
            ));
        }
        Ok(Self {
            m,
            ef_construction,
            ml: 1.0 / (m as f64).ln(),
        })
    }
}

/// A node in the HNSW graph: an immutable top layer and a per-layer
/// adjacency list for layers `0..=top_layer`.
#[derive(Debug, Clone)]
struct Node {
    top_layer: usize,
    neighbors: Vec<Vec<VectorId>>,
}

impl Node {
    fn new(top_layer: usize) -> Self {
        Self {
            top_layer,
            neighbors: vec![Vec::new(); top_layer + 1],
        }
    }
}

/// Internal mutable state of the HNSW graph.
struct HnswState {
    nodes: HashMap<VectorId, Node>,
    entry_point: Option<VectorId>,
    /// `None` when the graph is empty, the idiomatic stand-in for the
    /// algorithm's usual `-1` sentinel.
    max_layer: Option<usize>,
}

impl HnswState {
    fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            entry_point: None,
            max_layer: None,
        }
    }
}

/// An `(distance, id)` candidate ordered by distance ascending: smaller
/// (closer) is "less". Because this index is hard-wired to cosine distance,
/// a single `Ord` impl serves both the min-heap frontier and the max-heap
/// results in [`HnswIndex::search_layer`] (via `Reverse` for the former).
#[derive(Debug, Clone, Copy)]
struct OrderedDist(f32, VectorId);

impl PartialEq for OrderedDist {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for OrderedDist {}

impl PartialOrd for OrderedDist {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedDist {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Hierarchical Navigable Small World index over a borrowed [`VectorStore`].
///
/// The index never copies vector payloads: every distance computation reads
/// through `store`. The store must outlive the index, which is why it is
/// held as a plain borrow (`&'s VectorStore`) rather than shared ownership.
///
/// # Example
///
/// ```
/// use ann_core::{VectorId, VectorStore};
/// use ann_index::{HnswConfig, HnswIndex};
///
/// let mut store = VectorStore::new(3).unwrap();
/// for (id, v) in [(1, [1.0, 0.0, 0.0]), (2, [0.0, 1.0, 0.0]), (3, [0.0, 0.0, 1.0])] {
///     store.add_vector(VectorId::new(id), v.to_vec()).unwrap();
/// }
///
/// let config = HnswConfig::new(16, 200).unwrap();
/// let index = HnswIndex::new(&store, config);
/// for id in [1, 2, 3] {
///     index.add_vector(VectorId::new(id)).unwrap();
/// }
///
/// let results = index.search(&[1.0, 0.1, 0.0], 1, 10).unwrap();
/// assert_eq!(results[0].id, VectorId::new(1));
/// ```
pub struct HnswIndex<'s> {
    store: &'s VectorStore,
    config: HnswConfig,
    rng: Mutex<StdRng>,
    state: RwLock<HnswState>,
}

impl<'s> HnswIndex<'s> {
    /// Creates an empty index over `store`, seeded from a nondeterministic
    /// source.
    #[must_use]
    pub fn new(store: &'s VectorStore, config: HnswConfig) -> Self {
        Self {
            store,
            config,
            rng: Mutex::new(StdRng::from_entropy()),
            state: RwLock::new(HnswState::new()),
        }
    }

    /// Creates an empty index over `store` with a deterministic PRNG seed,
    /// for reproducible construction in tests and benchmarks. The PRNG is
    /// an explicit field rather than a call to `rand::thread_rng()`, so the
    /// hot insertion path never touches a process-global random source.
    #[must_use]
    pub fn new_seeded(store: &'s VectorStore, config: HnswConfig, seed: u64) -> Self {
        Self {
            store,
            config,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            state: RwLock::new(HnswState::new()),
        }
    }

    /// Returns the number of ids currently in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().nodes.len()
    }

    /// Returns `true` if no ids have been added to the graph yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().nodes.is_empty()
    }

    /// Draws the top layer for a new node: `floor(-ln(r) * mL)` for
    /// `r` uniform in `(0, 1]`.
    fn select_level(&self) -> usize {
        let r: f64 = self.rng.lock().gen_range(f64::EPSILON..=1.0);
        (-r.ln() * self.config.ml).floor() as usize
    }

    /// Best-first beam search within a single layer. Each reachable node is
    /// distance-computed at most once; returns up to `ef` results sorted
    /// ascending by distance.
    fn search_layer(
        &self,
        state: &HnswState,
        query: &[f32],
        entry_points: &[VectorId],
        ef: usize,
        layer: usize,
    ) -> CoreResult<Vec<OrderedDist>> {
        let mut visited: HashSet<VectorId> = HashSet::new();
        let mut candidates: BinaryHeap<Reverse<OrderedDist>> = BinaryHeap::new();
        let mut results: BinaryHeap<OrderedDist> = BinaryHeap::new();

        for &ep in entry_points {
            if visited.insert(ep) {
                let dist = cosine_distance(query, self.store.get_vector(ep)?)?;
                let od = OrderedDist(dist, ep);
                candidates.push(Reverse(od));
                results.push(od);
            }
        }

        while let Some(Reverse(c)) = candidates.pop() {
            if results.len() >= ef {
                if let Some(worst) = results.peek() {
                    if c.0 > worst.0 {
                        break;
                    }
                }
            }

            let Some(node) = state.nodes.get(&c.1) else {
                continue;
            };
            if layer > node.top_layer {
                continue;
            }
            for &n in &node.neighbors[layer] {
                if !visited.insert(n) {
                    continue;
                }
                let d = cosine_distance(query, self.store.get_vector(n)?)?;
                let better_than_current_worst = results.peek().is_some_and(|worst| d < worst.0);
                if results.len() < ef || better_than_current_worst {
                    let od = OrderedDist(d, n);
                    candidates.push(Reverse(od));
                    results.push(od);
                    if results.len() > ef {
                        results.pop();
                    }
                }
            }
        }

        trace!(
            layer,
            ef,
            entry_points = entry_points.len(),
            found = results.len(),
            "search_layer"
        );

        let mut out: Vec<OrderedDist> = results.into_vec();
        out.sort();
        Ok(out)
    }

    /// Recomputes distances from `neighbor_id`'s own vector to every entry
    /// in its adjacency list at `layer` and keeps the `M` closest.
    fn prune(&self, state: &mut HnswState, neighbor_id: VectorId, layer: usize) -> CoreResult<()> {
        let m = self.config.m;
        let neighbor_vec = self.store.get_vector(neighbor_id)?;
        let list = state.nodes[&neighbor_id].neighbors[layer].clone();

        let mut scored: Vec<(f32, VectorId)> = Vec::with_capacity(list.len());
        for other in list {
            let d = cosine_distance(neighbor_vec, self.store.get_vector(other)?)?;
            scored.push((d, other));
        }
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.truncate(m);

        state.nodes.get_mut(&neighbor_id).unwrap().neighbors[layer] =
            scored.into_iter().map(|(_, id)| id).collect();
        Ok(())
    }

    /// Inserts `id` (already present in the store) into the graph.
    ///
    /// Preflights the store lookup and the duplicate-id check before any
    /// mutation, so a failing call leaves the graph unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if `id` is absent from the store, or
    /// [`CoreError::DuplicateId`] if `id` is already present in the graph.
    pub fn add_vector(&self, id: VectorId) -> CoreResult<()> {
        let v = self.store.get_vector(id)?;

        let mut state = self.state.write();
        if state.nodes.contains_key(&id) {
            return Err(CoreError::DuplicateId { id });
        }

        let level = self.select_level();
        state.nodes.insert(id, Node::new(level));

        let cur_max = match state.max_layer {
            Some(max) => max,
            None => {
                state.entry_point = Some(id);
                state.max_layer = Some(level);
                debug!(?id, level, "first vector inserted, becomes entry point");
                return Ok(());
            }
        };
        let mut cursor = state.entry_point.unwrap();

        for layer in ((level + 1)..=cur_max).rev() {
            let nearest = self.search_layer(&state, v, &[cursor], 1, layer)?;
            if let Some(best) = nearest.first() {
                cursor = best.1;
            }
        }

        let m = self.config.m;
        for layer in (0..=level.min(cur_max)).rev() {
            let candidates =
                self.search_layer(&state, v, &[cursor], self.config.ef_construction, layer)?;
            let chosen: Vec<VectorId> = candidates.iter().take(m).map(|od| od.1).collect();

            for &n in &chosen {
                state.nodes.get_mut(&id).unwrap().neighbors[layer].push(n);
                state.nodes.get_mut(&n).unwrap().neighbors[layer].push(id);
                if state.nodes[&n].neighbors[layer].len() > m {
                    self.prune(&mut state, n, layer)?;
                }
            }

            if let Some(best) = candidates.first() {
                cursor = best.1;
            }
        }

        if level > cur_max {
            state.entry_point = Some(id);
            state.max_layer = Some(level);
            debug!(?id, level, "new vector becomes the entry point");
        }

        Ok(())
    }

    /// Returns the up-to-`k` nearest neighbors of `query` by approximate
    /// cosine distance.
    ///
    /// Returns the empty sequence if the graph is empty.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DimensionMismatch`] if `query`'s length does not
    /// match the store's dimension, or [`CoreError::InvalidArgument`] if
    /// `k == 0` or `ef_search == 0`.
    pub fn search(&self, query: &[f32], k: usize, ef_search: usize) -> CoreResult<Vec<Neighbor>> {
        if query.len() != self.store.dimension() {
            return Err(CoreError::DimensionMismatch {
                expected: self.store.dimension(),
                actual: query.len(),
            });
        }
        if k == 0 {
            return Err(CoreError::invalid_argument("k must be at least 1"));
        }
        if ef_search == 0 {
            return Err(CoreError::invalid_argument("ef_search must be at least 1"));
        }

        let state = self.state.read();
        let Some(entry_point) = state.entry_point else {
            return Ok(Vec::new());
        };
        let max_layer = state
            .max_layer
            .expect("entry point implies max_layer is set");

        let mut cursor = entry_point;
        for layer in (1..=max_layer).rev() {
            let nearest = self.search_layer(&state, query, &[cursor], 1, layer)?;
            if let Some(best) = nearest.first() {
                cursor = best.1;
            }
        }

        let ef = ef_search.max(k);
        let mut results = self.search_layer(&state, query, &[cursor], ef, 0)?;
        results.truncate(k);

        Ok(results
            .into_iter()
            .map(|od| Neighbor::new(od.1, od.0))
            .collect())
    }
}
