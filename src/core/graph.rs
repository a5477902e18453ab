//! Prerequisite graph for one domain.
//!
//! Words and edges live in an arena indexed by position; adjacency is kept as
//! index lists in both directions so neither direction needs back-references.
//! Construction validates edge endpoints; acyclicity is checked by the depth
//! resolver, where the scan already pays the cost.

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("invalid prerequisite edge: {word} -> {prerequisite}")]
    InvalidEdge { word: Uuid, prerequisite: Uuid },
    #[error("prerequisite graph contains a cycle")]
    CycleDetected,
}

/// Arena-backed DAG of words and their prerequisite edges.
#[derive(Debug)]
pub struct DomainGraph {
    ids: Vec<Uuid>,
    index: HashMap<Uuid, usize>,
    prereqs: Vec<Vec<usize>>,
    dependents: Vec<Vec<usize>>,
}

impl DomainGraph {
    /// Builds the graph from a domain's word ids and (word, prerequisite) pairs.
    ///
    /// Fails with `InvalidEdge` on a self-loop or an endpoint outside the word
    /// set. Does not check for cycles; see [`DomainGraph::depths`].
    pub fn new(word_ids: &[Uuid], edges: &[(Uuid, Uuid)]) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(word_ids.len());
        let mut ids = Vec::with_capacity(word_ids.len());
        for &id in word_ids {
            if !index.contains_key(&id) {
                index.insert(id, ids.len());
                ids.push(id);
            }
        }

        let mut prereqs = vec![Vec::new(); ids.len()];
        let mut dependents = vec![Vec::new(); ids.len()];

        for &(word, prerequisite) in edges {
            let invalid = || GraphError::InvalidEdge { word, prerequisite };
            if word == prerequisite {
                return Err(invalid());
            }
            let w = *index.get(&word).ok_or_else(invalid)?;
            let p = *index.get(&prerequisite).ok_or_else(invalid)?;
            if !prereqs[w].contains(&p) {
                prereqs[w].push(p);
                dependents[p].push(w);
            }
        }

        Ok(Self {
            ids,
            index,
            prereqs,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.index.contains_key(&id)
    }

    pub fn word_ids(&self) -> &[Uuid] {
        &self.ids
    }

    /// Prerequisites that must be mastered before `id` unlocks.
    pub fn prerequisites_of(&self, id: Uuid) -> impl Iterator<Item = Uuid> + '_ {
        self.neighbors(id, &self.prereqs)
    }

    /// Words that list `id` as a prerequisite (reverse edges).
    pub fn dependents_of(&self, id: Uuid) -> impl Iterator<Item = Uuid> + '_ {
        self.neighbors(id, &self.dependents)
    }

    /// Number of words this word unlocks.
    pub fn unlock_count(&self, id: Uuid) -> usize {
        self.index
            .get(&id)
            .map(|&i| self.dependents[i].len())
            .unwrap_or(0)
    }

    fn neighbors<'a>(
        &'a self,
        id: Uuid,
        adjacency: &'a [Vec<usize>],
    ) -> impl Iterator<Item = Uuid> + 'a {
        let ids = &self.ids;
        self.index
            .get(&id)
            .into_iter()
            .flat_map(move |&i| adjacency[i].iter().map(move |&j| ids[j]))
    }

    /// Topological depth of every word: 0 for roots, else one past the deepest
    /// prerequisite.
    ///
    /// Iterative relaxation over all edges until a fixpoint. A DAG converges in
    /// at most `len` passes (its depth is bounded by `len - 1`), so exceeding
    /// `len + 1` passes is conclusive proof of a cycle and fails instead of
    /// spinning forever.
    pub fn depths(&self) -> Result<HashMap<Uuid, u32>, GraphError> {
        let mut depth = vec![0u32; self.ids.len()];
        let max_passes = self.ids.len() + 1;

        let mut passes = 0;
        loop {
            let mut changed = false;
            for (w, prereqs) in self.prereqs.iter().enumerate() {
                for &p in prereqs {
                    let candidate = depth[p] + 1;
                    if candidate > depth[w] {
                        depth[w] = candidate;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
            passes += 1;
            if passes > max_passes {
                return Err(GraphError::CycleDetected);
            }
        }

        Ok(self
            .ids
            .iter()
            .copied()
            .zip(depth.iter().copied())
            .collect())
    }
}

/// Depth map for a word set and edge list in one call.
pub fn compute_depths(
    word_ids: &[Uuid],
    edges: &[(Uuid, Uuid)],
) -> Result<HashMap<Uuid, u32>, GraphError> {
    DomainGraph::new(word_ids, edges)?.depths()
}

/// Groups words by depth: `levels[d]` holds every word at depth `d`, each level
/// in arena (insertion) order.
pub fn levels(graph: &DomainGraph, depths: &HashMap<Uuid, u32>) -> Vec<Vec<Uuid>> {
    let max_depth = depths.values().copied().max();
    let Some(max_depth) = max_depth else {
        return Vec::new();
    };

    let mut levels = vec![Vec::new(); max_depth as usize + 1];
    for &id in graph.word_ids() {
        if let Some(&d) = depths.get(&id) {
            levels[d as usize].push(id);
        }
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n)
            .map(|i| Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("w{i}").as_bytes()))
            .collect()
    }

    #[test]
    fn test_rejects_self_loop() {
        let w = ids(1);
        let err = DomainGraph::new(&w, &[(w[0], w[0])]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidEdge { .. }));
    }

    #[test]
    fn test_rejects_foreign_endpoint() {
        let w = ids(2);
        let outside = Uuid::new_v4();
        let err = DomainGraph::new(&w, &[(w[0], outside)]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidEdge { .. }));
    }

    #[test]
    fn test_roots_have_depth_zero() {
        let w = ids(3);
        let graph = DomainGraph::new(&w, &[]).unwrap();
        let depths = graph.depths().unwrap();
        assert!(w.iter().all(|id| depths[id] == 0));
    }

    #[test]
    fn test_depth_is_longest_path() {
        // w3 -> w2 -> w0, w3 -> w1 (w0, w1 roots). Longest path wins.
        let w = ids(4);
        let edges = [(w[2], w[0]), (w[3], w[2]), (w[3], w[1])];
        let graph = DomainGraph::new(&w, &edges).unwrap();
        let depths = graph.depths().unwrap();
        assert_eq!(depths[&w[0]], 0);
        assert_eq!(depths[&w[1]], 0);
        assert_eq!(depths[&w[2]], 1);
        assert_eq!(depths[&w[3]], 2);
    }

    #[test]
    fn test_every_edge_strictly_descends() {
        let w = ids(5);
        let edges = [
            (w[1], w[0]),
            (w[2], w[0]),
            (w[3], w[1]),
            (w[3], w[2]),
            (w[4], w[3]),
            (w[4], w[0]),
        ];
        let graph = DomainGraph::new(&w, &edges).unwrap();
        let depths = graph.depths().unwrap();
        for (word, prereq) in edges {
            assert!(depths[&word] > depths[&prereq]);
        }
    }

    #[test]
    fn test_cycle_detected_not_hung() {
        let w = ids(3);
        let edges = [(w[0], w[1]), (w[1], w[2]), (w[2], w[0])];
        let graph = DomainGraph::new(&w, &edges).unwrap();
        assert_eq!(graph.depths().unwrap_err(), GraphError::CycleDetected);
    }

    #[test]
    fn test_two_node_cycle_detected() {
        let w = ids(2);
        let graph = DomainGraph::new(&w, &[(w[0], w[1]), (w[1], w[0])]).unwrap();
        assert_eq!(graph.depths().unwrap_err(), GraphError::CycleDetected);
    }

    #[test]
    fn test_adjacency_both_directions() {
        let w = ids(3);
        let graph = DomainGraph::new(&w, &[(w[2], w[0]), (w[2], w[1])]).unwrap();
        let prereqs: Vec<_> = graph.prerequisites_of(w[2]).collect();
        assert_eq!(prereqs, vec![w[0], w[1]]);
        let dependents: Vec<_> = graph.dependents_of(w[0]).collect();
        assert_eq!(dependents, vec![w[2]]);
        assert_eq!(graph.unlock_count(w[0]), 1);
        assert_eq!(graph.unlock_count(w[2]), 0);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let w = ids(2);
        let graph = DomainGraph::new(&w, &[(w[1], w[0]), (w[1], w[0])]).unwrap();
        assert_eq!(graph.unlock_count(w[0]), 1);
        assert_eq!(graph.prerequisites_of(w[1]).count(), 1);
    }

    #[test]
    fn test_levels_partition() {
        let w = ids(4);
        let edges = [(w[2], w[0]), (w[3], w[2]), (w[3], w[1])];
        let graph = DomainGraph::new(&w, &edges).unwrap();
        let depths = graph.depths().unwrap();
        let levels = levels(&graph, &depths);
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0], vec![w[0], w[1]]);
        assert_eq!(levels[1], vec![w[2]]);
        assert_eq!(levels[2], vec![w[3]]);
    }
}
