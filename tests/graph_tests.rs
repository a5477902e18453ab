//! Depth-resolver properties over generated prerequisite graphs.

use std::collections::HashMap;

use proptest::prelude::*;
use uuid::Uuid;

use learningtoy_backend::core::graph::{compute_depths, DomainGraph, GraphError};

fn word_ids(n: usize) -> Vec<Uuid> {
    (0..n)
        .map(|i| Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("graph-test-{i}").as_bytes()))
        .collect()
}

/// Edges from a higher arena index to a strictly lower one; acyclic by
/// construction.
fn arb_dag(max_words: usize) -> impl Strategy<Value = (Vec<Uuid>, Vec<(Uuid, Uuid)>)> {
    (2..max_words)
        .prop_flat_map(|n| {
            let edges = proptest::collection::vec((1..n, 0..n), 0..n * 2);
            (Just(n), edges)
        })
        .prop_map(|(n, raw_edges)| {
            let ids = word_ids(n);
            let edges = raw_edges
                .into_iter()
                .filter(|(word, prereq)| prereq < word)
                .map(|(word, prereq)| (ids[word], ids[prereq]))
                .collect();
            (ids, edges)
        })
}

proptest! {
    #[test]
    fn depths_exist_for_every_dag((ids, edges) in arb_dag(40)) {
        let depths = compute_depths(&ids, &edges).expect("a DAG always resolves");
        prop_assert_eq!(depths.len(), ids.len());
    }

    #[test]
    fn every_edge_strictly_descends((ids, edges) in arb_dag(40)) {
        let depths = compute_depths(&ids, &edges).unwrap();
        for (word, prereq) in &edges {
            prop_assert!(depths[word] > depths[prereq]);
        }
    }

    #[test]
    fn roots_sit_at_depth_zero((ids, edges) in arb_dag(40)) {
        let graph = DomainGraph::new(&ids, &edges).unwrap();
        let depths = graph.depths().unwrap();
        for &id in graph.word_ids() {
            if graph.prerequisites_of(id).next().is_none() {
                prop_assert_eq!(depths[&id], 0);
            }
        }
    }

    #[test]
    fn closing_a_path_into_a_cycle_is_detected((ids, edges) in arb_dag(40)) {
        // Find the deepest word and point a root at it through a new edge from
        // one of its transitive prerequisites; if the deepest word has no
        // prerequisites the graph is edgeless and there is nothing to close.
        let depths = compute_depths(&ids, &edges).unwrap();
        let Some((&deepest, &depth)) = depths.iter().max_by_key(|(_, &d)| d) else {
            return Ok(());
        };
        if depth == 0 {
            return Ok(());
        }

        // Walk down one prerequisite chain to a root, then make the deepest
        // word a prerequisite of that root.
        let graph = DomainGraph::new(&ids, &edges).unwrap();
        let mut cursor = deepest;
        while let Some(prereq) = graph.prerequisites_of(cursor).next() {
            cursor = prereq;
        }

        let mut cyclic = edges.clone();
        cyclic.push((cursor, deepest));
        prop_assert_eq!(
            compute_depths(&ids, &cyclic).unwrap_err(),
            GraphError::CycleDetected
        );
    }
}

#[test]
fn depth_map_is_recomputed_per_call() {
    // Same inputs, same output; changed edges, changed output. Nothing is
    // cached between calls.
    let ids = word_ids(3);
    let edges = vec![(ids[1], ids[0])];

    let first = compute_depths(&ids, &edges).unwrap();
    let second = compute_depths(&ids, &edges).unwrap();
    assert_eq!(first, second);

    let extended = vec![(ids[1], ids[0]), (ids[2], ids[1])];
    let third = compute_depths(&ids, &extended).unwrap();
    assert_eq!(third[&ids[2]], 2);
    assert_eq!(first[&ids[2]], 0);
}

#[test]
fn diamond_takes_longest_path() {
    let ids = word_ids(4);
    // 3 depends on 1 and 2; 1 depends on 0; 2 is a root.
    let edges = vec![(ids[1], ids[0]), (ids[3], ids[1]), (ids[3], ids[2])];
    let depths: HashMap<Uuid, u32> = compute_depths(&ids, &edges).unwrap();
    assert_eq!(depths[&ids[3]], 2);
}
