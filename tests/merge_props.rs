use proptest::prelude::*;
use social_extract::errors::FetchError;
use social_extract::extract::Extractor;
use social_extract::graph::{Depth, EdgeSet, Neighborhood, NodeId, UserRegistry};

fn edge_set(pairs: &[(u8, u8)]) -> EdgeSet {
    pairs.iter().map(|(a, b)| (NodeId::new(a.to_string()), NodeId::new(b.to_string()))).collect()
}

// Fetcher over a fixed adjacency list: reports in- and out-edges of the node.
fn fetch_from(graph: &EdgeSet, node: &NodeId) -> Result<Neighborhood, FetchError> {
    let mut n = Neighborhood::new();
    for (from, to) in graph.edges() {
        if from == node {
            n.follows(node, to.clone(), format!("u{to}"));
        }
        if to == node {
            n.followed_by(node, from.clone(), format!("u{from}"));
        }
    }
    Ok(n)
}

fn pairs() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0u8..10, 0u8..10), 0..40)
}

proptest! {
    #[test]
    fn merge_is_commutative(a in pairs(), b in pairs()) {
        let mut ab = edge_set(&a);
        ab.merge(&edge_set(&b));
        let mut ba = edge_set(&b);
        ba.merge(&edge_set(&a));
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn merge_is_idempotent(a in pairs(), b in pairs()) {
        let mut once = edge_set(&a);
        once.merge(&edge_set(&b));
        let mut twice = once.clone();
        twice.merge(&edge_set(&b));
        prop_assert_eq!(&once, &twice);
        let mut self_merge = once.clone();
        self_merge.merge(&once);
        prop_assert_eq!(once, self_merge);
    }

    #[test]
    fn half_step_deeper_never_loses_anything(g in pairs(), half_steps in 0u32..6) {
        let graph = edge_set(&g);
        let fetch = |node: &NodeId, _: &str| fetch_from(&graph, node);
        let seeds: UserRegistry = [("0", "u0")].into_iter().collect();

        let shallow = Extractor::new(Depth::new(f64::from(half_steps) / 2.0).unwrap())
            .run(&fetch, seeds.clone())
            .unwrap();
        let deeper = Extractor::new(Depth::new(f64::from(half_steps + 1) / 2.0).unwrap())
            .run(&fetch, seeds)
            .unwrap();

        for (id, _) in shallow.users.iter() {
            prop_assert!(deeper.users.contains(id));
        }
        for (from, to) in shallow.edges.edges() {
            prop_assert!(deeper.edges.contains(from, to));
        }
        for node in deeper.edges.referenced_ids() {
            prop_assert!(deeper.users.contains(node));
        }
        // every extracted edge exists in the source graph
        for (from, to) in deeper.edges.edges() {
            prop_assert!(graph.contains(from, to));
        }
    }

    #[test]
    fn parallel_equals_sequential(g in pairs(), half_steps in 0u32..6) {
        let graph = edge_set(&g);
        let fetch = |node: &NodeId, _: &str| fetch_from(&graph, node);
        let seeds: UserRegistry = [("0", "u0"), ("5", "u5")].into_iter().collect();
        let extractor = Extractor::new(Depth::new(f64::from(half_steps) / 2.0).unwrap());
        let seq = extractor.run(&fetch, seeds.clone()).unwrap();
        let par = extractor.run_parallel(&fetch, seeds).unwrap();
        prop_assert_eq!(seq.users, par.users);
        prop_assert_eq!(seq.edges, par.edges);
    }
}
