use social_extract::errors::FetchError;
use social_extract::extract::{extract, Extractor, Outcome};
use social_extract::graph::{Depth, Neighborhood, NodeId, UserRegistry};

// Recursive generator around a node `X`:
// 1. X follows X0 and X1.
// 2. X is followed by X2 and X3.
// 3. X0 follows X1.
fn generate(node: &NodeId, _label: &str) -> Result<Neighborhood, FetchError> {
    let mut n = Neighborhood::new();
    for i in 0..2 {
        let friend = NodeId::new(format!("{node}{i}"));
        n.follows(node, friend.clone(), format!("user{friend}"));
    }
    for i in 2..4 {
        let follower = NodeId::new(format!("{node}{i}"));
        n.followed_by(node, follower.clone(), format!("user{follower}"));
    }
    n.edges.insert(NodeId::new(format!("{node}0")), NodeId::new(format!("{node}1")));
    Ok(n)
}

fn seeds() -> UserRegistry {
    [("1", "user1")].into_iter().collect()
}

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

#[test]
fn depth_1() {
    let out = extract(&generate, seeds(), 1.0).unwrap();

    // seed plus 4 neighbors
    assert_eq!(out.users.len(), 5);
    // one edge between the seed and each neighbor
    assert_eq!(out.edges.edge_count(), 4);
    assert_eq!(
        out.edges.lookup(&id("1")).unwrap().iter().map(NodeId::as_str).collect::<Vec<_>>(),
        vec!["10", "11"]
    );
    assert!(out.edges.contains(&id("12"), &id("1")));
    assert!(out.edges.contains(&id("13"), &id("1")));
    // 10 -> 11 only shows up at 1.5
    assert!(!out.edges.contains(&id("10"), &id("11")));
    assert_eq!(out.outcome, Outcome::Complete { hops: 1 });
}

#[test]
fn depth_1_5() {
    let out = extract(&generate, seeds(), 1.5).unwrap();

    assert_eq!(out.users.len(), 5);
    assert_eq!(out.edges.edge_count(), 5);
    assert!(out.users.contains(&id("10")));
    assert!(!out.users.contains(&id("100")));
    assert!(out.edges.contains(&id("10"), &id("11")));
}

#[test]
fn depth_2() {
    let out = extract(&generate, seeds(), 2.0).unwrap();

    // 1 seed, 4 at one hop, 16 at two hops
    assert_eq!(out.users.len(), 21);
    // 5 edges from the first hop + 4 per second-hop node
    assert_eq!(out.edges.edge_count(), 21);
    let friends_of_10: Vec<&str> = out.edges.lookup(&id("10")).unwrap().iter().map(NodeId::as_str).collect();
    assert_eq!(friends_of_10, vec!["100", "101", "11"]);
    assert!(out.edges.contains(&id("102"), &id("10")));
    assert!(out.edges.contains(&id("103"), &id("10")));
    assert!(!out.edges.contains(&id("100"), &id("101")));
}

#[test]
fn depth_2_5() {
    let out = extract(&generate, seeds(), 2.5).unwrap();

    assert_eq!(out.users.len(), 21);
    // depth-2 edges plus 100->101, 110->111, 120->121, 130->131
    assert_eq!(out.edges.edge_count(), 25);
    for prefix in ["10", "11", "12", "13"] {
        assert!(out.edges.contains(&id(&format!("{prefix}0")), &id(&format!("{prefix}1"))));
    }
    assert!(!out.users.contains(&id("1000")));
    assert_eq!(out.completed_hops(), 3);
}

#[test]
fn every_edge_endpoint_is_a_known_user() {
    for depth in [0.5, 1.0, 1.5, 2.0, 2.5, 3.0] {
        let out = extract(&generate, seeds(), depth).unwrap();
        for node in out.edges.referenced_ids() {
            assert!(out.users.contains(node), "depth {depth}: {node} missing from users");
        }
    }
}

#[test]
fn parallel_matches_sequential() {
    for depth in ["1", "1.5", "2", "2.5", "3"] {
        let extractor = Extractor::new(depth.parse::<Depth>().unwrap());
        let seq = extractor.run(&generate, seeds()).unwrap();
        let par = extractor.run_parallel(&generate, seeds()).unwrap();
        assert_eq!(seq.users, par.users, "users differ at depth {depth}");
        assert_eq!(seq.edges, par.edges, "edges differ at depth {depth}");
    }
}

#[test]
fn multiple_seeds_share_one_frontier() {
    let seeds: UserRegistry = [("1", "user1"), ("2", "user2")].into_iter().collect();
    let out = extract(&generate, seeds, 1.0).unwrap();
    assert_eq!(out.users.len(), 10);
    assert_eq!(out.edges.edge_count(), 8);
}
