#![allow(clippy::unwrap_used, clippy::float_cmp)]

//! Ordering guarantees of traversals and shortest paths on random graphs.

use std::collections::HashMap;

use ordo_graph::{BreadthFirst, DepthFirst, Graph, ShortestPaths, SparseStore, Vertex, Visitor};
use proptest::prelude::*;

type WeightedEdges = Vec<(Vertex, Vertex, u32)>;

fn weighted_graph() -> impl Strategy<Value = (usize, WeightedEdges)> {
    (1..16usize).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((1..=n, 1..=n, 0u32..20), 0..48),
        )
    })
}

/// Build the graph; the last weight given for a pair wins.
fn build(n: usize, edges: &WeightedEdges) -> (Graph, HashMap<(Vertex, Vertex), f64>) {
    let mut g = Graph::directed();
    for _ in 0..n {
        g.add();
    }
    let mut weights = HashMap::new();
    for &(u, v, w) in edges {
        g.add_edge(u, v).unwrap();
        weights.insert((u, v), f64::from(w));
    }
    (g, weights)
}

#[derive(Default)]
struct Order {
    visited: Vec<Vertex>,
    finished: Vec<Vertex>,
}

impl Visitor for Order {
    fn visit(&mut self, v: Vertex) -> bool {
        self.visited.push(v);
        true
    }

    fn should_post_visit(&self, _v: Vertex) -> bool {
        true
    }

    fn post_visit(&mut self, v: Vertex) {
        self.finished.push(v);
    }
}

fn hops(g: &Graph, source: Vertex) -> ShortestPaths<'_, impl Fn(Vertex, Vertex) -> f64, SparseStore> {
    let mut sp = ShortestPaths::new(g, source, |_: Vertex, _: Vertex| 1.0, SparseStore::default());
    sp.set_paths().unwrap();
    sp
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn breadth_first_visits_in_distance_order((n, edges) in weighted_graph()) {
        let (g, _) = build(n, &edges);
        let mut order = Order::default();
        BreadthFirst::new().traverse(&g, 1, &mut order);

        let sp = hops(&g, 1);
        let distances: Vec<f64> = order.visited.iter().map(|&v| sp.weight(v)).collect();
        prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]), "{:?}", distances);
        prop_assert_eq!(order.visited.len(), sp.settled().len());
    }

    #[test]
    fn depth_first_finishes_dependencies_first((n, edges) in weighted_graph()) {
        // Keep only forward edges so the graph is acyclic.
        let forward: WeightedEdges = edges.into_iter().filter(|&(u, v, _)| u < v).collect();
        let (g, _) = build(n, &forward);

        let mut order = Order::default();
        DepthFirst::new().traverse_all(&g, g.vertices().collect::<Vec<_>>(), &mut order);

        prop_assert_eq!(order.finished.len(), n);
        let position: HashMap<Vertex, usize> =
            order.finished.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        for (u, v) in g.edges() {
            prop_assert!(position[&v] < position[&u], "{} finished after {}", v, u);
        }
    }

    #[test]
    fn dijkstra_settles_in_weight_order((n, edges) in weighted_graph(), source in 1..16usize) {
        let (g, weights) = build(n, &edges);
        let source = 1 + (source - 1) % n;
        let mut sp = ShortestPaths::dense(&g, source, |u: Vertex, v: Vertex| weights[&(u, v)]);
        sp.set_paths().unwrap();

        let popped: Vec<f64> = sp.settled().iter().map(|&v| sp.weight(v)).collect();
        prop_assert!(popped.windows(2).all(|w| w[0] <= w[1]), "{:?}", popped);

        for &v in sp.settled() {
            let path = sp.path_to(v).unwrap();
            prop_assert_eq!(path.first(), Some(&source));
            prop_assert_eq!(path.last(), Some(&v));
            let total: f64 = path.windows(2).map(|w| weights[&(w[0], w[1])]).sum();
            prop_assert_eq!(total, sp.weight(v));
        }

        // No edge can improve a settled weight.
        for (u, v) in g.edges() {
            if sp.weight(u).is_finite() {
                prop_assert!(sp.weight(v) <= sp.weight(u) + weights[&(u, v)]);
            }
        }
    }
}
