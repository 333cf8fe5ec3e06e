use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ordo_graph::{BreadthFirst, DepthFirst, Graph, Heuristic, ShortestPaths, Vertex};

const SIDES: [usize; 3] = [16, 64, 128];

/// A `side` x `side` grid with edges to the right and down neighbors, both
/// directions.
fn grid(side: usize) -> Graph {
    let mut g = Graph::directed();
    for _ in 0..side * side {
        g.add();
    }
    for row in 0..side {
        for col in 0..side {
            let v = row * side + col + 1;
            if col + 1 < side {
                let _ = g.add_edge(v, v + 1);
                let _ = g.add_edge(v + 1, v);
            }
            if row + 1 < side {
                let _ = g.add_edge(v, v + side);
                let _ = g.add_edge(v + side, v);
            }
        }
    }
    g
}

const fn cell(side: usize, v: Vertex) -> (usize, usize) {
    ((v - 1) / side, (v - 1) % side)
}

#[allow(clippy::cast_precision_loss)]
fn manhattan(side: usize, a: Vertex, b: Vertex) -> f64 {
    let (ar, ac) = cell(side, a);
    let (br, bc) = cell(side, b);
    (ar.abs_diff(br) + ac.abs_diff(bc)) as f64
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search.grid");

    for side in SIDES {
        let g = grid(side);
        let far = side * side;
        group.throughput(Throughput::Elements(g.vertex_size() as u64));

        group.bench_with_input(BenchmarkId::new("bfs", side), &g, |b, g| {
            b.iter(|| {
                let mut bfs = BreadthFirst::new();
                bfs.traverse(g, 1, &mut ());
                black_box(bfs.mark(far))
            });
        });

        group.bench_with_input(BenchmarkId::new("dfs", side), &g, |b, g| {
            b.iter(|| {
                let mut dfs = DepthFirst::new();
                dfs.traverse(g, 1, &mut ());
                black_box(dfs.mark(far))
            });
        });

        group.bench_with_input(BenchmarkId::new("dijkstra", side), &g, |b, g| {
            b.iter(|| {
                let mut sp = ShortestPaths::dense(g, 1, |_: Vertex, _: Vertex| 1.0);
                let _ = sp.set_paths();
                black_box(sp.weight(far))
            });
        });

        group.bench_with_input(BenchmarkId::new("astar", side), &g, |b, g| {
            b.iter(|| {
                let weighting = Heuristic {
                    weights: |_: Vertex, _: Vertex| 1.0,
                    estimate: |v: Vertex| manhattan(side, v, far),
                };
                let mut sp = ShortestPaths::dense(g, 1, weighting).with_destination(far);
                let _ = sp.set_paths();
                black_box(sp.path_to_destination().map(|p| p.len()))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
