//! Headless run of the layout engine over a synthetic exploration graph.
//!
//! Run with: cargo run -p lit-graph-layout --example simple_layout

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use lit_graph_core::{Edge, EdgeType, Node, NodeType};
use lit_graph_layout::{LayoutConfig, LayoutEngine};

fn main() {
    tracing_subscriber::fmt::init();

    // One seed book, its authors at depth 1, their other books at depth 2.
    let mut nodes = vec![Node::new("seed", NodeType::Book, "Seed")];
    let mut edges = Vec::new();
    for a in 0..8 {
        let author = format!("author-{a}");
        nodes.push(Node::new(&author, NodeType::Author, &author).with_depth(1));
        edges.push(Edge::new(format!("s-{a}"), "seed", &author, EdgeType::WrittenBy));
        for b in 0..12 {
            let book = format!("book-{a}-{b}");
            nodes.push(Node::new(&book, NodeType::Book, &book).with_depth(2));
            edges.push(Edge::new(format!("w-{a}-{b}"), &book, &author, EdgeType::WrittenBy));
        }
    }

    println!("Laying out {} nodes and {} edges...", nodes.len(), edges.len());

    let mut engine = LayoutEngine::new(LayoutConfig {
        width: 1200.0,
        height: 900.0,
        cluster_by_type: true,
        ..LayoutConfig::default()
    });
    engine.initialize(nodes, edges);

    let settled = Rc::new(Cell::new(false));
    {
        let settled = Rc::clone(&settled);
        engine.on_end(move || settled.set(true));
    }

    let start = Instant::now();
    let steps = engine.run(2_000);
    let elapsed = start.elapsed();

    let (min_x, max_x, min_y, max_y) = engine.nodes().iter().filter_map(Node::position).fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), (x, y)| {
            (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
        },
    );

    println!(
        "{} ticks in {:?} ({:.1} µs/tick), settled: {}",
        steps,
        elapsed,
        elapsed.as_secs_f64() * 1e6 / steps.max(1) as f64,
        settled.get()
    );
    println!(
        "Bounds: x [{:.1}, {:.1}]  y [{:.1}, {:.1}]",
        min_x, max_x, min_y, max_y
    );
}
