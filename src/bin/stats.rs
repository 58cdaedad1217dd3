use anyhow::Result;
use clap::Parser;
use coursegraph::export::load_snapshot;
use coursegraph::{Config, KnowledgeGraph, NodeKind, Relation};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "graph-stats")]
#[command(about = "Print node, edge and degree statistics for a saved graph snapshot")]
struct Args {
    /// Snapshot to inspect (defaults to the configured output)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// How many of the most connected nodes to list
    #[arg(short, long, default_value_t = 10)]
    top: usize,
}

/// Nodes ordered by total degree, highest first; ties keep insertion order.
fn top_by_degree(graph: &KnowledgeGraph, n: usize) -> Vec<(String, NodeKind, usize)> {
    let mut ranked: Vec<_> = graph
        .nodes()
        .map(|node| (node.name.clone(), node.kind, graph.degree(&node.name)))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2));
    ranked.truncate(n);
    ranked
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let path = match args.snapshot {
        Some(path) => path,
        None => Config::load()?.output.snapshot,
    };
    let graph = load_snapshot(&path)?;

    println!("\n=== Knowledge Graph Statistics ===\n");
    println!("Snapshot: {}", path.display());

    if graph.is_empty() {
        println!("The snapshot contains no nodes.");
        println!("\nRun coursegraph with some record sources to build one.");
        return Ok(());
    }

    let by_kind = graph.count_by_kind();
    println!("\nNodes by Type:\n");
    println!("{:-<40}", "");
    println!("{:<20} {:>10}", "Type", "Count");
    println!("{:-<40}", "");
    for kind in NodeKind::ALL {
        println!("{:<20} {:>10}", kind, by_kind.get(&kind).copied().unwrap_or(0));
    }
    println!("{:-<40}", "");
    println!("{:<20} {:>10}", "Total", graph.node_count());

    let by_relation = graph.count_by_relation();
    println!("\nEdges by Relation:\n");
    println!("{:-<40}", "");
    println!("{:<20} {:>10}", "Relation", "Count");
    println!("{:-<40}", "");
    for relation in Relation::ALL {
        println!("{:<20} {:>10}", relation, by_relation.get(&relation).copied().unwrap_or(0));
    }
    println!("{:-<40}", "");
    println!("{:<20} {:>10}", "Total", graph.edge_count());

    let isolated = graph.nodes().filter(|n| graph.degree(&n.name) == 0).count();
    println!("\nIsolated nodes: {}", isolated);

    let top = top_by_degree(&graph, args.top);
    if !top.is_empty() {
        println!("\nMost Connected Nodes:\n");
        println!("{:-<60}", "");
        println!("{:<36} {:<12} {:>8}", "Node", "Type", "Degree");
        println!("{:-<60}", "");
        for (name, kind, degree) in &top {
            println!("{:<36} {:<12} {:>8}", name, kind, degree);
        }
        println!("{:-<60}", "");
    }

    println!();

    Ok(())
}
