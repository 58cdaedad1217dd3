//! Self-contained interactive HTML view of a graph (vis-network).

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use super::ensure_parent_dir;
use crate::config::Layout;
use crate::error::Result;
use crate::graph::{KnowledgeGraph, NodeKind};

const VIS_NETWORK_JS: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

/// Fill colour per node type.
pub fn kind_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Course => "#FFA726",
        NodeKind::Module => "#42A5F5",
        NodeKind::Trainer => "#66BB6A",
        NodeKind::Student => "#FF7043",
        NodeKind::Skill => "#AB47BC",
    }
}

fn vis_nodes(graph: &KnowledgeGraph, show_labels: bool) -> Value {
    let nodes: Vec<Value> = graph
        .nodes()
        .map(|n| {
            let label = if show_labels { n.name.as_str() } else { "" };
            json!({
                "id": n.name,
                "label": label,
                "title": format!("{} ({})", n.name, n.kind),
                "group": n.kind.as_str(),
                "color": kind_color(n.kind),
            })
        })
        .collect();
    Value::Array(nodes)
}

fn vis_edges(graph: &KnowledgeGraph, show_labels: bool) -> Value {
    let edges: Vec<Value> = graph
        .edges()
        .map(|e| {
            let label = if show_labels { e.relation.as_str() } else { "" };
            json!({
                "from": e.source,
                "to": e.target,
                "label": label,
                "title": e.relation.as_str(),
                "arrows": "to",
            })
        })
        .collect();
    Value::Array(edges)
}

fn vis_options(layout: Layout) -> Value {
    match layout {
        Layout::Force => json!({
            "physics": {
                "solver": "forceAtlas2Based",
                "stabilization": { "iterations": 200 }
            },
            "edges": { "font": { "size": 10, "align": "middle" } }
        }),
        Layout::Hierarchical => json!({
            "layout": {
                "hierarchical": { "direction": "LR", "sortMethod": "directed" }
            },
            "physics": false,
            "edges": { "font": { "size": 10, "align": "middle" } }
        }),
    }
}

/// JSON for inlining into a `<script>` block.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn legend() -> String {
    NodeKind::ALL
        .iter()
        .map(|&k| {
            format!(
                r#"<span class="legend-item"><span class="swatch" style="background:{}"></span>{}</span>"#,
                kind_color(k),
                k
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ")
}

/// Render the graph as a standalone HTML page.
pub fn render_html(graph: &KnowledgeGraph, layout: Layout, show_labels: bool) -> String {
    let nodes = script_json(&vis_nodes(graph, show_labels));
    let edges = script_json(&vis_edges(graph, show_labels));
    let options = script_json(&vis_options(layout));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Knowledge Graph</title>
  <script src="{script}"></script>
  <style>
    body {{ margin: 0; font-family: sans-serif; }}
    #summary {{ padding: 8px 12px; background: #f5f5f5; }}
    .legend-item {{ margin-right: 14px; }}
    .swatch {{ display: inline-block; width: 12px; height: 12px; margin-right: 4px; border-radius: 50%; }}
    #graph {{ width: 100%; height: calc(100vh - 40px); }}
  </style>
</head>
<body>
  <div id="summary">
    {node_count} nodes, {edge_count} edges &nbsp;
      {legend}
  </div>
  <div id="graph"></div>
  <script>
    const nodes = new vis.DataSet({nodes});
    const edges = new vis.DataSet({edges});
    const options = {options};
    new vis.Network(document.getElementById("graph"), {{ nodes, edges }}, options);
  </script>
</body>
</html>
"#,
        script = VIS_NETWORK_JS,
        node_count = graph.node_count(),
        edge_count = graph.edge_count(),
        legend = legend(),
        nodes = nodes,
        edges = edges,
        options = options,
    )
}

pub fn write_html(path: &Path, graph: &KnowledgeGraph, layout: Layout, show_labels: bool) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, render_html(graph, layout, show_labels))?;
    log::info!("Wrote graph view to {}", path.display());
    Ok(())
}
