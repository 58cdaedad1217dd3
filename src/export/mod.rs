//! Export adapters: node/edge tables, JSON snapshots and an HTML view.
//!
//! These only read a [`KnowledgeGraph`](crate::graph::KnowledgeGraph); none of
//! them feed back into building or filtering.

pub mod html;
pub mod snapshot;
pub mod tables;

pub use html::{render_html, write_html};
pub use snapshot::{load_snapshot, save_snapshot, GraphSnapshot, SNAPSHOT_VERSION};
pub use tables::{edge_table, node_table, write_edges_csv, write_nodes_csv, EdgeRow, NodeRow};

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Create the parent directory of an output artifact if it is missing.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
