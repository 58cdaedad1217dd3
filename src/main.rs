use anyhow::Result;
use clap::Parser;
use coursegraph::config::Layout;
use coursegraph::export::{save_snapshot, write_edges_csv, write_html, write_nodes_csv};
use coursegraph::{Config, GraphBuilder, GraphContext, NodeKind, SubgraphQuery};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "coursegraph")]
#[command(about = "Build the course knowledge graph and render a keyword-filtered view")]
struct Args {
    /// Courses and modules CSV (course_name, modules)
    #[arg(long)]
    courses: Option<PathBuf>,

    /// Explicit trainers CSV (trainer_name, teaches)
    #[arg(long)]
    trainers: Option<PathBuf>,

    /// Students CSV (student_name, enrolled)
    #[arg(long)]
    students: Option<PathBuf>,

    /// Trainer skills CSV (trainer_name, skills)
    #[arg(long)]
    skills: Option<PathBuf>,

    /// Case-insensitive keyword; empty keeps the whole graph
    #[arg(short, long, default_value = "")]
    keyword: String,

    /// Node types allowed as seeds, comma-separated
    #[arg(long, value_delimiter = ',')]
    types: Vec<NodeKind>,

    /// Neighbourhood expansion rounds around the seeds
    #[arg(long)]
    hops: Option<usize>,

    /// Where to save the full-graph snapshot
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Where to write the rendered HTML view
    #[arg(long)]
    html: Option<PathBuf>,

    /// Also write the filtered node table here
    #[arg(long)]
    nodes_csv: Option<PathBuf>,

    /// Also write the filtered edge table here
    #[arg(long)]
    edges_csv: Option<PathBuf>,

    /// force or hierarchical
    #[arg(long)]
    layout: Option<Layout>,

    /// Hide node and edge labels in the HTML view
    #[arg(long)]
    no_labels: bool,
}

impl Args {
    /// Command-line flags take precedence over the config file.
    fn apply(self, config: &mut Config) -> (String, Vec<NodeKind>) {
        if let Some(p) = self.courses {
            config.sources.courses = p;
        }
        if let Some(p) = self.trainers {
            config.sources.trainers = p;
        }
        if let Some(p) = self.students {
            config.sources.students = p;
        }
        if let Some(p) = self.skills {
            config.sources.trainer_skills = p;
        }
        if let Some(h) = self.hops {
            config.filter.hops = h;
        }
        if let Some(p) = self.snapshot {
            config.output.snapshot = p;
        }
        if let Some(p) = self.html {
            config.output.html = p;
        }
        if self.nodes_csv.is_some() {
            config.output.nodes_csv = self.nodes_csv;
        }
        if self.edges_csv.is_some() {
            config.output.edges_csv = self.edges_csv;
        }
        if let Some(layout) = self.layout {
            config.output.layout = layout;
        }
        if self.no_labels {
            config.output.show_labels = false;
        }

        let types = if self.types.is_empty() {
            config.filter.node_types.clone()
        } else {
            self.types
        };
        (self.keyword, types)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.log_level.as_str())
    ).init();

    let (keyword, types) = args.apply(&mut config);
    config.validate()?;

    let start = Instant::now();
    let builder = GraphBuilder::from_config(&config.inference);
    let ctx = GraphContext::build(&config.sources, &builder)?;
    let graph = ctx.graph();

    if !ctx.warnings().is_empty() {
        log::warn!("{} source warning(s) while loading records", ctx.warnings().len());
    }
    for collision in graph.collisions() {
        log::warn!(
            "'{}' was typed {} then {}; kept {}",
            collision.name,
            collision.previous,
            collision.current,
            collision.current
        );
    }
    log::debug!("Build took {:?}", start.elapsed());

    save_snapshot(&config.output.snapshot, graph)?;

    let query = SubgraphQuery::new(keyword, types, config.filter.hops);
    let filtered = ctx.filter(&query);
    if filtered.is_empty() {
        log::warn!("No nodes match keyword '{}'", query.keyword);
    }

    write_html(
        &config.output.html,
        &filtered,
        config.output.layout,
        config.output.show_labels,
    )?;
    if let Some(path) = &config.output.nodes_csv {
        write_nodes_csv(path, &filtered)?;
    }
    if let Some(path) = &config.output.edges_csv {
        write_edges_csv(path, &filtered)?;
    }

    println!(
        "Graph: {} nodes, {} edges | view: {} nodes, {} edges -> {}",
        graph.node_count(),
        graph.edge_count(),
        filtered.node_count(),
        filtered.edge_count(),
        config.output.html.display()
    );

    Ok(())
}
