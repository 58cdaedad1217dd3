use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::CourseGraphError;
use crate::graph::NodeKind;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "COURSEGRAPH_CONFIG";

/// Config file used when `COURSEGRAPH_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "coursegraph.toml";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourcesConfig::default(),
            inference: InferenceConfig::default(),
            filter: FilterConfig::default(),
            output: OutputConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Locations of the four record sources
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_courses")]
    pub courses: PathBuf,
    #[serde(default = "default_trainers")]
    pub trainers: PathBuf,
    #[serde(default = "default_students")]
    pub students: PathBuf,
    #[serde(default = "default_trainer_skills")]
    pub trainer_skills: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            courses: default_courses(),
            trainers: default_trainers(),
            students: default_students(),
            trainer_skills: default_trainer_skills(),
        }
    }
}

fn default_courses() -> PathBuf {
    PathBuf::from("data/output/courses_and_modules.csv")
}

fn default_trainers() -> PathBuf {
    PathBuf::from("data/trainers.csv")
}

fn default_students() -> PathBuf {
    PathBuf::from("data/students.csv")
}

fn default_trainer_skills() -> PathBuf {
    PathBuf::from("data/output/trainer_skills.csv")
}

/// Which containment test links skills to course content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// Plain case-insensitive substring containment
    #[default]
    Substring,
    /// Containment bounded by non-alphanumeric characters
    WordBoundary,
}

/// Relationship inference configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InferenceConfig {
    #[serde(default)]
    pub matcher: MatcherKind,
    /// Skills shorter than this never match. 0 disables the check.
    #[serde(default)]
    pub min_token_len: usize,
}

/// Default subgraph query settings
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_node_types")]
    pub node_types: Vec<NodeKind>,
    #[serde(default = "default_hops")]
    pub hops: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            node_types: default_node_types(),
            hops: default_hops(),
        }
    }
}

fn default_node_types() -> Vec<NodeKind> {
    NodeKind::ALL.to_vec()
}

fn default_hops() -> usize {
    2
}

/// Rendering layout for the HTML artifact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Force,
    Hierarchical,
}

impl FromStr for Layout {
    type Err = CourseGraphError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "force" => Ok(Layout::Force),
            "hierarchical" => Ok(Layout::Hierarchical),
            other => Err(CourseGraphError::Parse(format!("Unknown layout: {}", other))),
        }
    }
}

/// Output artifact locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,
    #[serde(default = "default_html")]
    pub html: PathBuf,
    #[serde(default)]
    pub nodes_csv: Option<PathBuf>,
    #[serde(default)]
    pub edges_csv: Option<PathBuf>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default = "default_show_labels")]
    pub show_labels: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
            html: default_html(),
            nodes_csv: None,
            edges_csv: None,
            layout: Layout::default(),
            show_labels: default_show_labels(),
        }
    }
}

fn default_snapshot() -> PathBuf {
    PathBuf::from("data/output/knowledge_graph.json")
}

fn default_html() -> PathBuf {
    PathBuf::from("data/output/kg_result.html")
}

fn default_show_labels() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in COURSEGRAPH_CONFIG environment variable (must exist)
    /// 2. ./coursegraph.toml in current directory (built-in defaults if absent)
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    log::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Config::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a specific config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Missing sources are fine (they read as empty); directories are not.
        for (key, path) in [
            ("sources.courses", &self.sources.courses),
            ("sources.trainers", &self.sources.trainers),
            ("sources.students", &self.sources.students),
            ("sources.trainer_skills", &self.sources.trainer_skills),
        ] {
            if path.is_dir() {
                anyhow::bail!(
                    "{} must be a CSV file, not a directory: {}",
                    key,
                    path.display()
                );
            }
        }

        if self.output.snapshot.as_os_str().is_empty() {
            anyhow::bail!("output.snapshot must not be empty");
        }

        if self.output.html.as_os_str().is_empty() {
            anyhow::bail!("output.html must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn with_config_env(value: Option<&Path>, f: impl FnOnce()) {
        let original = std::env::var(CONFIG_ENV).ok();
        match value {
            Some(p) => std::env::set_var(CONFIG_ENV, p),
            None => std::env::remove_var(CONFIG_ENV),
        }
        f();
        match original {
            Some(v) => std::env::set_var(CONFIG_ENV, v),
            None => std::env::remove_var(CONFIG_ENV),
        }
    }

    #[test]
    fn test_defaults_match_documented_paths() {
        let config = Config::default();
        assert_eq!(
            config.sources.courses,
            PathBuf::from("data/output/courses_and_modules.csv")
        );
        assert_eq!(config.sources.trainers, PathBuf::from("data/trainers.csv"));
        assert_eq!(config.inference.matcher, MatcherKind::Substring);
        assert_eq!(config.inference.min_token_len, 0);
        assert_eq!(config.filter.hops, 2);
        assert_eq!(config.filter.node_types.len(), 5);
        assert!(config.output.show_labels);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("coursegraph.toml");
        fs::write(
            &path,
            r#"
log_level = "debug"

[inference]
matcher = "word_boundary"
min_token_len = 3

[filter]
node_types = ["Course", "Module"]
hops = 1

[output]
layout = "hierarchical"
nodes_csv = "out/nodes.csv"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.inference.matcher, MatcherKind::WordBoundary);
        assert_eq!(config.inference.min_token_len, 3);
        assert_eq!(config.filter.node_types, vec![NodeKind::Course, NodeKind::Module]);
        assert_eq!(config.filter.hops, 1);
        assert_eq!(config.output.layout, Layout::Hierarchical);
        assert_eq!(config.output.nodes_csv, Some(PathBuf::from("out/nodes.csv")));
        assert_eq!(config.sources.students, PathBuf::from("data/students.csv"));
    }

    #[test]
    fn test_source_directory_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("coursegraph.toml");
        let dir = temp_dir.path().to_str().unwrap().replace('\\', "\\\\");
        fs::write(&path, format!("[sources]\ncourses = \"{}\"\n", dir)).unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("sources.courses"));
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("Hierarchical".parse::<Layout>().unwrap(), Layout::Hierarchical);
        assert_eq!("force".parse::<Layout>().unwrap(), Layout::Force);
        assert!("circular".parse::<Layout>().is_err());
    }

    #[test]
    fn test_unknown_matcher_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("coursegraph.toml");
        fs::write(&path, "[inference]\nmatcher = \"fuzzy\"\n").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_config_env_path_loaded() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "[filter]\nhops = 3\n").unwrap();

        with_config_env(Some(&path), || {
            let config = Config::load().unwrap();
            assert_eq!(config.filter.hops, 3);
        });
    }

    #[test]
    fn test_config_invalid_env_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env(Some(Path::new("nonexistent.toml")), || {
            assert!(Config::load().is_err());
        });
    }
}
