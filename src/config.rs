//! Configuration file support for manifesto-agents
//!
//! Reads from .manifesto/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the config file, relative to the corpus root
pub const CONFIG_DIR: &str = ".manifesto";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Where the corpus, the generated data and the manual data live
    #[serde(default)]
    pub paths: PathsConfig,

    /// Which directories and files count as manifestos
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Generative-text advisor settings
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

/// Filesystem layout. Relative paths resolve against `root`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    /// Corpus root containing one subdirectory per manifesto
    /// Default: "."
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Generated agent data, wiped on every build
    /// Default: "dist/agents"
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Hand-maintained agent data copied into `output_dir`
    /// Default: ".agents_manual"
    #[serde(default = "default_manual_dir")]
    pub manual_dir: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DiscoveryConfig {
    /// File name suffix that marks the canonical manifesto of a directory
    /// Default: "_MANIFESTO.md"
    #[serde(default = "default_manifesto_suffix")]
    pub manifesto_suffix: String,

    /// Top-level directories never scanned for manifestos (hidden ones are always skipped)
    /// Default: ["dist", "scripts", "integrations"]
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Manually maintained files copied verbatim into the output directory
    #[serde(default = "default_manual_files")]
    pub manual_files: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AdvisorConfig {
    /// Model name passed to the generateContent endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the generative language API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Maximum concern length in characters
    #[serde(default = "default_max_concern_chars")]
    pub max_concern_chars: usize,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist").join("agents")
}

fn default_manual_dir() -> PathBuf {
    PathBuf::from(".agents_manual")
}

fn default_manifesto_suffix() -> String {
    "_MANIFESTO.md".to_string()
}

fn default_exclude_dirs() -> Vec<String> {
    vec![
        "dist".to_string(),
        "scripts".to_string(),
        "integrations".to_string(),
    ]
}

fn default_manual_files() -> Vec<String> {
    vec![
        crate::index::DECISION_TREES_FILE.to_string(),
        crate::index::SEMANTIC_RELATIONSHIPS_FILE.to_string(),
    ]
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_max_concern_chars() -> usize {
    500
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            output_dir: default_output_dir(),
            manual_dir: default_manual_dir(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            manifesto_suffix: default_manifesto_suffix(),
            exclude_dirs: default_exclude_dirs(),
            manual_files: default_manual_files(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            api_base: default_api_base(),
            max_concern_chars: default_max_concern_chars(),
        }
    }
}

impl Config {
    /// Load config from .manifesto/config.toml
    ///
    /// Returns default config if no file is found. A config that exists but
    /// cannot be parsed is reported and the defaults are used instead.
    pub fn load() -> Self {
        let Some(path) = Self::find_config_path() else {
            return Self::default();
        };
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit file. A relative `paths.root` is taken
    /// relative to the directory containing `.manifesto/`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.paths.root.is_relative() {
            if let Some(base) = config_base_dir(path) {
                config.paths.root = base.join(&config.paths.root);
            }
        }
        Ok(config)
    }

    /// Find config.toml by walking up directory tree
    fn find_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(CONFIG_DIR).join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }

    /// Replace the corpus root, keeping the other paths relative to it
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.paths.root = root.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.paths.root
    }

    /// Generated agent data directory
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.output_dir)
    }

    /// Manually maintained agent data directory
    pub fn manual_dir(&self) -> PathBuf {
        self.resolve(&self.paths.manual_dir)
    }

    /// Check if a top-level directory name is excluded from discovery
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        name.starts_with('.') || self.discovery.exclude_dirs.iter().any(|d| d == name)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.paths.root.join(path)
        }
    }
}

/// `<base>/.manifesto/config.toml` -> `<base>`; any other location -> the file's directory
fn config_base_dir(path: &Path) -> Option<PathBuf> {
    let parent = path.parent()?;
    if parent.file_name().is_some_and(|n| n == CONFIG_DIR) {
        parent.parent().map(Path::to_path_buf)
    } else {
        Some(parent.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.root(), Path::new("."));
        assert_eq!(config.output_dir(), Path::new("./dist/agents"));
        assert_eq!(config.manual_dir(), Path::new("./.agents_manual"));
        assert_eq!(config.discovery.manifesto_suffix, "_MANIFESTO.md");
        assert_eq!(config.advisor.max_concern_chars, 500);
        assert_eq!(config.advisor.api_key_env, "GEMINI_API_KEY");
        assert_eq!(
            config.discovery.manual_files,
            vec!["decision-trees.yaml", "semantic-relationships.yaml"]
        );
    }

    #[test]
    fn test_excluded_dirs() {
        let config = Config::default();
        assert!(config.is_excluded_dir("dist"));
        assert!(config.is_excluded_dir("scripts"));
        assert!(config.is_excluded_dir("integrations"));
        assert!(config.is_excluded_dir(".git"));
        assert!(config.is_excluded_dir(".agents_manual"));
        assert!(!config.is_excluded_dir("security"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[paths]
output_dir = "build/data"

[discovery]
exclude_dirs = ["drafts"]

[advisor]
model = "gemini-1.5-flash"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.output_dir(), Path::new("./build/data"));
        assert!(config.is_excluded_dir("drafts"));
        assert!(!config.is_excluded_dir("dist"));
        assert_eq!(config.advisor.model, "gemini-1.5-flash");
        // Untouched sections keep defaults
        assert_eq!(config.discovery.manifesto_suffix, "_MANIFESTO.md");
        assert_eq!(config.advisor.max_concern_chars, 500);
    }

    #[test]
    fn test_from_file_resolves_root_against_config_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let config_dir = temp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join("config.toml");
        std::fs::write(&path, "[paths]\nroot = \"corpus\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.root(), temp.path().join("corpus"));
        assert_eq!(
            config.output_dir(),
            temp.path().join("corpus").join("dist").join("agents")
        );
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[paths\nroot = ").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_absolute_output_dir_is_kept() {
        let mut config = Config::default().with_root("/corpus");
        config.paths.output_dir = PathBuf::from("/tmp/agents");
        assert_eq!(config.output_dir(), Path::new("/tmp/agents"));
        assert_eq!(config.manual_dir(), Path::new("/corpus/.agents_manual"));
    }
}
