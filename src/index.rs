//! Agent data build
//!
//! Aggregates the front matter of every discovered manifesto into
//! `manifesto-index.yaml` and `measurement-frameworks.yaml`, then copies the
//! hand-maintained files next to them. The output directory is wiped and
//! rebuilt on every run, so two builds over the same corpus produce the same
//! bytes.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::{Component, Path, PathBuf};

use crate::config::Config;
use crate::discover::{discover_manifestos, ManifestoSource};
use crate::frontmatter::{self, read_front_matter};

pub const MANIFESTO_INDEX_FILE: &str = "manifesto-index.yaml";
pub const MEASUREMENT_FRAMEWORKS_FILE: &str = "measurement-frameworks.yaml";
pub const DECISION_TREES_FILE: &str = "decision-trees.yaml";
pub const SEMANTIC_RELATIONSHIPS_FILE: &str = "semantic-relationships.yaml";

pub const SCHEMA_VERSION: &str = "1.1";
const CHANGELOG_FILE: &str = "CHANGELOG.md";
/// Top-level key shared by both documents; measurement ids sit beside it
const METADATA_KEY: &str = "metadata";

/// Error type for the build
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot scan corpus root {root}: {source}")]
    Discover {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("duplicate manifesto id '{id}' in {first} and {second}")]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("manifesto id '{id}' in {file} collides with the document metadata key")]
    ReservedId { id: String, file: PathBuf },
    #[error("refusing to wipe {output_dir}: it contains the corpus root")]
    UnsafeOutputDir { output_dir: PathBuf },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, BuildError>;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub schema_version: String,
    pub description: String,
}

impl DocumentMetadata {
    fn new(description: &str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            description: description.to_string(),
        }
    }
}

/// `manifesto-index.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestoIndex {
    pub metadata: DocumentMetadata,
    /// id -> front matter plus `file_path` and `changelog_path`
    pub manifestos: Mapping,
}

/// `measurement-frameworks.yaml`; one top-level key per manifesto id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementFrameworks {
    pub metadata: DocumentMetadata,
    #[serde(flatten)]
    pub frameworks: Mapping,
}

impl ManifestoIndex {
    pub fn load(path: &Path) -> Result<Self> {
        load_yaml(path)
    }

    pub fn get(&self, id: &str) -> Option<&Mapping> {
        self.manifestos.get(id).and_then(Value::as_mapping)
    }
}

impl MeasurementFrameworks {
    pub fn load(path: &Path) -> Result<Self> {
        load_yaml(path)
    }
}

/// Everything collected from the corpus, before anything is written
#[derive(Debug, Clone)]
pub struct Catalog {
    pub index: ManifestoIndex,
    pub measurements: MeasurementFrameworks,
    /// (id, source file) in index order
    pub entries: Vec<(String, PathBuf)>,
    /// Manifesto files without usable front matter or id
    pub skipped: Vec<PathBuf>,
}

/// What a build did
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub index_path: PathBuf,
    pub measurement_path: PathBuf,
    pub entries: Vec<(String, PathBuf)>,
    pub measurement_count: usize,
    pub skipped: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
    pub missing_manual: Vec<PathBuf>,
}

pub struct IndexBuilder {
    config: Config,
}

impl IndexBuilder {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Full rebuild of the output directory
    pub fn build(&self) -> Result<BuildReport> {
        let sources = self.discover()?;
        let catalog = self.collect(&sources)?;

        let output_dir = self.config.output_dir();
        self.recreate_output_dir(&output_dir)?;
        tracing::info!("Cleaned and created {}", output_dir.display());

        let index_path = output_dir.join(MANIFESTO_INDEX_FILE);
        write_yaml(&index_path, &catalog.index)?;
        tracing::info!("Generated {}", index_path.display());

        let measurement_path = output_dir.join(MEASUREMENT_FRAMEWORKS_FILE);
        write_yaml(&measurement_path, &catalog.measurements)?;
        tracing::info!("Generated {}", measurement_path.display());

        let (copied, missing_manual) = self.copy_manual_files(&output_dir)?;

        Ok(BuildReport {
            output_dir,
            index_path,
            measurement_path,
            measurement_count: catalog.measurements.frameworks.len(),
            entries: catalog.entries,
            skipped: catalog.skipped,
            copied,
            missing_manual,
        })
    }

    pub fn discover(&self) -> Result<Vec<ManifestoSource>> {
        discover_manifestos(&self.config).map_err(|source| BuildError::Discover {
            root: self.config.root().to_path_buf(),
            source,
        })
    }

    /// Parse every source into the two documents. Nothing touches the disk
    /// besides reading the manifestos.
    pub fn collect(&self, sources: &[ManifestoSource]) -> Result<Catalog> {
        let corpus_name = corpus_dir_name(self.config.root());

        let mut manifestos = Mapping::new();
        let mut frameworks = Mapping::new();
        let mut entries: Vec<(String, PathBuf)> = Vec::new();
        let mut skipped = Vec::new();

        for source in sources {
            let Some(mut front_matter) = read_front_matter(&source.file) else {
                tracing::warn!("No valid front matter found in {}", source.file.display());
                skipped.push(source.file.clone());
                continue;
            };
            let Some(id) = front_matter.get("id").and_then(frontmatter::scalar_to_string) else {
                tracing::warn!("No manifesto id in front matter of {}", source.file.display());
                skipped.push(source.file.clone());
                continue;
            };

            if let Some((_, first)) = entries.iter().find(|(existing, _)| *existing == id) {
                return Err(BuildError::DuplicateId {
                    id,
                    first: first.clone(),
                    second: source.file.clone(),
                });
            }

            if let Some(measurement) = front_matter.get("measurement") {
                if id == METADATA_KEY {
                    return Err(BuildError::ReservedId {
                        id,
                        file: source.file.clone(),
                    });
                }
                frameworks.insert(Value::String(id.clone()), measurement.clone());
            }

            let file_path = self.relative_path(&corpus_name, &source.file);
            let changelog_path = self.relative_path(
                &corpus_name,
                &source
                    .file
                    .parent()
                    .unwrap_or(source.dir.as_path())
                    .join(CHANGELOG_FILE),
            );
            front_matter.insert("file_path".into(), Value::String(file_path));
            front_matter.insert("changelog_path".into(), Value::String(changelog_path));

            manifestos.insert(Value::String(id.clone()), Value::Mapping(front_matter));
            entries.push((id, source.file.clone()));
        }

        Ok(Catalog {
            index: ManifestoIndex {
                metadata: DocumentMetadata::new(
                    "Index of all manifestos with metadata for AI agent consumption.",
                ),
                manifestos,
            },
            measurements: MeasurementFrameworks {
                metadata: DocumentMetadata::new(
                    "Quantifiable metrics, KPIs, and success criteria for all manifestos.",
                ),
                frameworks,
            },
            entries,
            skipped,
        })
    }

    /// Copy the manually maintained files; a missing one is only a warning.
    /// Returns (copied destinations, missing sources).
    pub fn copy_manual_files(&self, output_dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
        let manual_dir = self.config.manual_dir();
        let mut copied = Vec::new();
        let mut missing = Vec::new();

        for name in &self.config.discovery.manual_files {
            let source = manual_dir.join(name);
            let dest = output_dir.join(name);
            if source.is_file() {
                std::fs::copy(&source, &dest).map_err(io_err(&source))?;
                tracing::info!("Copied manual file {}", name);
                copied.push(dest);
            } else {
                tracing::warn!("Manual file {} not found at {}", name, source.display());
                missing.push(source);
            }
        }

        Ok((copied, missing))
    }

    fn recreate_output_dir(&self, output_dir: &Path) -> Result<()> {
        if output_dir.exists() {
            let root = self.config.root().canonicalize().map_err(io_err(self.config.root()))?;
            let out = output_dir.canonicalize().map_err(io_err(output_dir))?;
            if root.starts_with(&out) {
                return Err(BuildError::UnsafeOutputDir {
                    output_dir: output_dir.to_path_buf(),
                });
            }
            std::fs::remove_dir_all(output_dir).map_err(io_err(output_dir))?;
        }
        std::fs::create_dir_all(output_dir).map_err(io_err(output_dir))
    }

    /// `<corpus dir name>/<path under root>` with `/` separators
    fn relative_path(&self, corpus_name: &str, path: &Path) -> String {
        let under_root = path.strip_prefix(self.config.root()).unwrap_or(path);
        let mut parts: Vec<String> = Vec::new();
        if !corpus_name.is_empty() {
            parts.push(corpus_name.to_string());
        }
        parts.extend(under_root.components().filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        }));
        parts.join("/")
    }
}

/// Name of the corpus directory itself, resolving `.` and friends
fn corpus_dir_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(value).map_err(|source| BuildError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, yaml).map_err(io_err(path))
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(io_err(path))?;
    serde_yaml::from_str(&contents).map_err(|source| BuildError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
