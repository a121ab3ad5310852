//! manifesto-agents - Agent data and adoption advice for manifesto corpora
//!
//! A manifesto corpus is a directory with one subdirectory per coding
//! priority, each holding a Markdown guideline whose YAML front matter
//! describes it. This crate turns that corpus into machine-readable agent
//! data and helps a team pick the manifesto to adopt.
//!
//! # Artifacts
//!
//! | File | Source |
//! |------|--------|
//! | `manifesto-index.yaml` | every manifesto's front matter, keyed by `id` |
//! | `measurement-frameworks.yaml` | the `measurement` block of each manifesto |
//! | `decision-trees.yaml` | copied from the manual data directory |
//! | `semantic-relationships.yaml` | copied from the manual data directory |
//!
//! # Quick Start
//!
//! ```no_run
//! use manifesto_agents::{Advisor, Config, IndexBuilder};
//!
//! let config = Config::load();
//! let report = IndexBuilder::new(config.clone()).build().unwrap();
//! println!("Indexed {} manifestos", report.entries.len());
//!
//! let tree = manifesto_agents::advisor::load_decision_tree(&config.output_dir()).unwrap();
//! let advisor = Advisor::new(tree);
//! let rec = advisor.recommend("safety-critical-system").unwrap();
//! print!("{}", rec.render());
//! ```

pub mod advisor;
pub mod config;
pub mod decision_tree;
pub mod discover;
pub mod frontmatter;
pub mod index;
pub mod llm;
pub mod tui;

pub use advisor::{Advisor, AdvisorError, Priority, Recommendation};
pub use config::Config;
pub use decision_tree::{DecisionTree, Rule};
pub use discover::{discover_manifestos, find_manifesto_file, ManifestoSource};
pub use frontmatter::{parse_front_matter, read_front_matter};
pub use index::{BuildError, BuildReport, IndexBuilder, ManifestoIndex, MeasurementFrameworks};
pub use llm::{CompletionClient, CompletionError, GeminiClient};
