//! Decision tree rules
//!
//! `decision-trees.yaml` is authored by hand and copied into the agent data
//! directory by the build. It is either a bare list of rules or a mapping
//! with a `rules` list:
//!
//! ```yaml
//! rules:
//!   - condition:
//!       field: priority
//!       value: safety-critical-system
//!     primary: formal-verification
//!     secondary: [security-hardening]
//!     rationale: Correctness must be provable.
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DecisionTreeError {
    #[error("Required data file not found at {path}")]
    NotFound { path: PathBuf },
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid decision tree {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, DecisionTreeError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Priority label matched exactly
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub condition: Condition,
    /// Recommended manifesto id
    pub primary: String,
    /// Alternative manifesto ids
    #[serde(default)]
    pub secondary: Vec<String>,
    #[serde(default)]
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionTree {
    pub rules: Vec<Rule>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Rules(Vec<Rule>),
    Wrapped { rules: Vec<Rule> },
}

impl DecisionTree {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DecisionTreeError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|source| DecisionTreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| DecisionTreeError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let rules = match serde_yaml::from_str::<Document>(yaml)? {
            Document::Rules(rules) | Document::Wrapped { rules } => rules,
        };
        Ok(Self { rules })
    }

    /// First rule whose condition value equals `priority`
    pub fn find(&self, priority: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.condition.value == priority)
    }

    /// Condition values in rule order
    pub fn priorities(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.condition.value.as_str()).collect()
    }

    /// Rule by 1-based menu number
    pub fn select(&self, number: usize) -> Option<&Rule> {
        number.checked_sub(1).and_then(|i| self.rules.get(i))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// `formal-verification` -> `Formal Verification`
pub fn display_name(id: &str) -> String {
    id.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
