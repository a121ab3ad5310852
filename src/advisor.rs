//! Decision-tree advisor for the command line
//!
//! Non-interactive: `--priority <label>` prints the matching rule.
//! Interactive: a numbered menu of every rule's priority, one answer read
//! from the input, no retry on a bad answer.

use colored::Colorize;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::decision_tree::{display_name, DecisionTree, DecisionTreeError, Rule};
use crate::index::DECISION_TREES_FILE;

/// Priority labels accepted by `--priority`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Priority {
    SafetyCriticalSystem,
    SecuritySensitive,
    PerformanceCritical,
    RapidPrototyping,
    LongTermMaintainability,
    TeamScaling,
    AccessibilityRequired,
    RegulatoryCompliance,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::SafetyCriticalSystem => "safety-critical-system",
            Priority::SecuritySensitive => "security-sensitive",
            Priority::PerformanceCritical => "performance-critical",
            Priority::RapidPrototyping => "rapid-prototyping",
            Priority::LongTermMaintainability => "long-term-maintainability",
            Priority::TeamScaling => "team-scaling",
            Priority::AccessibilityRequired => "accessibility-required",
            Priority::RegulatoryCompliance => "regulatory-compliance",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("{0}\nPlease run 'manifesto build' first.")]
    MissingData(#[source] DecisionTreeError),
    #[error(transparent)]
    Tree(DecisionTreeError),
    #[error("No recommendation found for priority '{0}'. The decision tree has no rule for it.")]
    UnknownPriority(String),
    #[error("The decision tree is empty.")]
    EmptyTree,
    #[error("Invalid input. Please enter a number.")]
    InvalidNumber,
    #[error("Invalid selection. Please choose a number between 1 and {max}.")]
    OutOfRange { selection: usize, max: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Load `decision-trees.yaml` from an agent data directory.
pub fn load_decision_tree(data_dir: &Path) -> Result<DecisionTree> {
    let path = decision_tree_path(data_dir);
    DecisionTree::load(&path).map_err(|e| match e {
        DecisionTreeError::NotFound { .. } => AdvisorError::MissingData(e),
        other => AdvisorError::Tree(other),
    })
}

pub fn decision_tree_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DECISION_TREES_FILE)
}

/// A rule resolved for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub priority: String,
    pub primary: String,
    pub secondary: Vec<String>,
    pub rationale: String,
}

impl From<&Rule> for Recommendation {
    fn from(rule: &Rule) -> Self {
        Self {
            priority: rule.condition.value.clone(),
            primary: display_name(&rule.primary),
            secondary: rule.secondary.iter().map(|id| display_name(id)).collect(),
            rationale: rule.rationale.trim().to_string(),
        }
    }
}

impl Recommendation {
    /// Colored block for the terminal
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "\n{} {}\n",
            "Recommendation for".bold(),
            self.priority.cyan().bold()
        ));
        out.push_str(&format!("{}\n", "─".repeat(50)));
        out.push_str(&format!(
            "{} {}\n",
            "Primary manifesto:".bold(),
            self.primary.green().bold()
        ));
        if !self.secondary.is_empty() {
            out.push_str(&format!("{}\n", "Also consider:".bold()));
            for name in &self.secondary {
                out.push_str(&format!("  - {}\n", name.yellow()));
            }
        }
        if !self.rationale.is_empty() {
            out.push_str(&format!("{}\n", "Rationale:".bold()));
            out.push_str(&format!("  {}\n", self.rationale));
        }
        out
    }
}

pub struct Advisor {
    tree: DecisionTree,
}

impl Advisor {
    pub fn new(tree: DecisionTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Exact match on the rule's condition value
    pub fn recommend(&self, priority: &str) -> Result<Recommendation> {
        self.tree
            .find(priority)
            .map(Recommendation::from)
            .ok_or_else(|| AdvisorError::UnknownPriority(priority.to_string()))
    }

    /// Show the menu on `output`, read one selection from `input`.
    pub fn prompt<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<Recommendation> {
        if self.tree.is_empty() {
            return Err(AdvisorError::EmptyTree);
        }

        writeln!(output, "{}", "What is your team's primary priority?".bold())?;
        for (i, priority) in self.tree.priorities().iter().enumerate() {
            writeln!(output, "  {}. {}", i + 1, priority)?;
        }
        write!(output, "Enter the number of your choice: ")?;
        output.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let number = parse_selection(&line, self.tree.len())?;

        self.tree
            .select(number)
            .map(Recommendation::from)
            .ok_or(AdvisorError::OutOfRange {
                selection: number,
                max: self.tree.len(),
            })
    }
}

/// Parse a 1-based menu answer
pub fn parse_selection(line: &str, max: usize) -> Result<usize> {
    let line = line.trim();
    let selection: usize = match line.parse() {
        Ok(selection) => selection,
        // All digits but too large for usize
        Err(_) if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) => usize::MAX,
        Err(_) => return Err(AdvisorError::InvalidNumber),
    };
    if selection == 0 || selection > max {
        return Err(AdvisorError::OutOfRange { selection, max });
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision_tree::Condition;
    use clap::ValueEnum;

    fn single_rule_tree() -> DecisionTree {
        DecisionTree::new(vec![Rule {
            condition: Condition {
                field: Some("priority".to_string()),
                value: "safety-critical-system".to_string(),
            },
            primary: "formal-verification".to_string(),
            secondary: vec!["security-hardening".to_string()],
            rationale: "Bugs here hurt people.".to_string(),
        }])
    }

    fn prompt_with(input: &str) -> (Result<Recommendation>, String) {
        let advisor = Advisor::new(single_rule_tree());
        let mut out = Vec::new();
        let result = advisor.prompt(input.as_bytes(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn recommend_by_priority() {
        let advisor = Advisor::new(single_rule_tree());
        let rec = advisor.recommend("safety-critical-system").unwrap();
        assert_eq!(rec.primary, "Formal Verification");
        assert_eq!(rec.secondary, vec!["Security Hardening"]);

        let rendered = rec.render();
        assert!(rendered.contains("Formal Verification"));
        assert!(rendered.contains("Security Hardening"));
        assert!(rendered.contains("Bugs here hurt people."));
    }

    #[test]
    fn unmatched_priority_is_an_error() {
        let advisor = Advisor::new(single_rule_tree());
        let err = advisor.recommend("rapid-prototyping").unwrap_err();
        assert!(matches!(err, AdvisorError::UnknownPriority(ref p) if p == "rapid-prototyping"));
    }

    #[test]
    fn interactive_selects_sole_rule() {
        let (result, menu) = prompt_with("1\n");
        assert_eq!(result.unwrap().primary, "Formal Verification");
        assert!(menu.contains("1. safety-critical-system"));
    }

    #[test]
    fn interactive_rejects_out_of_range() {
        for input in ["0\n", "99\n", "99999999999999999999\n"] {
            let (result, _) = prompt_with(input);
            assert!(
                matches!(result, Err(AdvisorError::OutOfRange { max: 1, .. })),
                "input {input:?} should be out of range"
            );
        }
    }

    #[test]
    fn interactive_rejects_non_numeric() {
        for input in ["abc\n", "\n", "-1\n", "1.5\n", ""] {
            let (result, _) = prompt_with(input);
            assert!(
                matches!(result, Err(AdvisorError::InvalidNumber)),
                "input {input:?} should be invalid"
            );
        }
    }

    #[test]
    fn interactive_on_empty_tree() {
        let advisor = Advisor::new(DecisionTree::default());
        let result = advisor.prompt("1\n".as_bytes(), Vec::new());
        assert!(matches!(result, Err(AdvisorError::EmptyTree)));
    }

    #[test]
    fn oversized_selection_is_out_of_range() {
        assert!(matches!(
            parse_selection("99999999999999999999", 3),
            Err(AdvisorError::OutOfRange { max: 3, .. })
        ));
    }

    #[test]
    fn selection_tolerates_whitespace() {
        assert_eq!(parse_selection("  2 \r\n", 3).unwrap(), 2);
    }

    #[test]
    fn missing_data_mentions_build() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = load_decision_tree(temp.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Required data file not found"));
        assert!(message.contains("manifesto build"));
    }

    #[test]
    fn priority_labels_match_cli_names() {
        for priority in Priority::value_variants() {
            let name = priority.to_possible_value().unwrap();
            assert_eq!(name.get_name(), priority.as_str());
        }
    }
}
