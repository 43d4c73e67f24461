//! Prioritized rule tables
//!
//! Every classification decision is a [`RuleSet`]: an ordered list of
//! `(indicator, outcome)` pairs where the first matching rule wins. Keeping the
//! precedence in data makes each table auditable and testable on its own.

use regex::Regex;
use std::collections::BTreeMap;

use crate::scanner::{ArtifactSet, ScannedArtifact};

/// Source extensions of JVM languages
pub const JVM_SOURCES: &[&str] = &["java", "kt"];
/// Source extensions of JavaScript and TypeScript
pub const JS_SOURCES: &[&str] = &["js", "jsx", "ts", "tsx"];
/// Python source extension
pub const PY_SOURCES: &[&str] = &["py"];
/// Go source extension
pub const GO_SOURCES: &[&str] = &["go"];
/// Rust source extension
pub const RS_SOURCES: &[&str] = &["rs"];

/// Scanned artifacts prepared for rule evaluation
///
/// Lowercased contents are computed once so case-insensitive rules do not
/// re-fold the same text for every needle.
pub struct Evidence<'a> {
    artifacts: &'a ArtifactSet,
    lowered: BTreeMap<&'a str, String>,
}

impl<'a> Evidence<'a> {
    /// Prepare an artifact set
    pub fn new(artifacts: &'a ArtifactSet) -> Self {
        let lowered = artifacts
            .iter()
            .map(|a| (a.path.as_str(), a.content.to_lowercase()))
            .collect();
        Self { artifacts, lowered }
    }

    /// Underlying artifacts
    pub fn artifacts(&self) -> &'a ArtifactSet {
        self.artifacts
    }

    fn lowered(&self, artifact: &ScannedArtifact) -> &str {
        self.lowered
            .get(artifact.path.as_str())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Whether a file was read at `path`
    pub fn has_file(&self, path: &str) -> bool {
        self.artifacts.contains(path)
    }

    /// Whether the file at `path` contains `needle`, ignoring case
    pub fn file_contains(&self, path: &str, needle: &str) -> bool {
        self.artifacts
            .get(path)
            .map(|a| self.lowered(a).contains(&needle.to_lowercase()))
            .unwrap_or(false)
    }

    /// Whether any config artifact contains `needle`, ignoring case
    pub fn config_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.artifacts
            .configs()
            .any(|a| self.lowered(a).contains(&needle))
    }

    /// Whether any config artifact matches `pattern`
    pub fn config_matches(&self, pattern: &Regex) -> bool {
        self.artifacts.configs().any(|a| pattern.is_match(&a.content))
    }

    /// Whether any source artifact with one of `extensions` contains `needle` verbatim
    pub fn source_contains(&self, extensions: &[&str], needle: &str) -> bool {
        self.artifacts.sources().any(|a| {
            a.extension()
                .is_some_and(|ext| extensions.contains(&ext.as_str()))
                && a.content.contains(needle)
        })
    }

    /// Whether any artifact of any kind contains `needle`, ignoring case
    pub fn any_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.artifacts
            .iter()
            .any(|a| self.lowered(a).contains(&needle))
    }
}

/// Predicate over scanned evidence
#[derive(Debug, Clone)]
pub enum Indicator {
    /// A root-relative file was read
    FilePresent(&'static str),
    /// The file at a root-relative path contains the needle (case-insensitive)
    FileContains(&'static str, &'static str),
    /// Any config artifact contains the needle (case-insensitive)
    ConfigContains(&'static str),
    /// Any config artifact matches the pattern
    ConfigMatches(Regex),
    /// Any sampled source with one of the extensions contains the needle (case-sensitive)
    SourceContains(&'static [&'static str], &'static str),
    /// Any artifact contains the needle (case-insensitive)
    AnyContains(&'static str),
    /// At least one nested indicator holds
    AnyOf(Vec<Indicator>),
}

impl Indicator {
    /// Evaluate against prepared evidence
    pub fn holds(&self, evidence: &Evidence<'_>) -> bool {
        match self {
            Self::FilePresent(path) => evidence.has_file(path),
            Self::FileContains(path, needle) => evidence.file_contains(path, needle),
            Self::ConfigContains(needle) => evidence.config_contains(needle),
            Self::ConfigMatches(pattern) => evidence.config_matches(pattern),
            Self::SourceContains(extensions, needle) => {
                evidence.source_contains(extensions, needle)
            }
            Self::AnyContains(needle) => evidence.any_contains(needle),
            Self::AnyOf(indicators) => indicators.iter().any(|i| i.holds(evidence)),
        }
    }
}

/// One `(predicate, result)` entry
#[derive(Debug, Clone)]
pub struct Rule<T> {
    /// Short description used in logs and tests
    pub name: &'static str,
    pub indicator: Indicator,
    pub outcome: T,
}

impl<T> Rule<T> {
    /// Create a new rule
    pub fn new(name: &'static str, indicator: Indicator, outcome: T) -> Self {
        Self {
            name,
            indicator,
            outcome,
        }
    }
}

/// Ordered rule list, most specific first
#[derive(Debug, Clone)]
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
}

impl<T> RuleSet<T> {
    /// Create a rule set; order is precedence
    pub fn new(rules: Vec<Rule<T>>) -> Self {
        Self { rules }
    }

    /// An empty rule set, which never matches
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// First rule whose indicator holds
    pub fn first_match(&self, evidence: &Evidence<'_>) -> Option<&Rule<T>> {
        self.rules.iter().find(|rule| rule.indicator.holds(evidence))
    }

    /// Every rule whose indicator holds, in table order
    pub fn all_matches<'s>(&'s self, evidence: &Evidence<'_>) -> Vec<&'s Rule<T>> {
        self.rules
            .iter()
            .filter(|rule| rule.indicator.holds(evidence))
            .collect()
    }

    /// Rules in precedence order
    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    /// Rule names in precedence order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
