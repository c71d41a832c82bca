//! Rewrite rules and the two shapes a rewrite set can take.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single rewrite rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRule {
    /// Source pattern (e.g., "/_axiom/logs").
    pub source: String,
    /// Destination URL or path.
    pub destination: String,
    /// `Some(false)` excludes the framework's base path from `source`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<bool>,
    /// Other rule attributes (`has`, `missing`, `locale`, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteRule {
    /// Create a new rewrite rule.
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            base_path: None,
            extra: Map::new(),
        }
    }

    /// Exclude the base path from matching.
    pub fn without_base_path(mut self) -> Self {
        self.base_path = Some(false);
        self
    }
}

/// Rewrites grouped by routing phase. Unknown phase keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhasedRewrites {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_files: Option<Vec<RouteRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_files: Option<Vec<RouteRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Vec<RouteRule>>,
}

/// A rewrite set: either a flat ordered list or a phased object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rewrites {
    List(Vec<RouteRule>),
    Phased(PhasedRewrites),
}

impl Default for Rewrites {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Rewrites {
    /// Append rules without discarding existing entries.
    ///
    /// A list gets them at the end; a phased set gets them at the end of
    /// `afterFiles`, which is created when absent. Other phases are untouched.
    pub fn merge(self, rules: Vec<RouteRule>) -> Rewrites {
        match self {
            Self::List(mut list) => {
                list.extend(rules);
                Self::List(list)
            }
            Self::Phased(mut phased) => {
                phased.after_files.get_or_insert_with(Vec::new).extend(rules);
                Self::Phased(phased)
            }
        }
    }

    /// Total number of rules across all phases.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All rules, in phase order for the phased shape.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &RouteRule> + '_> {
        match self {
            Self::List(list) => Box::new(list.iter()),
            Self::Phased(phased) => Box::new(
                [&phased.before_files, &phased.after_files, &phased.fallback]
                    .into_iter()
                    .flatten()
                    .flatten(),
            ),
        }
    }
}

/// Merge rules into an optional original set.
pub fn merge_rewrites(original: Option<Rewrites>, rules: Vec<RouteRule>) -> Rewrites {
    match original {
        Some(rewrites) => rewrites.merge(rules),
        None => Rewrites::List(rules),
    }
}
