//! Rule lookup.
//!
//! # Responsibilities
//! - Store compiled rules in authoring order
//! - Look up the rule for a request path
//! - Return matched rule or explicit `NoRouteError`
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scan (acceptable for typical rule counts)
//! - Declaration order wins over specificity; shadowed rules are logged, not fixed

use thiserror::Error;

use crate::config::RuleConfig;
use crate::routing::rule::{Rule, RuleError};

/// No rule matches and no catch-all is configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route matches {path}")]
pub struct NoRouteError {
    pub path: String,
}

/// A rule that could not be compiled, with its position in the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule #{index} ({prefix}): {source}")]
pub struct RuleTableError {
    pub index: usize,
    pub prefix: String,
    #[source]
    pub source: RuleError,
}

/// A later rule that can never match because an earlier one claims all its paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shadowed {
    pub rule: usize,
    pub by: usize,
}

/// Ordered, immutable rule table.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    catch_all: Option<usize>,
}

impl RuleTable {
    /// Compile rules in the given order.
    pub fn new(rules: Vec<Rule>) -> Self {
        let catch_all = rules.iter().position(|r| r.matcher().is_catch_all());
        Self { rules, catch_all }
    }

    /// Compile the configured rules, failing on the first invalid one.
    pub fn from_config(configs: &[RuleConfig]) -> Result<Self, RuleTableError> {
        let rules = configs
            .iter()
            .enumerate()
            .map(|(index, config)| {
                Rule::from_config(config).map_err(|source| RuleTableError {
                    index,
                    prefix: config.prefix.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = Self::new(rules);
        for Shadowed { rule, by } in table.shadowed() {
            tracing::warn!(
                rule = %table.rules[rule].prefix(),
                shadowed_by = %table.rules[by].prefix(),
                "Rule is unreachable: an earlier rule matches all of its paths"
            );
        }
        tracing::debug!(
            rules = table.rules.len(),
            catch_all = table.catch_all.is_some(),
            "Rule table compiled"
        );
        Ok(table)
    }

    /// Select the rule for `path`: first declared prefix match, then the catch-all.
    pub fn match_path(&self, path: &str) -> Result<&Rule, NoRouteError> {
        self.rules
            .iter()
            .find(|rule| rule.matcher().matches(path))
            .or_else(|| self.catch_all.map(|i| &self.rules[i]))
            .ok_or_else(|| NoRouteError {
                path: path.to_string(),
            })
    }

    /// Rules that are unreachable because of an earlier, broader rule.
    pub fn shadowed(&self) -> Vec<Shadowed> {
        let mut shadowed = Vec::new();
        for (later, rule) in self.rules.iter().enumerate() {
            if let Some(by) = self.rules[..later]
                .iter()
                .position(|earlier| earlier.matcher().shadows(rule.matcher()))
            {
                shadowed.push(Shadowed { rule: later, by });
            }
        }
        shadowed
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn catch_all(&self) -> Option<&Rule> {
        self.catch_all.map(|i| &self.rules[i])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
