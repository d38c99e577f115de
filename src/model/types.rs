//! Domain types for products, substances and their rules

use std::collections::HashMap;
use std::fmt;

/// Effect name → price multiplier, scaled ×100 (20 means +20%)
pub type MultiplierTable = HashMap<String, i64>;

/// The base product every mix starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub initial_effect: String,
}

impl Product {
    pub fn new(name: impl Into<String>, initial_effect: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial_effect: initial_effect.into(),
        }
    }
}

/// What a rule does when its conditions hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Swap `target` for `with_effect`
    Replace,
    /// Add `target`
    Add,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Replace => write!(f, "replace"),
            RuleKind::Add => write!(f, "add"),
        }
    }
}

impl std::str::FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(RuleKind::Replace),
            "add" => Ok(RuleKind::Add),
            _ => Err(format!("Unknown rule action: '{}'. Valid options: replace, add", s)),
        }
    }
}

/// A conditional transformation of the effect set, scoped to one substance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: RuleKind,
    /// Effects that must all be present
    pub condition: Vec<String>,
    /// Effects that must all be absent
    pub if_not_present: Vec<String>,
    pub target: String,
    /// Replacement effect, only meaningful for `RuleKind::Replace`
    pub with_effect: Option<String>,
}

impl Rule {
    pub fn replace(
        condition: &[&str],
        if_not_present: &[&str],
        target: impl Into<String>,
        with_effect: impl Into<String>,
    ) -> Self {
        Self {
            kind: RuleKind::Replace,
            condition: condition.iter().map(|s| s.to_string()).collect(),
            if_not_present: if_not_present.iter().map(|s| s.to_string()).collect(),
            target: target.into(),
            with_effect: Some(with_effect.into()),
        }
    }

    pub fn add(condition: &[&str], if_not_present: &[&str], target: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Add,
            condition: condition.iter().map(|s| s.to_string()).collect(),
            if_not_present: if_not_present.iter().map(|s| s.to_string()).collect(),
            target: target.into(),
            with_effect: None,
        }
    }
}

/// An ingredient that can be added to a mix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substance {
    pub name: String,
    pub cost_cents: i64,
    pub default_effect: String,
    /// Applied in order
    pub rules: Vec<Rule>,
}

impl Substance {
    pub fn new(name: impl Into<String>, cost_cents: i64, default_effect: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cost_cents,
            default_effect: default_effect.into(),
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }
}
