//! JSON input decoding
//!
//! Four documents describe a run: the product, the substance list, the
//! effect multiplier table and the per-substance rule lists. Each can be
//! parsed from a string or loaded from a file.

use crate::model::{MultiplierTable, Product, Rule, RuleKind, Substance};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {origin} JSON: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rule {index} of substance '{substance}': {message}")]
    InvalidRule {
        substance: String,
        index: usize,
        message: String,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    name: String,
    initial_effect: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubstance {
    name: String,
    /// Cents; fractional input is truncated
    cost: f64,
    default_effect: String,
}

#[derive(Debug, Deserialize)]
struct RawMultiplier {
    name: String,
    /// Fraction of the base price (0.2 means +20%)
    multiplier: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRuleSet {
    substance_name: String,
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    action: RawAction,
    #[serde(default)]
    condition: Vec<String>,
    #[serde(default)]
    if_not_present: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    target: String,
    #[serde(default)]
    with_effect: Option<String>,
}

fn from_json<'a, T: Deserialize<'a>>(origin: &str, json: &'a str) -> LoadResult<T> {
    serde_json::from_str(json).map_err(|source| LoadError::Json {
        origin: origin.to_string(),
        source,
    })
}

pub fn parse_product(json: &str) -> LoadResult<Product> {
    let raw: RawProduct = from_json("product", json)?;
    Ok(Product::new(raw.name, raw.initial_effect))
}

/// Substances in input order; their indices are stable for the whole run.
pub fn parse_substances(json: &str) -> LoadResult<Vec<Substance>> {
    let raw: Vec<RawSubstance> = from_json("substances", json)?;
    Ok(raw
        .into_iter()
        .map(|s| Substance::new(s.name, s.cost as i64, s.default_effect))
        .collect())
}

/// Multipliers are stored ×100, rounded to the nearest integer.
pub fn parse_multipliers(json: &str) -> LoadResult<MultiplierTable> {
    let raw: Vec<RawMultiplier> = from_json("effect multipliers", json)?;
    Ok(raw
        .into_iter()
        .map(|m| (m.name, (m.multiplier * 100.0).round() as i64))
        .collect())
}

/// Append each rule list to the first substance with a matching name.
///
/// Lists naming an unknown substance are skipped. Returns the number of
/// rules attached.
pub fn attach_rules(substances: &mut [Substance], json: &str) -> LoadResult<usize> {
    let raw: Vec<RawRuleSet> = from_json("substance rules", json)?;
    let mut attached = 0;

    for set in raw {
        let Some(substance) = substances.iter_mut().find(|s| s.name == set.substance_name) else {
            warn!(
                substance = %set.substance_name,
                rules = set.rules.len(),
                "skipping rules for unknown substance"
            );
            continue;
        };

        for (index, rule) in set.rules.into_iter().enumerate() {
            let kind = rule
                .action
                .kind
                .parse::<RuleKind>()
                .map_err(|message| LoadError::InvalidRule {
                    substance: substance.name.clone(),
                    index,
                    message,
                })?;
            let with_effect = match kind {
                RuleKind::Replace => rule.action.with_effect,
                RuleKind::Add => None,
            };
            substance.rules.push(Rule {
                kind,
                condition: rule.condition,
                if_not_present: rule.if_not_present,
                target: rule.action.target,
                with_effect,
            });
            attached += 1;
        }
    }

    Ok(attached)
}

/// Paths of the four input documents
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub product: PathBuf,
    pub substances: PathBuf,
    pub effects: PathBuf,
    pub rules: PathBuf,
}

/// Decoded run inputs, rules already attached to their substances
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub product: Product,
    pub substances: Vec<Substance>,
    pub multipliers: MultiplierTable,
}

fn read(path: &Path) -> LoadResult<String> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Like `from_json`, but errors name the file
fn parse_file<T>(path: &Path, parse: impl FnOnce(&str) -> LoadResult<T>) -> LoadResult<T> {
    let contents = read(path)?;
    parse(&contents).map_err(|err| match err {
        LoadError::Json { source, .. } => LoadError::Json {
            origin: path.display().to_string(),
            source,
        },
        other => other,
    })
}

pub fn load_inputs(paths: &InputPaths) -> LoadResult<RunInputs> {
    let product = parse_file(&paths.product, parse_product)?;
    let mut substances = parse_file(&paths.substances, parse_substances)?;
    let multipliers = parse_file(&paths.effects, parse_multipliers)?;
    let rules = parse_file(&paths.rules, |json| attach_rules(&mut substances, json))?;

    debug!(
        product = %product.name,
        substances = substances.len(),
        effects = multipliers.len(),
        rules,
        "inputs loaded"
    );

    Ok(RunInputs {
        product,
        substances,
        multipliers,
    })
}
