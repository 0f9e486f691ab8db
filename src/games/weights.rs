//! Weight override validation
//!
//! Raw override maps arrive as string-keyed objects. They are turned into typed
//! tables here, all at once, so a bad key or value fails the request before any
//! random number is drawn.

use crate::errors::BetError;
use crate::games::types::{BetOptions, WinType};
use std::collections::BTreeMap;
use tracing::debug;

pub const THREE_OF_A_KIND_KEY: &str = "threeOfAKind";
pub const TWO_OF_A_KIND_KEY: &str = "twoOfAKind";
pub const NO_WIN_KEY: &str = "noWin";

const OUTCOME_KEYS: [&str; 3] = [THREE_OF_A_KIND_KEY, TWO_OF_A_KIND_KEY, NO_WIN_KEY];

/// Per-classification likelihood multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeWeights {
    pub three_of_a_kind: f64,
    pub two_of_a_kind: f64,
    pub no_win: f64,
}

impl Default for OutcomeWeights {
    fn default() -> Self {
        Self {
            three_of_a_kind: 1.0,
            two_of_a_kind: 1.0,
            no_win: 1.0,
        }
    }
}

impl OutcomeWeights {
    /// Unnormalized classification weights for a catalog of `symbol_count`
    /// symbols. The base factors count the reel arrangements of each
    /// classification under uniform draws, so all-ones weights reproduce an
    /// unweighted machine.
    pub fn classification_weights(&self, symbol_count: usize) -> [(WinType, f64); 3] {
        let s = symbol_count as f64;
        [
            (WinType::ThreeOfAKind, self.three_of_a_kind),
            (WinType::TwoOfAKind, 3.0 * (s - 1.0) * self.two_of_a_kind),
            (WinType::NoWin, (s - 1.0) * (s - 2.0) * self.no_win),
        ]
    }
}

/// Per-symbol likelihood weights, held as `(index, weight)` draw candidates in
/// catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolWeights(Vec<(usize, f64)>);

impl SymbolWeights {
    pub fn from_weights(weights: Vec<f64>) -> Self {
        Self(weights.into_iter().enumerate().collect())
    }

    pub fn uniform(symbol_count: usize) -> Self {
        Self::from_weights(vec![1.0; symbol_count])
    }

    pub fn candidates(&self) -> &[(usize, f64)] {
        &self.0
    }

    pub fn weight(&self, index: usize) -> Option<f64> {
        self.0.get(index).map(|&(_, weight)| weight)
    }
}

/// Fully validated parameters for resolving a spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinParameters {
    pub force_win: bool,
    pub force_lose: bool,
    pub outcome_weights: OutcomeWeights,
    pub symbol_weights: SymbolWeights,
}

impl SpinParameters {
    /// Validate raw options against a catalog of `symbol_count` symbols
    pub fn from_options(options: &BetOptions, symbol_count: usize) -> Result<Self, BetError> {
        let outcome_weights = match &options.outcome_weights {
            Some(raw) => validate_outcome_weights(raw)?,
            None => OutcomeWeights::default(),
        };
        let symbol_weights = match &options.symbol_weights {
            Some(raw) => validate_symbol_weights(raw, symbol_count)?,
            None => SymbolWeights::uniform(symbol_count),
        };

        Ok(Self {
            force_win: options.autowin.unwrap_or(false),
            force_lose: options.autolose.unwrap_or(false),
            outcome_weights,
            symbol_weights,
        })
    }
}

/// Require exactly the three classification keys, each finite and positive
pub fn validate_outcome_weights(raw: &BTreeMap<String, f64>) -> Result<OutcomeWeights, BetError> {
    let expected: Vec<String> = OUTCOME_KEYS.iter().map(|k| k.to_string()).collect();
    check_exact_keys("outcomeWeights", raw, &expected)?;

    Ok(OutcomeWeights {
        three_of_a_kind: positive_weight("outcomeWeights", THREE_OF_A_KIND_KEY, raw)?,
        two_of_a_kind: positive_weight("outcomeWeights", TWO_OF_A_KIND_KEY, raw)?,
        no_win: positive_weight("outcomeWeights", NO_WIN_KEY, raw)?,
    })
}

/// Require every index `0..symbol_count` and nothing else, each finite and
/// positive. A missing index is an error, never an implicit weight of 1.
pub fn validate_symbol_weights(
    raw: &BTreeMap<String, f64>,
    symbol_count: usize,
) -> Result<SymbolWeights, BetError> {
    let expected: Vec<String> = (0..symbol_count).map(|i| i.to_string()).collect();
    check_exact_keys("symbolWeights", raw, &expected)?;

    let weights = expected
        .iter()
        .map(|key| positive_weight("symbolWeights", key, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SymbolWeights::from_weights(weights))
}

fn check_exact_keys(
    field: &str,
    raw: &BTreeMap<String, f64>,
    expected: &[String],
) -> Result<(), BetError> {
    if let Some(missing) = expected.iter().find(|key| !raw.contains_key(key.as_str())) {
        return Err(rejected(format!(
            "{} is missing required key '{}'",
            field, missing
        )));
    }
    if let Some(extra) = raw.keys().find(|key| !expected.contains(key)) {
        return Err(rejected(format!(
            "{} contains unexpected key '{}'",
            field, extra
        )));
    }
    Ok(())
}

fn positive_weight(field: &str, key: &str, raw: &BTreeMap<String, f64>) -> Result<f64, BetError> {
    match raw.get(key) {
        Some(&value) if value.is_finite() && value > 0.0 => Ok(value),
        Some(&value) => Err(rejected(format!(
            "{}.{} must be a finite positive number, got {}",
            field, key, value
        ))),
        None => Err(rejected(format!(
            "{} is missing required key '{}'",
            field, key
        ))),
    }
}

fn rejected(message: String) -> BetError {
    debug!("Rejected weight override: {}", message);
    BetError::InvalidWeights(message)
}
