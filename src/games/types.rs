use crate::errors::ConfigurationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Number of reels in a spin
pub const REEL_COUNT: usize = 3;

/// Win classification of a resolved spin
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WinType {
    ThreeOfAKind,
    TwoOfAKind,
    NoWin,
}

impl WinType {
    pub fn is_win(self) -> bool {
        self != WinType::NoWin
    }
}

impl fmt::Display for WinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinType::ThreeOfAKind => write!(f, "THREE_OF_A_KIND"),
            WinType::TwoOfAKind => write!(f, "TWO_OF_A_KIND"),
            WinType::NoWin => write!(f, "NO_WIN"),
        }
    }
}

/// A reel symbol and its three-of-a-kind multiplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symbol {
    pub glyph: String,
    pub name: String,
    pub value: u64,
}

impl Symbol {
    pub fn new(glyph: impl Into<String>, name: impl Into<String>, value: u64) -> Self {
        Self {
            glyph: glyph.into(),
            name: name.into(),
            value,
        }
    }
}

/// Ordered, immutable set of reel symbols. Indices into the catalog are what a
/// spin result reports.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
}

impl SymbolCatalog {
    /// Smallest catalog for which three pairwise distinct symbols exist
    pub const MIN_SYMBOLS: usize = REEL_COUNT;

    /// Build a catalog, rejecting duplicates, zero values and tables too small
    /// for a no-win arrangement.
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, ConfigurationError> {
        if symbols.len() < Self::MIN_SYMBOLS {
            return Err(ConfigurationError::InvalidValue {
                field: "betting.symbols".to_string(),
                value: symbols.len().to_string(),
                reason: format!("catalog needs at least {} symbols", Self::MIN_SYMBOLS),
            });
        }

        let mut seen = HashSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol.glyph.as_str()) {
                return Err(ConfigurationError::InvalidValue {
                    field: "betting.symbols".to_string(),
                    value: symbol.glyph.clone(),
                    reason: "duplicate symbol glyph".to_string(),
                });
            }
            if symbol.value == 0 {
                return Err(ConfigurationError::InvalidValue {
                    field: format!("betting.symbols.{}", symbol.name),
                    value: "0".to_string(),
                    reason: "payout value must be positive".to_string(),
                });
            }
        }

        Ok(Self { symbols })
    }

    /// The six-symbol fruit machine table
    pub fn standard() -> Self {
        Self {
            symbols: standard_symbols(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }

    /// Payout multiplier of the symbol at `index`
    pub fn value(&self, index: usize) -> u64 {
        self.symbols.get(index).map(|s| s.value).unwrap_or(0)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Default symbol table, lowest paying first
pub fn standard_symbols() -> Vec<Symbol> {
    vec![
        Symbol::new("🍒", "cherry", 2),
        Symbol::new("🍊", "orange", 3),
        Symbol::new("🍋", "lemon", 4),
        Symbol::new("🍇", "grapes", 5),
        Symbol::new("7️⃣", "seven", 10),
        Symbol::new("💎", "diamond", 20),
    ]
}

/// Optional forcing flags and raw weight overrides shared by single bets and
/// batches. Weight maps are validated by [`crate::games::weights`] before use.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BetOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autowin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autolose: Option<bool>,
    /// Keys: `threeOfAKind`, `twoOfAKind`, `noWin`
    #[serde(
        default,
        deserialize_with = "lenient_weights",
        skip_serializing_if = "Option::is_none"
    )]
    pub outcome_weights: Option<BTreeMap<String, f64>>,
    /// Keys: symbol indices `"0"` through `"S-1"`
    #[serde(
        default,
        deserialize_with = "lenient_weights",
        skip_serializing_if = "Option::is_none"
    )]
    pub symbol_weights: Option<BTreeMap<String, f64>>,
}

/// Read a weight map whose values may be any JSON value. Non-numbers and
/// `null` become NaN so weight validation rejects them by key.
fn lenient_weights<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw.map(|entries| {
        entries
            .into_iter()
            .map(|(key, value)| (key, value.as_f64().unwrap_or(f64::NAN)))
            .collect()
    }))
}

impl BetOptions {
    pub fn force_win() -> Self {
        Self {
            autowin: Some(true),
            ..Default::default()
        }
    }

    pub fn force_lose() -> Self {
        Self {
            autolose: Some(true),
            ..Default::default()
        }
    }
}

/// Outcome of a single bet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BetResponse {
    /// Catalog indices in reel order
    pub symbols: [usize; REEL_COUNT],
    pub bet_amount: u64,
    pub win_amount: u64,
    pub is_win: bool,
    pub win_type: WinType,
}

/// Aggregate statistics over a batch of spins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpinStats {
    pub total_spins: u64,
    pub total_win_amount: u64,
    pub total_bet_amount: u64,
    /// Mean net profit per spin
    pub expectation: f64,
    /// Percentage of spins that won
    pub win_rate: f64,
    /// Total payout over total stake, as a percentage
    pub return_to_player: f64,
}
