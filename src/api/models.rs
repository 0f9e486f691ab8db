//! API Request and Response Models

use crate::games::types::{BetOptions, SymbolCatalog};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /api/bet/place`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBetRequest {
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(flatten)]
    pub options: BetOptions,
}

/// Body of `POST /api/bet/many-spins`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManySpinsRequest {
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub spins: Option<f64>,
    #[serde(flatten)]
    pub options: BetOptions,
}

/// Read any JSON value where a number is expected. Non-numbers become NaN so
/// the boundary checks reject them with their own message instead of a
/// generic parse failure.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Number(n)) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Some(_) => Some(f64::NAN),
    })
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// One catalog entry as listed by `GET /api/bet/symbols`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub index: usize,
    pub glyph: String,
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolsResponse {
    pub symbols: Vec<SymbolInfo>,
}

impl From<&SymbolCatalog> for SymbolsResponse {
    fn from(catalog: &SymbolCatalog) -> Self {
        Self {
            symbols: catalog
                .symbols()
                .iter()
                .enumerate()
                .map(|(index, symbol)| SymbolInfo {
                    index,
                    glyph: symbol.glyph.clone(),
                    name: symbol.name.clone(),
                    value: symbol.value,
                })
                .collect(),
        }
    }
}
