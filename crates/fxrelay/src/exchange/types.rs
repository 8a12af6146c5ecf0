//! Rate source wire types and the aggregated result shape.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day's payload from the remote rate source.
///
/// Only the fields we consume are modeled; everything else in the response is
/// ignored.
#[derive(Debug, Deserialize)]
pub struct DailyRates {
    pub date: String,
    #[serde(rename = "exchangeRate", default)]
    pub exchange_rate: Vec<RateRecord>,
}

/// A single per-currency record inside [`DailyRates`].
#[derive(Debug, Deserialize)]
pub struct RateRecord {
    #[serde(default)]
    pub currency: String,
    #[serde(rename = "saleRate")]
    pub sale_rate: Option<f64>,
    #[serde(rename = "purchaseRate")]
    pub purchase_rate: Option<f64>,
}

/// Sale/purchase price pair for one currency.
///
/// A missing price serializes as the explicit `"N/A"` marker rather than
/// being dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyRate {
    #[serde(serialize_with = "price_or_unavailable")]
    pub sale: Option<f64>,
    #[serde(serialize_with = "price_or_unavailable")]
    pub purchase: Option<f64>,
}

fn price_or_unavailable<S>(price: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match price {
        Some(value) => serializer.serialize_f64(*value),
        None => serializer.serialize_str("N/A"),
    }
}

/// One date's aggregated rate table, filtered to the configured currencies.
///
/// Serializes as a single-entry map keyed by the date string the source
/// reported: `{"21.08.2026": {"USD": {"sale": .., "purchase": ..}, ..}}`.
/// The `BTreeMap` keeps currency order stable across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RateResult {
    pub date: String,
    pub rates: BTreeMap<String, CurrencyRate>,
}

impl Serialize for RateResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &self.rates)?;
        map.end()
    }
}
