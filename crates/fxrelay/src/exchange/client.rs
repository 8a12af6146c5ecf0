//! HTTP client for the remote exchange-rate source.

use chrono::{Days, Local, NaiveDate};
use futures::stream::{self, StreamExt};
use log::warn;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

use super::error::{ExchangeError, ExchangeResult};
use super::types::{CurrencyRate, DailyRates, RateResult};

/// Cap on in-flight lookups within one fan-out, so an `exchange` command with
/// a large day count cannot flood the remote source.
const MAX_CONCURRENT_LOOKUPS: usize = 16;

/// Client for fetching per-date rate tables.
#[derive(Debug, Clone)]
pub struct RateClient {
    /// HTTP client.
    client: Client,
    /// Base URL of the rate source, without the query string.
    base_url: String,
    /// Currency codes the results are filtered to.
    currencies: Vec<String>,
}

impl RateClient {
    /// Create a new rate client.
    pub fn new(base_url: impl Into<String>, currencies: Vec<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            currencies,
        }
    }

    /// Fetch one date's rates, filtered to the configured currency set.
    pub async fn fetch_one(&self, date: NaiveDate) -> ExchangeResult<RateResult> {
        let url = format!("{}?json&date={}", self.base_url, date.format("%d.%m.%Y"));
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ExchangeError::UnexpectedStatus {
                date: date.format("%d.%m.%Y").to_string(),
                status: response.status(),
            });
        }
        let payload: DailyRates = response.json().await?;
        Ok(self.extract_rates(payload))
    }

    /// Fetch the `days` most recent dates (today backwards) concurrently.
    ///
    /// Lookups run independently with at most [`MAX_CONCURRENT_LOOKUPS`] in
    /// flight; results come back in request order (most recent first). Failed
    /// dates are logged and dropped from the result.
    pub async fn fetch_many(&self, days: u32) -> Vec<RateResult> {
        let today = Local::now().date_naive();
        let dates: Vec<NaiveDate> = (0..u64::from(days))
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .collect();

        stream::iter(dates)
            .map(|date| async move {
                match self.fetch_one(date).await {
                    Ok(result) => Some(result),
                    Err(err) => {
                        warn!(
                            "failed to fetch rates for {}: {}",
                            date.format("%d.%m.%Y"),
                            err
                        );
                        None
                    }
                }
            })
            .buffered(MAX_CONCURRENT_LOOKUPS)
            .filter_map(|result| async move { result })
            .collect()
            .await
    }

    fn extract_rates(&self, payload: DailyRates) -> RateResult {
        let mut rates = BTreeMap::new();
        for record in payload.exchange_rate {
            if self.currencies.iter().any(|code| code == &record.currency) {
                rates.insert(
                    record.currency,
                    CurrencyRate {
                        sale: record.sale_rate,
                        purchase: record.purchase_rate,
                    },
                );
            }
        }
        RateResult {
            date: payload.date,
            rates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::RateRecord;
    use super::*;

    fn test_client(currencies: &[&str]) -> RateClient {
        RateClient::new(
            "http://localhost:0",
            currencies.iter().map(|c| c.to_string()).collect(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_extract_rates_filters_to_configured_currencies() {
        let client = test_client(&["EUR", "USD"]);
        let payload = DailyRates {
            date: "01.12.2023".to_string(),
            exchange_rate: vec![
                RateRecord {
                    currency: "USD".to_string(),
                    sale_rate: Some(37.5),
                    purchase_rate: Some(36.9),
                },
                RateRecord {
                    currency: "GBP".to_string(),
                    sale_rate: Some(47.0),
                    purchase_rate: Some(46.2),
                },
                RateRecord {
                    currency: "EUR".to_string(),
                    sale_rate: Some(40.5),
                    purchase_rate: Some(39.8),
                },
            ],
        };

        let result = client.extract_rates(payload);
        assert_eq!(result.date, "01.12.2023");
        let codes: Vec<&String> = result.rates.keys().collect();
        assert_eq!(codes, ["EUR", "USD"]);
    }

    #[test]
    fn test_extract_rates_keeps_missing_prices_unavailable() {
        let client = test_client(&["CHF"]);
        let payload = DailyRates {
            date: "01.12.2023".to_string(),
            exchange_rate: vec![RateRecord {
                currency: "CHF".to_string(),
                sale_rate: Some(42.1),
                purchase_rate: None,
            }],
        };

        let result = client.extract_rates(payload);
        assert_eq!(result.rates["CHF"].sale, Some(42.1));
        assert_eq!(result.rates["CHF"].purchase, None);
    }
}
