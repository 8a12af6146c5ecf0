//! The `exchange` command handler.

use log::warn;

use super::client::RateClient;
use crate::journal::CommandJournal;

/// Handles parsed `exchange` commands: resolves the day count, journals the
/// command, drives the fan-out fetch, and formats the reply payload.
pub struct ExchangeService {
    client: RateClient,
    journal: CommandJournal,
    default_days: u32,
}

impl ExchangeService {
    pub fn new(client: RateClient, journal: CommandJournal, default_days: u32) -> Self {
        Self {
            client,
            journal,
            default_days,
        }
    }

    /// Handle one command. `params` are the whitespace-split tokens after the
    /// keyword.
    ///
    /// The journal append and the fetch run concurrently; neither outcome
    /// affects the other. The reply is always a JSON array; an empty one is
    /// the only failure signal clients get.
    pub async fn execute(&self, params: &[&str]) -> String {
        let days = self.resolve_days(params);
        let command = format!("exchange {days}");
        let ((), results) = tokio::join!(
            self.journal.record(&command),
            self.client.fetch_many(days)
        );

        match serde_json::to_string_pretty(&results) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("failed to serialize rate results: {err}");
                "[]".to_string()
            }
        }
    }

    /// First token parsing as a positive integer wins; anything else falls
    /// back to the configured default.
    fn resolve_days(&self, params: &[&str]) -> u32 {
        params
            .first()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|days| *days >= 1)
            .unwrap_or(self.default_days)
    }
}
