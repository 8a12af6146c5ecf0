//! Exchange rate lookups against the remote source, plus the command
//! handler that ties lookups to the command journal.

mod client;
mod error;
mod service;
mod types;

pub use client::RateClient;
pub use error::{ExchangeError, ExchangeResult};
pub use service::ExchangeService;
pub use types::{CurrencyRate, DailyRates, RateRecord, RateResult};
