//! Stockfolio Core Crate
//!
//! The portfolio ledger and valuation engine: merging buy transactions
//! into positions on a weighted-average cost basis, removing sold
//! quantities, and deriving performance metrics from live price data.
//!
//! The engine has two collaborators, both injected as trait objects:
//! the [`ledger::LedgerStore`] for durable state and the
//! `MarketDataProvider` from `stockfolio-market-data` for prices.
//! Presentation concerns (formatting, coloring, charts) stay with the
//! caller; every value returned here is a plain number.

pub mod errors;
pub mod ledger;
pub mod portfolio;

pub use errors::{Error, Result, StorageError, ValidationError};
pub use ledger::{CsvLedgerStore, Ledger, LedgerStore, Position};
pub use portfolio::{
    HoldingMetrics, PortfolioService, PortfolioServiceTrait, PortfolioValuation, ValuationReport,
    ValuationService, ValuationServiceTrait,
};
