//! Stockfolio Market Data Crate
//!
//! Provider-agnostic market data fetching for the Stockfolio portfolio
//! engine: symbol validation, latest quotes, historical price series,
//! and descriptive company profiles.
//!
//! # Overview
//!
//! The valuation engine in `stockfolio-core` consumes the
//! [`MarketDataProvider`] trait defined here; it never talks to a data
//! source directly. The crate ships one concrete provider:
//!
//! - [`YahooProvider`] - Yahoo Finance, via the `yahoo_finance_api` crate
//!   plus the crumb-authenticated quoteSummary endpoint for profiles.
//!
//! # Core Types
//!
//! - [`Quote`] - a market data quote with close price and optional OHLCV
//! - [`AssetProfile`] - descriptive company/fund data, every field optional
//! - [`MarketDataError`] - error type for all provider operations

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{AssetProfile, Quote};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
