//! Core error types for the portfolio engine.
//!
//! Validation failures are recoverable no-ops: the ledger, in memory and
//! on disk, is left exactly as it was. Storage failures are fatal for the
//! requested mutation. Market data failures during valuation are handled
//! per ticker and never surface through this type as a whole-computation
//! abort.

use rust_decimal::Decimal;
use thiserror::Error;

use stockfolio_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),
}

/// Invalid input to a mutation. The operation is rejected before any
/// state is touched.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Ticker symbol must not be empty")]
    EmptyTicker,

    #[error("Purchase price must be above zero, got {0}")]
    NonPositivePrice(Decimal),

    #[error("Quantity must be above zero")]
    ZeroQuantity,

    #[error("No position held for ticker '{0}'")]
    UnknownTicker(String),

    #[error("Cannot sell {requested} shares of '{ticker}', only {held} held")]
    SellExceedsHoldings {
        ticker: String,
        requested: u64,
        held: u64,
    },
}

/// The ledger store could not be read or written.
///
/// A missing file on load is NOT an error (normal empty start); `Corrupt`
/// covers a file that exists but cannot be trusted.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read ledger file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ledger file is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to persist ledger: {0}")]
    WriteFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::NonPositivePrice(dec!(0));
        assert_eq!(
            format!("{}", error),
            "Purchase price must be above zero, got 0"
        );

        let error = ValidationError::SellExceedsHoldings {
            ticker: "AAPL".to_string(),
            requested: 30,
            held: 20,
        };
        assert_eq!(
            format!("{}", error),
            "Cannot sell 30 shares of 'AAPL', only 20 held"
        );
    }

    #[test]
    fn test_validation_error_wraps_into_root_error() {
        let error: Error = ValidationError::EmptyTicker.into();
        assert!(matches!(error, Error::Validation(_)));
        assert_eq!(
            format!("{}", error),
            "Input validation failed: Ticker symbol must not be empty"
        );
    }

    #[test]
    fn test_storage_error_wraps_into_root_error() {
        let error: Error = StorageError::Corrupt("duplicate ticker 'AAPL'".to_string()).into();
        assert!(matches!(error, Error::Storage(_)));
    }
}
