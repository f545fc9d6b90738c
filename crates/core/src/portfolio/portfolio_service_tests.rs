// Tests for the portfolio mutation service against a real CSV-backed
// store in a temp directory, plus a failing store for the
// all-or-nothing guarantees.

use std::sync::Arc;

use rust_decimal_macros::dec;
use tempfile::tempdir;

use crate::errors::{Error, StorageError, ValidationError};
use crate::ledger::{CsvLedgerStore, Ledger, LedgerStore};

use super::portfolio_service::{PortfolioService, PortfolioServiceTrait};

fn service_in(dir: &tempfile::TempDir) -> PortfolioService {
    let store = Arc::new(CsvLedgerStore::new(dir.path().join("my_portfolio.csv")));
    PortfolioService::new(store).unwrap()
}

/// Store whose saves always fail, for exercising rollback.
struct FailingStore;

impl LedgerStore for FailingStore {
    fn load(&self) -> Result<Ledger, StorageError> {
        Ok(Ledger::new())
    }

    fn save(&self, _ledger: &Ledger) -> Result<(), StorageError> {
        Err(StorageError::WriteFailed("disk full".to_string()))
    }
}

#[test]
fn test_first_buy_creates_position() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);

    let position = service.buy("AAPL", dec!(100.00), 10).unwrap();

    assert_eq!(position.ticker, "AAPL");
    assert_eq!(position.avg_cost, dec!(100.00));
    assert_eq!(position.quantity, 10);
}

#[test]
fn test_repeat_buy_merges_weighted_average() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);

    service.buy("AAPL", dec!(100.00), 10).unwrap();
    let position = service.buy("AAPL", dec!(120.00), 10).unwrap();

    assert_eq!(position.quantity, 20);
    assert_eq!(position.avg_cost, dec!(110.00));
}

#[test]
fn test_full_closeout_then_fresh_buy() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);

    service.buy("AAPL", dec!(100.00), 10).unwrap();
    service.buy("AAPL", dec!(120.00), 10).unwrap();
    service.sell("AAPL", 20).unwrap();

    assert!(service.positions().is_empty());
    assert_eq!(service.available_quantity("AAPL"), 0);

    // a buy after closeout is a fresh insert, not a merge
    let position = service.buy("AAPL", dec!(80.00), 5).unwrap();
    assert_eq!(position.avg_cost, dec!(80.00));
    assert_eq!(position.quantity, 5);
}

#[test]
fn test_partial_sell_keeps_avg_cost() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);

    service.buy("AAPL", dec!(100.00), 10).unwrap();
    service.sell("AAPL", 4).unwrap();

    let positions = service.positions();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].quantity, 6);
    assert_eq!(positions[0].avg_cost, dec!(100.00));
}

#[test]
fn test_zero_price_buy_rejected() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);

    let err = service.buy("AAPL", dec!(0), 10).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::NonPositivePrice(_))
    ));
    assert!(service.positions().is_empty());
}

#[test]
fn test_zero_quantity_buy_rejected() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);

    let err = service.buy("AAPL", dec!(100.00), 0).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::ZeroQuantity)
    ));
}

#[test]
fn test_empty_ticker_rejected() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);

    let err = service.buy("   ", dec!(100.00), 10).unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::EmptyTicker)));
}

#[test]
fn test_ticker_normalized_to_uppercase() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);

    service.buy(" aapl ", dec!(100.00), 10).unwrap();

    assert_eq!(service.available_quantity("aapl"), 10);
    assert_eq!(service.positions()[0].ticker, "AAPL");
}

#[test]
fn test_sell_unknown_ticker_rejected() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);

    let err = service.sell("GOOG", 1).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::UnknownTicker(_))
    ));
}

#[test]
fn test_zero_quantity_sell_rejected() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);
    service.buy("AAPL", dec!(100.00), 10).unwrap();

    let err = service.sell("AAPL", 0).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::ZeroQuantity)
    ));
    assert_eq!(service.available_quantity("AAPL"), 10);
}

#[test]
fn test_oversell_rejected_without_mutation() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);
    service.buy("AAPL", dec!(100.00), 10).unwrap();

    let err = service.sell("AAPL", 11).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::SellExceedsHoldings { .. })
    ));
    assert_eq!(service.available_quantity("AAPL"), 10);
}

#[test]
fn test_positions_snapshot_is_ticker_sorted() {
    let dir = tempdir().unwrap();
    let service = service_in(&dir);

    service.buy("MSFT", dec!(300.00), 1).unwrap();
    service.buy("AAPL", dec!(100.00), 1).unwrap();
    service.buy("GOOG", dec!(150.00), 1).unwrap();

    let tickers: Vec<String> = service
        .positions()
        .into_iter()
        .map(|p| p.ticker)
        .collect();
    assert_eq!(tickers, vec!["AAPL", "GOOG", "MSFT"]);
}

#[test]
fn test_mutations_survive_restart() {
    let dir = tempdir().unwrap();
    {
        let service = service_in(&dir);
        service.buy("AAPL", dec!(100.00), 10).unwrap();
        service.buy("AAPL", dec!(120.00), 10).unwrap();
        service.sell("AAPL", 5).unwrap();
    }

    // a fresh service over the same file observes the persisted state
    let service = service_in(&dir);
    let positions = service.positions();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].quantity, 15);
    assert_eq!(positions[0].avg_cost, dec!(110.00));
}

#[test]
fn test_failed_save_leaves_ledger_untouched() {
    let service = PortfolioService::new(Arc::new(FailingStore)).unwrap();

    let err = service.buy("AAPL", dec!(100.00), 10).unwrap_err();
    assert!(matches!(err, Error::Storage(StorageError::WriteFailed(_))));

    // the rejected buy must not be visible in memory either
    assert!(service.positions().is_empty());
    assert_eq!(service.available_quantity("AAPL"), 0);
}
