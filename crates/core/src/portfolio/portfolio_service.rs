//! Mutation side of the valuation engine.
//!
//! All buys and sells flow through a single service that owns the ledger
//! behind a mutex, so concurrent requests for the same ticker cannot
//! interleave their read-modify-write sequences. Every mutation persists
//! through the injected store before it becomes visible in memory; a
//! failed save leaves both the in-memory ledger and the durable state
//! untouched.

use std::sync::{Arc, Mutex};

use log::{debug, info};
use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};
use crate::ledger::{Ledger, LedgerStore, Position};

/// Public interface of the portfolio mutation service.
pub trait PortfolioServiceTrait: Send + Sync {
    /// Merge a buy into the ledger and persist it. Returns the updated
    /// position.
    fn buy(&self, ticker: &str, purchase_price: Decimal, quantity: u64) -> Result<Position>;

    /// Remove sold shares from the ledger and persist it. Selling the
    /// full held quantity removes the position.
    fn sell(&self, ticker: &str, quantity_sold: u64) -> Result<()>;

    /// Currently held quantity for a ticker, 0 if absent. Callers use
    /// this to bound sell input.
    fn available_quantity(&self, ticker: &str) -> u64;

    /// Ticker-sorted snapshot of all positions.
    fn positions(&self) -> Vec<Position>;
}

/// Single-writer portfolio service with an injected ledger store.
pub struct PortfolioService {
    store: Arc<dyn LedgerStore>,
    ledger: Mutex<Ledger>,
}

impl PortfolioService {
    /// Load the persisted ledger and take ownership of it. A missing
    /// file yields an empty ledger; a corrupt one is an error.
    pub fn new(store: Arc<dyn LedgerStore>) -> Result<Self> {
        let ledger = store.load()?;
        info!("Loaded ledger with {} positions", ledger.len());
        Ok(Self {
            store,
            ledger: Mutex::new(ledger),
        })
    }

    fn normalize_ticker(ticker: &str) -> Result<String> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::EmptyTicker.into());
        }
        Ok(ticker)
    }
}

impl PortfolioServiceTrait for PortfolioService {
    fn buy(&self, ticker: &str, purchase_price: Decimal, quantity: u64) -> Result<Position> {
        let ticker = Self::normalize_ticker(ticker)?;
        if purchase_price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice(purchase_price).into());
        }
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }

        let mut guard = self.ledger.lock().unwrap();
        // Mutate a working copy; commit only after the save succeeds
        let mut working = guard.clone();
        let position = working.merge_buy(&ticker, purchase_price, quantity);
        self.store.save(&working)?;
        *guard = working;

        debug!(
            "Bought {} x {} at {}, position now {} @ avg {}",
            quantity, ticker, purchase_price, position.quantity, position.avg_cost
        );
        Ok(position)
    }

    fn sell(&self, ticker: &str, quantity_sold: u64) -> Result<()> {
        let ticker = Self::normalize_ticker(ticker)?;
        if quantity_sold == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }

        let mut guard = self.ledger.lock().unwrap();
        let mut working = guard.clone();
        working.merge_sell(&ticker, quantity_sold)?;
        self.store.save(&working)?;
        *guard = working;

        debug!("Sold {} x {}", quantity_sold, ticker);
        Ok(())
    }

    fn available_quantity(&self, ticker: &str) -> u64 {
        let ticker = ticker.trim().to_uppercase();
        self.ledger.lock().unwrap().quantity_of(&ticker)
    }

    fn positions(&self) -> Vec<Position> {
        self.ledger.lock().unwrap().positions().cloned().collect()
    }
}
