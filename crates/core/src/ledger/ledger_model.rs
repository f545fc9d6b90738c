//! Ledger domain model: one position per ticker, keyed by symbol.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// The holding record for one ticker.
///
/// `avg_cost` is the quantity-weighted average price paid per unit across
/// all historical buys. Sells reduce `quantity` but never touch it, and it
/// is never recomputed from a market price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub ticker: String,
    pub avg_cost: Decimal,
    pub quantity: u64,
}

/// The full set of positions for the investor.
///
/// Backed by a map keyed on ticker, so uniqueness is structural and
/// iteration comes out in deterministic alphabetical order. A position
/// whose quantity reaches exactly zero is removed, never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    positions: BTreeMap<String, Position>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the position for a ticker.
    pub fn get(&self, ticker: &str) -> Option<&Position> {
        self.positions.get(ticker)
    }

    /// Insert a position, replacing and returning any previous one for
    /// the same ticker.
    pub fn insert(&mut self, position: Position) -> Option<Position> {
        self.positions.insert(position.ticker.clone(), position)
    }

    /// Remove the position for a ticker.
    pub fn remove(&mut self, ticker: &str) -> Option<Position> {
        self.positions.remove(ticker)
    }

    /// Number of distinct tickers held.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Currently held quantity for a ticker, 0 if absent.
    pub fn quantity_of(&self, ticker: &str) -> u64 {
        self.positions.get(ticker).map_or(0, |p| p.quantity)
    }

    /// Positions in ticker-sorted order.
    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    /// Merge a buy into the ledger and return the resulting position.
    ///
    /// First buy of a ticker inserts a fresh position at the purchase
    /// price. A repeat buy folds the new shares into the existing average:
    /// `p1 = (p0*q0 + price*qty) / (q0 + qty)`, a convex combination of
    /// the prior average and the purchase price.
    ///
    /// Expects validated input (`purchase_price > 0`, `quantity > 0`,
    /// normalized non-empty ticker); the service layer rejects everything
    /// else before calling.
    pub fn merge_buy(&mut self, ticker: &str, purchase_price: Decimal, quantity: u64) -> Position {
        match self.positions.get_mut(ticker) {
            Some(position) => {
                let held = Decimal::from(position.quantity);
                let added = Decimal::from(quantity);
                position.avg_cost =
                    (position.avg_cost * held + purchase_price * added) / (held + added);
                position.quantity += quantity;
                position.clone()
            }
            None => {
                let position = Position {
                    ticker: ticker.to_string(),
                    avg_cost: purchase_price,
                    quantity,
                };
                self.positions
                    .insert(ticker.to_string(), position.clone());
                position
            }
        }
    }

    /// Merge a sell into the ledger.
    ///
    /// The average cost is left untouched; only the quantity shrinks.
    /// Selling exactly the held quantity removes the position entirely,
    /// so a later buy of the same ticker starts fresh.
    pub fn merge_sell(&mut self, ticker: &str, quantity_sold: u64) -> Result<(), ValidationError> {
        let position = self
            .positions
            .get_mut(ticker)
            .ok_or_else(|| ValidationError::UnknownTicker(ticker.to_string()))?;

        if quantity_sold > position.quantity {
            return Err(ValidationError::SellExceedsHoldings {
                ticker: ticker.to_string(),
                requested: quantity_sold,
                held: position.quantity,
            });
        }

        position.quantity -= quantity_sold;
        if position.quantity == 0 {
            self.positions.remove(ticker);
        }
        Ok(())
    }
}
