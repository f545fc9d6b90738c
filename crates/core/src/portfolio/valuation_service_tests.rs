// Tests for the valuation service against a scripted in-memory
// provider: fixed prices per ticker, with selected tickers failing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use stockfolio_market_data::{MarketDataError, MarketDataProvider, Quote};

use crate::ledger::Position;

use super::valuation_model::ValuationReport;
use super::valuation_service::{ValuationService, ValuationServiceTrait};

struct ScriptedProvider {
    prices: HashMap<String, Decimal>,
    failing: HashSet<String>,
}

impl ScriptedProvider {
    fn new(prices: &[(&str, Decimal)]) -> Self {
        Self {
            prices: prices
                .iter()
                .map(|(t, p)| (t.to_string(), *p))
                .collect(),
            failing: HashSet::new(),
        }
    }

    fn failing(mut self, ticker: &str) -> Self {
        self.failing.insert(ticker.to_string());
        self
    }
}

#[async_trait]
impl MarketDataProvider for ScriptedProvider {
    fn id(&self) -> &'static str {
        "SCRIPTED"
    }

    async fn validate_symbol(&self, symbol: &str) -> Result<bool, MarketDataError> {
        Ok(self.prices.contains_key(symbol))
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        if self.failing.contains(symbol) {
            return Err(MarketDataError::ProviderError {
                provider: "SCRIPTED".to_string(),
                message: "connection reset".to_string(),
            });
        }
        self.prices
            .get(symbol)
            .map(|price| Quote::new(Utc::now(), *price, "USD".to_string(), "SCRIPTED".to_string()))
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    async fn get_historical_quotes(
        &self,
        _symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError> {
        Err(MarketDataError::NotSupported {
            operation: "history".to_string(),
            provider: "SCRIPTED".to_string(),
        })
    }
}

fn position(ticker: &str, avg_cost: Decimal, quantity: u64) -> Position {
    Position {
        ticker: ticker.to_string(),
        avg_cost,
        quantity,
    }
}

#[tokio::test]
async fn test_single_position_metrics() {
    let provider = Arc::new(ScriptedProvider::new(&[("AAPL", dec!(150))]));
    let service = ValuationService::new(provider);

    let report = service
        .value_positions(&[position("AAPL", dec!(100), 10)])
        .await
        .unwrap();

    let valuation = match report {
        ValuationReport::Valued(v) => v,
        ValuationReport::Empty => panic!("expected a valued report"),
    };

    assert_eq!(valuation.holdings.len(), 1);
    let row = &valuation.holdings[0];
    assert_eq!(row.current_price, dec!(150));
    assert_eq!(row.total_value, dec!(1500));
    assert_eq!(row.gain_loss, dec!(500));
    assert_eq!(row.pct_change, Some(dec!(50)));
    assert_eq!(valuation.total_pct_change, dec!(50));
    assert!(valuation.failed.is_empty());
}

#[tokio::test]
async fn test_empty_portfolio_reports_empty() {
    let provider = Arc::new(ScriptedProvider::new(&[]));
    let service = ValuationService::new(provider);

    let report = service.value_positions(&[]).await.unwrap();
    assert_eq!(report, ValuationReport::Empty);
}

#[tokio::test]
async fn test_total_sums_pct_change_across_positions() {
    let provider = Arc::new(ScriptedProvider::new(&[
        ("AAPL", dec!(150)),
        ("MSFT", dec!(150)),
    ]));
    let service = ValuationService::new(provider);

    let report = service
        .value_positions(&[
            position("AAPL", dec!(100), 10), // +50%
            position("MSFT", dec!(200), 5),  // -25%
        ])
        .await
        .unwrap();

    let valuation = match report {
        ValuationReport::Valued(v) => v,
        ValuationReport::Empty => panic!("expected a valued report"),
    };

    assert_eq!(valuation.holdings.len(), 2);
    assert_eq!(valuation.total_pct_change, dec!(25));
}

#[tokio::test]
async fn test_partial_failure_isolation() {
    // B fails; A and C still come back correct, total excludes B
    let provider = Arc::new(
        ScriptedProvider::new(&[
            ("AAA", dec!(110)),
            ("BBB", dec!(999)),
            ("CCC", dec!(120)),
        ])
        .failing("BBB"),
    );
    let service = ValuationService::new(provider);

    let report = service
        .value_positions(&[
            position("AAA", dec!(100), 1), // +10%
            position("BBB", dec!(100), 1),
            position("CCC", dec!(100), 1), // +20%
        ])
        .await
        .unwrap();

    let valuation = match report {
        ValuationReport::Valued(v) => v,
        ValuationReport::Empty => panic!("expected a valued report"),
    };

    let tickers: Vec<&str> = valuation
        .holdings
        .iter()
        .map(|h| h.ticker.as_str())
        .collect();
    assert_eq!(tickers, vec!["AAA", "CCC"]);
    assert_eq!(valuation.total_pct_change, dec!(30));

    assert_eq!(valuation.failed.len(), 1);
    assert_eq!(valuation.failed[0].0, "BBB");
    assert!(valuation.failed[0].1.contains("connection reset"));
}

#[tokio::test]
async fn test_rows_come_back_in_input_order() {
    let provider = Arc::new(ScriptedProvider::new(&[
        ("AAPL", dec!(1)),
        ("GOOG", dec!(1)),
        ("MSFT", dec!(1)),
    ]));
    let service = ValuationService::new(provider);

    // the mutation service hands over a ticker-sorted snapshot; the
    // valuation keeps that order
    let report = service
        .value_positions(&[
            position("AAPL", dec!(1), 1),
            position("GOOG", dec!(1), 1),
            position("MSFT", dec!(1), 1),
        ])
        .await
        .unwrap();

    let valuation = match report {
        ValuationReport::Valued(v) => v,
        ValuationReport::Empty => panic!("expected a valued report"),
    };
    let tickers: Vec<&str> = valuation
        .holdings
        .iter()
        .map(|h| h.ticker.as_str())
        .collect();
    assert_eq!(tickers, vec!["AAPL", "GOOG", "MSFT"]);
}
