pub mod portfolio_service;
pub mod valuation_model;
pub mod valuation_service;

pub use portfolio_service::{PortfolioService, PortfolioServiceTrait};
pub use valuation_model::{HoldingMetrics, PortfolioValuation, ValuationReport};
pub use valuation_service::{ValuationService, ValuationServiceTrait};

#[cfg(test)]
mod portfolio_service_tests;
#[cfg(test)]
mod valuation_service_tests;
