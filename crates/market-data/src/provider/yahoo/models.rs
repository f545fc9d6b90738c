//! Yahoo Finance quoteSummary response models.
//!
//! The quoteSummary API wraps most numeric fields in `{"raw": ..., "fmt": ...}`
//! objects, and returns empty objects `{}` when a field has no data.

use serde::Deserialize;

/// Top-level response wrapper for the quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummary,
}

/// Result list container
#[derive(Debug, Deserialize)]
pub struct QuoteSummary {
    pub result: Vec<QuoteSummaryResult>,
}

/// One symbol's worth of quoteSummary modules
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResult {
    pub price: Option<PriceData>,
    pub summary_profile: Option<SummaryProfile>,
    pub summary_detail: Option<SummaryDetail>,
}

/// The `price` module
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceData {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub exchange_name: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    pub regular_market_price: Option<RawValue>,
    pub regular_market_time: Option<i64>,
    pub market_cap: Option<RawValue>,
}

/// A `{"raw": ..., "fmt": ...}` wrapped numeric value
#[derive(Debug, Deserialize, Clone)]
pub struct RawValue {
    pub raw: Option<f64>,
}

/// The `summaryProfile` module (company info)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub long_business_summary: Option<String>,
    pub country: Option<String>,
}

/// The `summaryDetail` module (financial metrics)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    pub market_cap: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<RawValue>,
    pub price_to_sales_trailing12_months: Option<RawValue>,
    pub dividend_rate: Option<RawValue>,
    pub dividend_yield: Option<RawValue>,
}
