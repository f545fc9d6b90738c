//! Yahoo Finance market data provider.
//!
//! Quotes and historical series come through the `yahoo_finance_api`
//! crate; profile data comes from the crumb/cookie-authenticated
//! quoteSummary endpoint, which the library does not expose.

mod models;

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use num_traits::FromPrimitive;
use reqwest::header;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{AssetProfile, Quote};
use crate::provider::MarketDataProvider;

use models::{QuoteSummaryResponse, QuoteSummaryResult};

const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Process-wide cache for the Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| provider_error(format!(
            "Failed to initialize Yahoo connector: {}",
            e
        )))?;
        Ok(Self { connector })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Return the cached Yahoo crumb, fetching a fresh one if needed.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap();
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        let client = reqwest::Client::new();

        // Step 1: cookie from fc.yahoo.com
        let response = client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| provider_error(format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| provider_error("Failed to parse Yahoo cookie".to_string()))?;

        // Step 2: crumb using the cookie
        let crumb = client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| provider_error(format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| provider_error(format!("Failed to read crumb: {}", e)))?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Drop the cached crumb after an authentication failure.
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = None;
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Convert a library quote to our Quote model.
    fn yahoo_quote_to_quote(&self, yahoo_quote: yahoo::Quote) -> Result<Quote, MarketDataError> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| {
                MarketDataError::Parse(format!("Invalid timestamp: {}", yahoo_quote.timestamp))
            })?;

        let close = Decimal::from_f64_retain(yahoo_quote.close).ok_or_else(|| {
            MarketDataError::Parse(format!(
                "Failed to convert close price {} to Decimal",
                yahoo_quote.close
            ))
        })?;

        Ok(Quote {
            timestamp,
            open: Decimal::from_f64_retain(yahoo_quote.open),
            high: Decimal::from_f64_retain(yahoo_quote.high),
            low: Decimal::from_f64_retain(yahoo_quote.low),
            close,
            volume: Decimal::from_u64(yahoo_quote.volume),
            currency: "USD".to_string(),
            source: PROVIDER_ID.to_string(),
        })
    }

    /// Convert chrono DateTime<Utc> to time::OffsetDateTime for the Yahoo API.
    fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(dt.timestamp())
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    // ========================================================================
    // Profile Fetching
    // ========================================================================

    /// Fetch the quoteSummary modules used to build a profile.
    async fn fetch_quote_summary(
        &self,
        symbol: &str,
    ) -> Result<QuoteSummaryResult, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price,summaryProfile,summaryDetail&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let client = reqwest::Client::new();
        let response = client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| provider_error(format!("Profile request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(provider_error("Yahoo authentication expired".to_string()));
        }

        let data: QuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("Failed to parse profile response: {}", e)))?;

        data.quote_summary
            .result
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    /// Map a quoteSummary result to an AssetProfile.
    fn map_quote_summary_to_profile(
        &self,
        symbol: &str,
        result: &QuoteSummaryResult,
    ) -> AssetProfile {
        let price = result.price.as_ref();
        let summary = result.summary_profile.as_ref();
        let detail = result.summary_detail.as_ref();

        let name = price
            .and_then(|p| p.long_name.clone().or_else(|| p.short_name.clone()))
            .unwrap_or_else(|| symbol.to_string());

        // market cap may live in either the price or summaryDetail module
        let market_cap = price
            .and_then(|p| p.market_cap.as_ref())
            .and_then(|v| v.raw)
            .or_else(|| detail.and_then(|d| d.market_cap.as_ref()).and_then(|v| v.raw));

        AssetProfile {
            source: Some(PROVIDER_ID.to_string()),
            name: Some(name),
            symbol: price
                .and_then(|p| p.symbol.clone())
                .or_else(|| Some(symbol.to_string())),
            exchange: price.and_then(|p| p.exchange_name.clone()),
            currency: price.and_then(|p| p.currency.clone()),
            sector: summary.and_then(|s| s.sector.as_deref()).map(format_sector),
            industry: summary.and_then(|s| s.industry.clone()),
            country: summary.and_then(|s| s.country.clone()),
            market_cap,
            forward_pe: detail.and_then(|d| d.forward_pe.as_ref()).and_then(|v| v.raw),
            trailing_pe: detail
                .and_then(|d| d.trailing_pe.as_ref())
                .and_then(|v| v.raw),
            price_to_sales: detail
                .and_then(|d| d.price_to_sales_trailing12_months.as_ref())
                .and_then(|v| v.raw),
            dividend_rate: detail
                .and_then(|d| d.dividend_rate.as_ref())
                .and_then(|v| v.raw),
            dividend_yield: detail
                .and_then(|d| d.dividend_yield.as_ref())
                .and_then(|v| v.raw),
            description: summary.and_then(|s| s.long_business_summary.clone()),
            website: summary.and_then(|s| s.website.clone()),
        }
    }

    /// Build a minimal profile from search results (last resort).
    async fn fetch_search_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        let result = self
            .connector
            .search_ticker(&encode(symbol))
            .await
            .map_err(|e| provider_error(e.to_string()))?;

        let item = result
            .quotes
            .iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        let mut profile = AssetProfile::with_name(if item.long_name.is_empty() {
            item.short_name.clone()
        } else {
            item.long_name.clone()
        });
        profile.source = Some(PROVIDER_ID.to_string());
        profile.symbol = Some(item.symbol.clone());
        profile.exchange = Some(item.exchange.clone());
        Ok(profile)
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn validate_symbol(&self, symbol: &str) -> Result<bool, MarketDataError> {
        if symbol.trim().is_empty() {
            return Ok(false);
        }

        debug!("Validating symbol '{}' against Yahoo", symbol);

        let result = self
            .connector
            .search_ticker(&encode(symbol))
            .await
            .map_err(|e| provider_error(e.to_string()))?;

        Ok(result
            .quotes
            .iter()
            .any(|q| q.symbol.eq_ignore_ascii_case(symbol)))
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Yahoo", symbol);

        let response = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    provider_error(e.to_string())
                }
            })?;

        let yahoo_quote = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", symbol, e);
            MarketDataError::SymbolNotFound(symbol.to_string())
        })?;

        self.yahoo_quote_to_quote(yahoo_quote)
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError> {
        debug!(
            "Fetching historical quotes for {} from {} to {} from Yahoo",
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let start_time = Self::chrono_to_offset_datetime(start);
        let end_time = Self::chrono_to_offset_datetime(end);

        let response = self
            .connector
            .get_quote_history(symbol, start_time, end_time)
            .await
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    provider_error(e.to_string())
                }
            })?;

        match response.quotes() {
            Ok(yahoo_quotes) => {
                let quotes: Vec<Quote> = yahoo_quotes
                    .into_iter()
                    .filter_map(|q| match self.yahoo_quote_to_quote(q) {
                        Ok(quote) => Some(quote),
                        Err(e) => {
                            warn!("Skipping quote due to conversion error: {:?}", e);
                            None
                        }
                    })
                    .collect();

                if quotes.is_empty() {
                    return Err(MarketDataError::NoDataForRange);
                }

                Ok(quotes)
            }
            Err(yahoo::YahooError::NoQuotes) => {
                warn!(
                    "No historical quotes returned for '{}' between {} and {}",
                    symbol,
                    start.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d")
                );
                Err(MarketDataError::NoDataForRange)
            }
            Err(e) => Err(provider_error(e.to_string())),
        }
    }

    async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        debug!("Fetching profile for {} from Yahoo", symbol);

        // quoteSummary first (richest data), search as fallback
        match self.fetch_quote_summary(symbol).await {
            Ok(result) => Ok(self.map_quote_summary_to_profile(symbol, &result)),
            Err(e) => {
                debug!(
                    "quoteSummary failed for {}: {}, trying search fallback",
                    symbol, e
                );
                self.fetch_search_profile(symbol).await
            }
        }
    }
}

fn provider_error(message: String) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message,
    }
}

/// Convert snake_case sector names to Title Case.
fn format_sector(sector: &str) -> String {
    sector
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
