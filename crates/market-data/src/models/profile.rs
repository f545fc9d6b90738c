use serde::{Deserialize, Serialize};

/// Descriptive asset data from a market data provider.
///
/// Every field is optional; providers fill in what they know. Financial
/// ratios are plain floats since they are informational only and never
/// enter cost-basis arithmetic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProfile {
    /// Provider that supplied this profile (e.g. "YAHOO")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Company/fund name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ticker symbol as known by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    /// Listing exchange (e.g. "NMS")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    /// Trading currency (ISO 4217)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Business sector (e.g. "Technology")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    /// Industry within the sector (e.g. "Consumer Electronics")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Country of domicile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Market capitalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,

    /// Forward price-to-earnings ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_pe: Option<f64>,

    /// Trailing price-to-earnings ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_pe: Option<f64>,

    /// Price-to-sales ratio (trailing twelve months)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_to_sales: Option<f64>,

    /// Annual dividend rate per share
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_rate: Option<f64>,

    /// Dividend yield as a decimal (0.005 for 0.5%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,

    /// Business description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Company website URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl AssetProfile {
    /// Create a profile carrying only a name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_with_name() {
        let profile = AssetProfile::with_name("Apple Inc.");
        assert_eq!(profile.name, Some("Apple Inc.".to_string()));
        assert!(profile.sector.is_none());
    }

    #[test]
    fn test_profile_skips_absent_fields() {
        let profile = AssetProfile {
            name: Some("Test Company".to_string()),
            sector: Some("Technology".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("Test Company"));
        assert!(json.contains("Technology"));
        assert!(!json.contains("website"));
        assert!(!json.contains("marketCap"));
    }
}
