use url::Url;

use crate::errors::Result;

// Base URLs
pub const NSE_HOME: &str = "https://nseindia.com";
pub const NSE_MAIN: &str = "https://www.nseindia.com";
pub const NSE_LEGACY: &str = "https://www1.nseindia.com";

pub const STOCKS_CSV_URL: &str = "https://nsearchives.nseindia.com/content/equities/EQUITY_L.csv";

pub const TOP_GAINERS_URL: &str = "https://www.nseindia.com/api/live-analysis-variations?index=gainers";
// upstream spelling
pub const TOP_LOSERS_URL: &str = "https://www.nseindia.com/api/live-analysis-variations?index=loosers";
pub const FIFTYTWO_WEEK_HIGH_URL: &str = "https://www.nseindia.com/api/live-analysis-data-52weekhighstock";
pub const FIFTYTWO_WEEK_LOW_URL: &str = "https://www.nseindia.com/api/live-analysis-data-52weeklowstock";

pub const ALL_INDICES_URL: &str = "https://www.nseindia.com/api/allIndices";

pub fn quote_api_url(code: &str) -> Result<String> {
    with_query("/api/quote-equity", "symbol", code)
}

pub fn stocks_in_index_url(index: &str) -> Result<String> {
    with_query("/api/equity-stockIndices", "index", index)
}

pub fn quote_derivative_url(code: &str) -> Result<String> {
    with_query("/api/quote-derivative", "symbol", code)
}

// Symbols such as M&M and index names with spaces need escaping
fn with_query(path: &str, key: &str, value: &str) -> Result<String> {
    let url = Url::parse_with_params(&format!("{}{}", NSE_MAIN, path), &[(key, value)])?;
    Ok(url.into())
}
