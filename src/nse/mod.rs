pub mod urls;

use std::fmt;
use std::time::Duration;

use log::{debug, info};
use serde_json::Value;

use crate::config::SessionConfig;
use crate::errors::{NseError, Result};
use crate::models::market::{AdvancesDeclines, FutureQuote};
use crate::normalizer::{normalize_default, round_to, DEFAULT_ROUND_DIGITS};
use crate::session::{ResponseCache, Session};

/// Client for the National Stock Exchange of India's public JSON endpoints.
pub struct Nse {
    session: Session,
}

impl Nse {
    /// Connects with a 120 second session refresh over the process-wide cache.
    pub fn new() -> Result<Self> {
        Self::with_refresh_interval(Duration::from_secs(120))
    }

    pub fn with_refresh_interval(interval: Duration) -> Result<Self> {
        let config = SessionConfig::new().with_refresh_interval(interval);
        Self::with_config(config)
    }

    pub fn with_config(config: SessionConfig) -> Result<Self> {
        let session = Session::new(config, ResponseCache::shared())?;
        Ok(Self::with_session(session))
    }

    pub fn with_session(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    fn fetch_json(&mut self, url: &str) -> Result<Value> {
        let resp = self.session.fetch(url)?;
        resp.json()
    }

    // ---------- stocks ----------

    /// Every equity symbol listed on NSE.
    pub fn stock_codes(&mut self) -> Result<Vec<String>> {
        let resp = self.session.fetch(urls::STOCKS_CSV_URL)?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(resp.bytes());

        let symbol_col = reader
            .headers()?
            .iter()
            .position(|h| h == "SYMBOL")
            .ok_or_else(|| {
                NseError::UnexpectedShape("SYMBOL column missing from equity list".to_string())
            })?;

        let mut symbols = Vec::new();
        for record in reader.records() {
            if let Some(symbol) = record?.get(symbol_col) {
                symbols.push(symbol.to_string());
            }
        }
        debug!("Loaded {} stock codes", symbols.len());
        Ok(symbols)
    }

    pub fn is_valid_code(&mut self, code: &str) -> Result<bool> {
        let code = code.to_uppercase();
        Ok(self.stock_codes()?.iter().any(|c| *c == code))
    }

    /// Price information for `code`, or the full quote payload when
    /// `all_data` is set.
    pub fn quote(&mut self, code: &str, all_data: bool) -> Result<Value> {
        let url = urls::quote_api_url(&code.to_uppercase())?;
        let payload = self.fetch_json(&url)?;
        if all_data {
            return Ok(normalize_default(&payload));
        }
        Ok(normalize_default(field(&payload, "priceInfo")?))
    }

    pub fn fifty_two_week_high(&mut self) -> Result<Vec<Value>> {
        let payload = self.fetch_json(urls::FIFTYTWO_WEEK_HIGH_URL)?;
        array(&normalize_default(&payload), "data")
    }

    pub fn fifty_two_week_low(&mut self) -> Result<Vec<Value>> {
        let payload = self.fetch_json(urls::FIFTYTWO_WEEK_LOW_URL)?;
        array(&normalize_default(&payload), "data")
    }

    // ---------- indices ----------

    /// Raw quote of every index, as published.
    pub fn all_index_quote(&mut self) -> Result<Vec<Value>> {
        let payload = self.fetch_json(urls::ALL_INDICES_URL)?;
        array(&payload, "data")
    }

    pub fn index_list(&mut self) -> Result<Vec<String>> {
        Ok(self
            .all_index_quote()?
            .iter()
            .filter_map(|idx| idx.get("indexSymbol").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }

    /// Quote for one index. `code` is matched case-insensitively with runs
    /// of whitespace collapsed, so `"nifty   50"` finds `NIFTY 50`.
    pub fn index_quote(&mut self, code: &str) -> Result<Value> {
        let code = code.to_uppercase().split_whitespace().collect::<Vec<_>>().join(" ");
        self.all_index_quote()?
            .iter()
            .find(|idx| idx.get("indexSymbol").and_then(Value::as_str) == Some(code.as_str()))
            .map(normalize_default)
            .ok_or(NseError::InvalidIndex(code))
    }

    pub fn advances_declines(&mut self, code: &str) -> Result<AdvancesDeclines> {
        let quote = self.index_quote(code)?;
        Ok(AdvancesDeclines {
            advances: integer(&quote, "advances")?,
            declines: integer(&quote, "declines")?,
        })
    }

    /// Constituent symbols of `index`. The first row of the payload is the
    /// index itself and is skipped.
    pub fn stocks_in_index(&mut self, index: &str) -> Result<Vec<String>> {
        let url = urls::stocks_in_index_url(&index.to_uppercase())?;
        let payload = self.fetch_json(&url)?;
        Ok(array(&payload, "data")?
            .iter()
            .skip(1)
            .filter_map(|stock| stock.get("symbol").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }

    /// Normalized quotes of every constituent of `index`. The index's own
    /// row (non-zero `priority`) is only kept when `include_index` is set.
    pub fn stock_quote_in_index(
        &mut self,
        index: &str,
        include_index: bool,
    ) -> Result<Vec<Value>> {
        let url = urls::stocks_in_index_url(&index.to_uppercase())?;
        let payload = normalize_default(&self.fetch_json(&url)?);
        let records = array(&payload, "data")?;
        if include_index {
            return Ok(records);
        }
        Ok(records
            .into_iter()
            .filter(|r| r.get("priority").and_then(Value::as_i64) == Some(0))
            .collect())
    }

    pub fn top_gainers(&mut self, index: &str) -> Result<Vec<Value>> {
        self.top_movers(urls::TOP_GAINERS_URL, index)
    }

    pub fn top_losers(&mut self, index: &str) -> Result<Vec<Value>> {
        self.top_movers(urls::TOP_LOSERS_URL, index)
    }

    fn top_movers(&mut self, url: &str, index: &str) -> Result<Vec<Value>> {
        let bucket = movers_bucket(index)?;
        let payload = normalize_default(&self.fetch_json(url)?);
        array(field(&payload, bucket)?, "data")
    }

    // ---------- derivatives ----------

    /// Every stock-futures contract currently quoted for `code`.
    pub fn future_quote(&mut self, code: &str) -> Result<Vec<FutureQuote>> {
        let url = urls::quote_derivative_url(&code.to_uppercase())?;
        let payload = normalize_default(&self.fetch_json(&url)?);

        let futures = array(&payload, "stocks")?
            .iter()
            .filter(|s| {
                s.pointer("/metadata/instrumentType")
                    .and_then(Value::as_str)
                    .map_or(false, |kind| kind == "Stock Futures")
            })
            .map(flatten_future)
            .collect::<Result<Vec<_>>>()?;

        info!("Found {} futures contracts for {}", futures.len(), code);
        Ok(futures)
    }

    /// The futures contract for `code` expiring on `expiry_date`, in the
    /// upstream date format (e.g. `27-Mar-2025`).
    pub fn future_quote_for(&mut self, code: &str, expiry_date: &str) -> Result<FutureQuote> {
        self.future_quote(code)?
            .into_iter()
            .find(|f| f.expiry_date == expiry_date)
            .ok_or_else(|| {
                NseError::UnexpectedShape(format!(
                    "no futures contract for {} expiring {}",
                    code, expiry_date
                ))
            })
    }
}

impl fmt::Display for Nse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Driver Class for National Stock Exchange (NSE)")
    }
}

/// Maps user-facing index names onto the bucket keys of the gainers/losers API.
pub fn movers_bucket(index: &str) -> Result<&'static str> {
    match index.to_uppercase().as_str() {
        "NIFTY" | "NIFTY 50" => Ok("NIFTY"),
        "NIFTY BANK" | "BANKNIFTY" => Ok("BANKNIFTY"),
        "NIFTYNEXT50" | "NIFTY NEXT 50" => Ok("NIFTYNEXT50"),
        "SECGTR20" => Ok("SecGtr20"),
        "SECLWR20" => Ok("SecLwr20"),
        "FNO" => Ok("FOSec"),
        "ALL" => Ok("allSec"),
        _ => Err(NseError::InvalidIndex(format!(
            "{} (expected one of NIFTY 50, NIFTY BANK, NIFTY NEXT 50, SecGtr20, SecLwr20, FNO, ALL)",
            index
        ))),
    }
}

fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    value
        .get(key)
        .ok_or_else(|| NseError::UnexpectedShape(format!("missing key '{}'", key)))
}

fn array(value: &Value, key: &str) -> Result<Vec<Value>> {
    field(value, key)?
        .as_array()
        .cloned()
        .ok_or_else(|| NseError::UnexpectedShape(format!("'{}' is not an array", key)))
}

fn integer(value: &Value, key: &str) -> Result<i64> {
    field(value, key)?
        .as_i64()
        .ok_or_else(|| NseError::UnexpectedShape(format!("'{}' is not an integer", key)))
}

fn number_at(value: &Value, pointer: &str) -> Result<f64> {
    value
        .pointer(pointer)
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            NseError::UnexpectedShape(format!("'{}' is missing or not numeric", pointer))
        })
}

// Counts may arrive as whole floats, e.g. 400.0
fn integer_at(value: &Value, pointer: &str) -> Result<i64> {
    let v = value.pointer(pointer);
    v.and_then(Value::as_i64)
        .or_else(|| {
            v.and_then(Value::as_f64)
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
        .ok_or_else(|| {
            NseError::UnexpectedShape(format!("'{}' is missing or not an integer", pointer))
        })
}

const TRADE_INFO: &str = "/marketDeptOrderBook/tradeInfo";
const OTHER_INFO: &str = "/marketDeptOrderBook/otherInfo";

fn flatten_future(record: &Value) -> Result<FutureQuote> {
    let expiry_date = record
        .pointer("/metadata/expiryDate")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            NseError::UnexpectedShape("futures record without expiryDate".to_string())
        })?
        .to_string();

    let last_price = number_at(record, "/metadata/lastPrice")?;
    let underlying_value = number_at(record, "/underlyingValue")?;

    Ok(FutureQuote {
        expiry_date,
        last_price,
        premium: round_to(last_price - underlying_value, DEFAULT_ROUND_DIGITS),
        open_price: number_at(record, "/metadata/openPrice")?,
        high_price: number_at(record, "/metadata/highPrice")?,
        low_price: number_at(record, "/metadata/lowPrice")?,
        close_price: number_at(record, "/metadata/closePrice")?,
        prev_close: number_at(record, "/metadata/prevClose")?,
        change: number_at(record, "/metadata/change")?,
        p_change: number_at(record, "/metadata/pChange")?,
        number_of_contracts_traded: integer_at(record, "/metadata/numberOfContractsTraded")?,
        total_turnover: number_at(record, "/metadata/totalTurnover")?,
        underlying_value,
        traded_volume: integer_at(record, &format!("{}/tradedVolume", TRADE_INFO))?,
        open_interest: integer_at(record, &format!("{}/openInterest", TRADE_INFO))?,
        change_in_open_interest: integer_at(
            record,
            &format!("{}/changeinOpenInterest", TRADE_INFO),
        )?,
        pchange_in_open_interest: number_at(
            record,
            &format!("{}/pchangeinOpenInterest", TRADE_INFO),
        )?,
        market_lot: integer_at(record, &format!("{}/marketLot", TRADE_INFO))?,
        // upstream key is not camel cased
        daily_volatility: number_at(record, &format!("{}/dailyvolatility", OTHER_INFO))?,
        annualised_volatility: number_at(
            record,
            &format!("{}/annualisedVolatility", OTHER_INFO),
        )?,
    })
}
