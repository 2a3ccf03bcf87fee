use serde::Serialize;

/// Advance/decline breadth of an index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancesDeclines {
    pub advances: i64,
    pub declines: i64,
}

/// Flattened view of one stock-futures contract from the derivative quote API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureQuote {
    pub expiry_date: String,
    pub last_price: f64,
    pub premium: f64,          // lastPrice - underlyingValue
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub prev_close: f64,
    pub change: f64,
    pub p_change: f64,
    pub number_of_contracts_traded: i64,
    pub total_turnover: f64,
    pub underlying_value: f64,
    pub traded_volume: i64,
    pub open_interest: i64,
    pub change_in_open_interest: i64,
    pub pchange_in_open_interest: f64,
    pub market_lot: i64,
    pub daily_volatility: f64,
    pub annualised_volatility: f64,
}
