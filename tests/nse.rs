mod common;

use common::{session_with, test_config, FakeConnector};
use nsetools::errors::NseError;
use nsetools::nse::{urls, Nse};
use serde_json::json;

fn nse_with(routes: Vec<(&str, Vec<u8>)>) -> (Nse, FakeConnector) {
    let connector = FakeConnector::with_routes(routes);
    let session = session_with(&connector, test_config());
    (Nse::with_session(session), connector)
}

fn body(value: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}

fn all_indices() -> Vec<u8> {
    body(json!({
        "data": [
            {"indexSymbol": "NIFTY 50", "last": "22055.7", "advances": "31", "declines": "19"},
            {"indexSymbol": "NIFTY BANK", "last": 47124.456, "advances": "8", "declines": "4"}
        ]
    }))
}

#[test]
fn quote_returns_normalized_price_info() {
    let url = urls::quote_api_url("INFY").unwrap();
    let (mut nse, _) = nse_with(vec![(
        url.as_str(),
        body(json!({
            "info": {"symbol": "INFY"},
            "priceInfo": {"lastPrice": "1612.456", "change": "-3", "pChange": -0.187}
        })),
    )]);

    let quote = nse.quote("infy", false).unwrap();
    assert_eq!(quote, json!({"lastPrice": 1612.46, "change": -3, "pChange": -0.19}));

    let full = nse.quote("INFY", true).unwrap();
    assert_eq!(full["info"]["symbol"], "INFY");
}

#[test]
fn quote_without_price_info_is_unexpected_shape() {
    let url = urls::quote_api_url("INFY").unwrap();
    let (mut nse, _) = nse_with(vec![(url.as_str(), body(json!({"info": {}})))]);

    assert!(matches!(nse.quote("INFY", false), Err(NseError::UnexpectedShape(_))));
}

#[test]
fn stock_codes_read_symbol_column() {
    let csv = "SYMBOL,NAME OF COMPANY, SERIES\n\
               20MICRONS,20 Microns Limited,EQ\n\
               INFY,Infosys Limited,EQ\n";
    let (mut nse, connector) = nse_with(vec![(urls::STOCKS_CSV_URL, csv.as_bytes().to_vec())]);

    assert_eq!(nse.stock_codes().unwrap(), vec!["20MICRONS", "INFY"]);
    assert!(nse.is_valid_code("infy").unwrap());
    assert!(!nse.is_valid_code("TCS").unwrap());
    // listing fetched once, then served from cache
    assert_eq!(connector.calls.gets(), 1);
}

#[test]
fn index_list_and_quote() {
    let (mut nse, connector) = nse_with(vec![(urls::ALL_INDICES_URL, all_indices())]);

    assert_eq!(nse.index_list().unwrap(), vec!["NIFTY 50", "NIFTY BANK"]);

    let quote = nse.index_quote("  nifty   bank ").unwrap();
    assert_eq!(quote["last"], json!(47124.46));

    let breadth = nse.advances_declines("nifty 50").unwrap();
    assert_eq!((breadth.advances, breadth.declines), (31, 19));

    assert!(matches!(nse.index_quote("NIFTY IT"), Err(NseError::InvalidIndex(_))));
    assert_eq!(connector.calls.gets(), 1);
}

#[test]
fn all_index_quote_is_not_normalized() {
    let (mut nse, _) = nse_with(vec![(urls::ALL_INDICES_URL, all_indices())]);
    let all = nse.all_index_quote().unwrap();
    assert_eq!(all[0]["last"], json!("22055.7"));
}

#[test]
fn stocks_in_index_skips_index_row() {
    let url = urls::stocks_in_index_url("NIFTY 50").unwrap();
    let (mut nse, _) = nse_with(vec![(
        url.as_str(),
        body(json!({"data": [{"symbol": "NIFTY 50"}, {"symbol": "INFY"}, {"symbol": "TCS"}]})),
    )]);

    assert_eq!(nse.stocks_in_index("nifty 50").unwrap(), vec!["INFY", "TCS"]);
}

#[test]
fn stocks_in_index_skips_first_row_by_position() {
    let url = urls::stocks_in_index_url("NIFTY 50").unwrap();
    let (mut nse, _) = nse_with(vec![(
        url.as_str(),
        body(json!({"data": [{"index": "NIFTY 50"}, {"symbol": "INFY"}, {"symbol": "TCS"}]})),
    )]);

    assert_eq!(nse.stocks_in_index("NIFTY 50").unwrap(), vec!["INFY", "TCS"]);
}

#[test]
fn stock_quote_in_index_filters_on_priority() {
    let url = urls::stocks_in_index_url("NIFTY BANK").unwrap();
    let (mut nse, connector) = nse_with(vec![(
        url.as_str(),
        body(json!({
            "name": "NIFTY BANK",
            "data": [
                {"symbol": "NIFTY BANK", "priority": 1, "lastPrice": "47124.456"},
                {
                    "symbol": "HDFCBANK", "priority": 0,
                    "lastPrice": "1450.05", "totalTradedVolume": "812345"
                },
                {"symbol": "SBIN", "priority": "0", "lastPrice": 760.126, "totalTradedVolume": 99}
            ]
        })),
    )]);

    let stocks = nse.stock_quote_in_index("nifty bank", false).unwrap();
    assert_eq!(stocks.len(), 2);
    assert_eq!(stocks[0]["symbol"], "HDFCBANK");
    assert_eq!(stocks[0]["lastPrice"], json!(1450.05));
    assert_eq!(stocks[0]["totalTradedVolume"], json!(812345));
    assert_eq!(stocks[1]["lastPrice"], json!(760.13));

    let with_index = nse.stock_quote_in_index("NIFTY BANK", true).unwrap();
    assert_eq!(with_index.len(), 3);
    assert_eq!(with_index[0]["symbol"], "NIFTY BANK");
    assert_eq!(with_index[0]["lastPrice"], json!(47124.46));

    // second call is served from cache
    assert_eq!(connector.calls.gets(), 1);
}

#[test]
fn gainers_and_losers_pick_bucket() {
    let payload = |sym: &str| {
        body(json!({
            "NIFTY": {"data": [{"symbol": sym, "perChange": "2.346"}]},
            "BANKNIFTY": {"data": [{"symbol": "HDFCBANK", "perChange": "1"}]},
            "allSec": {"data": []}
        }))
    };
    let (mut nse, _) = nse_with(vec![
        (urls::TOP_GAINERS_URL, payload("INFY")),
        (urls::TOP_LOSERS_URL, payload("TCS")),
    ]);

    let gainers = nse.top_gainers("NIFTY 50").unwrap();
    assert_eq!(gainers, vec![json!({"symbol": "INFY", "perChange": 2.35})]);

    let losers = nse.top_losers("nifty").unwrap();
    assert_eq!(losers[0]["symbol"], "TCS");

    assert_eq!(nse.top_gainers("banknifty").unwrap()[0]["perChange"], json!(1));
    assert!(nse.top_losers("ALL").unwrap().is_empty());
    assert!(matches!(nse.top_gainers("SENSEX"), Err(NseError::InvalidIndex(_))));
    // bucket present in alias table but absent upstream
    assert!(matches!(nse.top_gainers("FNO"), Err(NseError::UnexpectedShape(_))));
}

#[test]
fn fifty_two_week_extremes() {
    let (mut nse, _) = nse_with(vec![
        (
            urls::FIFTYTWO_WEEK_HIGH_URL,
            body(json!({"data": [{"symbol": "INFY", "new52WHL": "1900.123"}]})),
        ),
        (urls::FIFTYTWO_WEEK_LOW_URL, body(json!({"data": []}))),
    ]);

    assert_eq!(nse.fifty_two_week_high().unwrap()[0]["new52WHL"], json!(1900.12));
    assert!(nse.fifty_two_week_low().unwrap().is_empty());
}

fn derivative_record(instrument: &str, expiry: &str, last: f64) -> serde_json::Value {
    json!({
        "underlyingValue": 1600.0,
        "metadata": {
            "instrumentType": instrument, "expiryDate": expiry, "lastPrice": last,
            "openPrice": 1601, "highPrice": 1620, "lowPrice": 1590, "closePrice": 0,
            "prevClose": 1598.5, "change": 7.5, "pChange": 0.47,
            "numberOfContractsTraded": 1000, "totalTurnover": 123456.789
        },
        "marketDeptOrderBook": {
            "tradeInfo": {"tradedVolume": 400000, "openInterest": 2000, "changeinOpenInterest": 10,
                          "pchangeinOpenInterest": 0.5, "marketLot": 400},
            "otherInfo": {"dailyvolatility": "1.1", "annualisedVolatility": "21.02"}
        }
    })
}

#[test]
fn futures_are_filtered_and_flattened() {
    let url = urls::quote_derivative_url("INFY").unwrap();
    let (mut nse, _) = nse_with(vec![(
        url.as_str(),
        body(json!({
            "stocks": [
                derivative_record("Stock Futures", "27-Mar-2025", 1606.0),
                derivative_record("Stock Options", "27-Mar-2025", 12.0),
                derivative_record("Stock Futures", "24-Apr-2025", 1612.25)
            ]
        })),
    )]);

    let futures = nse.future_quote("infy").unwrap();
    assert_eq!(futures.len(), 2);
    assert_eq!(futures[0].premium, 6.0);
    assert_eq!(futures[0].total_turnover, 123456.79);
    assert_eq!(futures[1].expiry_date, "24-Apr-2025");

    let counts = serde_json::to_value(&futures[0]).unwrap();
    assert_eq!(counts["openInterest"], json!(2000));
    assert_eq!(counts["marketLot"], json!(400));
    assert_eq!(counts["numberOfContractsTraded"], json!(1000));
    assert_eq!(futures[0].change_in_open_interest, 10);

    let april = nse.future_quote_for("INFY", "24-Apr-2025").unwrap();
    assert_eq!(april.premium, 12.25);

    assert!(matches!(
        nse.future_quote_for("INFY", "29-May-2025"),
        Err(NseError::UnexpectedShape(_))
    ));
}

#[test]
fn display_names_the_exchange() {
    let (nse, _) = nse_with(vec![]);
    assert_eq!(nse.to_string(), "Driver Class for National Stock Exchange (NSE)");
}
