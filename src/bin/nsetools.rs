use nsetools::config::SessionConfig;
use nsetools::nse::Nse;
use nsetools::services::bhavcopy::{bhavcopy_filename, BhavcopyDownloader};
use nsetools::util;

use anyhow::{Context, Result};
use clap::{App, Arg, ArgMatches, SubCommand};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let app = App::new("nsetools")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Live quotes, indices and historical data from NSE India")
        .arg(
            Arg::with_name("refresh-interval")
                .long("refresh-interval")
                .value_name("SECONDS")
                .help("Re-initialise the browser session after this many seconds")
                .takes_value(true)
                .default_value("120"),
        )
        .arg(
            Arg::with_name("cache-timeout")
                .long("cache-timeout")
                .value_name("SECONDS")
                .help("Serve repeated requests from cache for this many seconds")
                .takes_value(true)
                .default_value("20"),
        )
        .subcommand(
            SubCommand::with_name("quote")
                .about("Quote for a stock")
                .arg(Arg::with_name("code").required(true).help("Stock symbol, e.g. INFY"))
                .arg(
                    Arg::with_name("all")
                        .long("all")
                        .help("Print the full quote payload instead of price info")
                        .takes_value(false),
                ),
        )
        .subcommand(SubCommand::with_name("codes").about("List every equity symbol"))
        .subcommand(movers_command("gainers", "Top gainers of the day"))
        .subcommand(movers_command("losers", "Top losers of the day"))
        .subcommand(SubCommand::with_name("indices").about("List index symbols"))
        .subcommand(
            SubCommand::with_name("index")
                .about("Quote for an index")
                .arg(Arg::with_name("code").required(true).help("Index symbol, e.g. \"NIFTY 50\"")),
        )
        .subcommand(
            SubCommand::with_name("futures")
                .about("Stock futures quotes")
                .arg(Arg::with_name("code").required(true))
                .arg(
                    Arg::with_name("expiry")
                        .short('e')
                        .long("expiry")
                        .value_name("DATE")
                        .help("Only the contract expiring on DATE (e.g. 27-Mar-2025)")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("bhavcopy")
                .about("Download historical equity bhavcopies")
                .arg(
                    Arg::with_name("from")
                        .short('f')
                        .long("from")
                        .value_name("DATE")
                        .help("First day (today, yesterday, DD-MM-YYYY, ...)")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("to")
                        .short('t')
                        .long("to")
                        .value_name("DATE")
                        .help("Last day")
                        .takes_value(true)
                        .default_value("today"),
                )
                .arg(
                    Arg::with_name("out")
                        .short('o')
                        .long("out")
                        .value_name("DIR")
                        .help("Directory to write CSV files to")
                        .takes_value(true)
                        .default_value("."),
                ),
        );

    let matches = app.get_matches();

    let config = SessionConfig::new()
        .with_refresh_interval(seconds_arg(&matches, "refresh-interval")?)
        .with_cache_timeout(seconds_arg(&matches, "cache-timeout")?);
    let mut nse = Nse::with_config(config).context("failed to open NSE session")?;

    match matches.subcommand() {
        Some(("quote", m)) => {
            let code = m.value_of("code").unwrap_or_default();
            print_json(&nse.quote(code, m.is_present("all"))?)?;
        }
        Some(("codes", _)) => print_json(&nse.stock_codes()?)?,
        Some(("gainers", m)) => {
            print_json(&nse.top_gainers(m.value_of("index").unwrap_or("NIFTY"))?)?
        }
        Some(("losers", m)) => {
            print_json(&nse.top_losers(m.value_of("index").unwrap_or("NIFTY"))?)?
        }
        Some(("indices", _)) => print_json(&nse.index_list()?)?,
        Some(("index", m)) => {
            print_json(&nse.index_quote(m.value_of("code").unwrap_or_default())?)?
        }
        Some(("futures", m)) => {
            let code = m.value_of("code").unwrap_or_default();
            match m.value_of("expiry") {
                Some(expiry) => print_json(&nse.future_quote_for(code, expiry)?)?,
                None => print_json(&nse.future_quote(code)?)?,
            }
        }
        Some(("bhavcopy", m)) => {
            let today = chrono::Local::now().date_naive();
            let from = util::usable_date(m.value_of("from").unwrap_or("today"), today)?;
            let to = util::usable_date(m.value_of("to").unwrap_or("today"), today)?;
            let out_dir = PathBuf::from(m.value_of("out").unwrap_or("."));
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("cannot create {}", out_dir.display()))?;

            let mut downloader = BhavcopyDownloader::new(nse.session());
            for (date, csv) in downloader.download_range(from, to, &[])? {
                let path = out_dir.join(bhavcopy_filename(date));
                std::fs::write(&path, csv)?;
                info!("Wrote {}", path.display());
            }
        }
        _ => info!("No command specified. Use --help for usage information."),
    }

    Ok(())
}

fn movers_command(name: &'static str, about: &'static str) -> App<'static> {
    SubCommand::with_name(name).about(about).arg(
        Arg::with_name("index")
            .short('i')
            .long("index")
            .value_name("INDEX")
            .help("One of NIFTY 50, NIFTY BANK, NIFTY NEXT 50, SecGtr20, SecLwr20, FNO, ALL")
            .takes_value(true)
            .default_value("NIFTY"),
    )
}

fn seconds_arg(matches: &ArgMatches, name: &str) -> Result<Duration> {
    let raw = matches.value_of(name).unwrap_or("0");
    let secs = raw
        .parse::<u64>()
        .with_context(|| format!("--{} expects whole seconds, got '{}'", name, raw))?;
    Ok(Duration::from_secs(secs))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
