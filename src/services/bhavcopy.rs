use std::io::{Cursor, Read};

use chrono::NaiveDate;
use log::{debug, info, warn};
use reqwest::StatusCode;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::errors::{NseError, Result};
use crate::nse::urls::NSE_LEGACY;
use crate::session::Session;
use crate::util;

/// Archive URL of the equity bhavcopy for `date`, e.g.
/// `.../EQUITIES/2011/NOV/cm08NOV2011bhav.csv.zip`.
pub fn bhavcopy_url(date: NaiveDate) -> String {
    let mon = date.format("%b").to_string().to_uppercase();
    format!(
        "{}/content/historical/EQUITIES/{}/{}/{}.zip",
        NSE_LEGACY,
        date.format("%Y"),
        mon,
        bhavcopy_filename(date)
    )
}

/// Name of the CSV member inside the archive, e.g. `cm08NOV2011bhav.csv`.
pub fn bhavcopy_filename(date: NaiveDate) -> String {
    let mon = date.format("%b").to_string().to_uppercase();
    format!("cm{}{}{}bhav.csv", date.format("%d"), mon, date.format("%Y"))
}

/// Pulls the bhavcopy CSV for `date` out of a downloaded zip archive.
pub fn extract_bhavcopy(archive: &[u8], date: NaiveDate) -> Result<String> {
    // Closed-market days come back as an HTML page instead of a zip
    let mut zip = match ZipArchive::new(Cursor::new(archive)) {
        Ok(zip) => zip,
        Err(e) => {
            debug!("Payload for {} is not a zip archive: {}", date, e);
            return Err(NseError::BhavcopyNotAvailable(date));
        }
    };

    let mut member = match zip.by_name(&bhavcopy_filename(date)) {
        Ok(member) => member,
        Err(ZipError::FileNotFound) => return Err(NseError::BhavcopyNotAvailable(date)),
        Err(e) => return Err(e.into()),
    };

    let mut csv = String::new();
    member.read_to_string(&mut csv)?;
    Ok(csv)
}

/// Downloads daily equity bhavcopies through an NSE session.
pub struct BhavcopyDownloader<'a> {
    session: &'a mut Session,
}

impl<'a> BhavcopyDownloader<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    pub fn download_one(&mut self, date: NaiveDate) -> Result<String> {
        let url = bhavcopy_url(date);
        info!("Downloading bhavcopy for {} from {}", date, url);
        let resp = match self.session.fetch(&url) {
            Ok(resp) => resp,
            Err(NseError::RequestError(e)) if e.status() == Some(StatusCode::NOT_FOUND) => {
                return Err(NseError::BhavcopyNotAvailable(date));
            }
            Err(e) => return Err(e),
        };
        extract_bhavcopy(resp.bytes(), date)
    }

    /// Downloads every trading day in `[from, to]`. Days without an archive
    /// are logged and skipped; any other failure aborts the run. Archive
    /// bodies stay in the session's cache until it is flushed.
    pub fn download_range(
        &mut self,
        from: NaiveDate,
        to: NaiveDate,
        skip: &[NaiveDate],
    ) -> Result<Vec<(NaiveDate, String)>> {
        let mut out = Vec::new();
        for date in util::date_range(from, to, skip) {
            match self.download_one(date) {
                Ok(csv) => out.push((date, csv)),
                Err(NseError::BhavcopyNotAvailable(d)) => {
                    warn!("Bhavcopy not available for {}, skipping", d);
                }
                Err(e) => return Err(e),
            }
        }
        info!("Downloaded {} bhavcopies", out.len());
        Ok(out)
    }
}
