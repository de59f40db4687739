//! Row sources: local CSV files and published-spreadsheet CSV exports.
//!
//! Both produce the same `(headers, rows)` shape consumed by the row parser.
//! Acquisition failures here are fatal setup errors; the import exits before
//! any write occurs.

use std::path::Path;

use crate::error::ImportError;

/// A header row plus data rows, as parsed from a CSV source.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Read a local CSV file with a header row.
///
/// # Errors
///
/// Returns [`ImportError::SourceIo`] if the file cannot be opened,
/// [`ImportError::Csv`] on malformed CSV, or [`ImportError::EmptySource`]
/// if there are no data rows.
pub fn read_csv_path(path: &Path) -> Result<RawTable, ImportError> {
    let file = std::fs::File::open(path).map_err(|e| ImportError::SourceIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let table = parse_csv_reader(file)?;
    if table.rows.is_empty() {
        return Err(ImportError::EmptySource {
            source_name: path.display().to_string(),
        });
    }
    Ok(table)
}

/// Fetch a published-CSV export (e.g. a Google Sheets "publish to web" URL)
/// and parse it.
///
/// # Errors
///
/// Returns [`ImportError::Fetch`] on a network failure or non-2xx status,
/// [`ImportError::Csv`] on malformed CSV, or [`ImportError::EmptySource`]
/// if the body has no data rows.
pub async fn fetch_csv_url(url: &str, timeout_secs: u64) -> Result<RawTable, ImportError> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ImportError::Fetch {
            url: url.to_string(),
            source: e,
        })?;

    let body = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| ImportError::Fetch {
            url: url.to_string(),
            source: e,
        })?
        .text()
        .await
        .map_err(|e| ImportError::Fetch {
            url: url.to_string(),
            source: e,
        })?;

    let table = parse_csv_reader(body.as_bytes())?;
    if table.rows.is_empty() {
        return Err(ImportError::EmptySource {
            source_name: url.to_string(),
        });
    }
    Ok(table)
}

fn parse_csv_reader<R: std::io::Read>(reader: R) -> Result<RawTable, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}
