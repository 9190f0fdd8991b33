//! CSV bar-file data adapter.
//!
//! Serves bars from `{SYMBOL}_{interval}m.csv` files with the columns
//! `timestamp,open,high,low,close,volume` and `%Y-%m-%d %H:%M` timestamps.
//! Bars are sorted and trimmed to the lookback window measured from the
//! newest bar in the file, so a fixture directory scans the same way every
//! time regardless of wall clock.

use crate::domain::error::ScanError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::{BarRequest, MarketDataPort};
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
pub struct CsvBarsAdapter {
    base_path: PathBuf,
}

impl CsvBarsAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval_minutes: u32) -> PathBuf {
        self.base_path
            .join(format!("{}_{}m.csv", symbol, interval_minutes))
    }
}

fn column<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'a str, ScanError> {
    record.get(index).ok_or_else(|| ScanError::DataSource {
        reason: format!("missing {} column", name),
    })
}

fn numeric_column<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, ScanError>
where
    T::Err: std::fmt::Display,
{
    column(record, index, name)?
        .parse()
        .map_err(|e| ScanError::DataSource {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl MarketDataPort for CsvBarsAdapter {
    fn fetch_bars(&self, symbol: &str, request: &BarRequest) -> Result<Vec<Bar>, ScanError> {
        let path = self.csv_path(symbol, request.interval_minutes);
        let content = fs::read_to_string(&path).map_err(|e| ScanError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ScanError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp_str = column(&record, 0, "timestamp")?;
            let timestamp = NaiveDateTime::parse_from_str(timestamp_str, "%Y-%m-%d %H:%M")
                .map_err(|e| ScanError::DataSource {
                    reason: format!("invalid timestamp format: {}", e),
                })?;

            bars.push(Bar {
                symbol: symbol.to_string(),
                timestamp,
                open: numeric_column(&record, 1, "open")?,
                high: numeric_column(&record, 2, "high")?,
                low: numeric_column(&record, 3, "low")?,
                close: numeric_column(&record, 4, "close")?,
                volume: numeric_column(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);

        if let Some(newest) = bars.last().map(|b| b.timestamp) {
            let cutoff = newest - chrono::Duration::days(i64::from(request.lookback_days));
            bars.retain(|b| b.timestamp > cutoff);
        }

        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScanError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ScanError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScanError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            // {SYMBOL}_{interval}m.csv, any interval
            let Some(stem) = name_str.strip_suffix(".csv") else {
                continue;
            };
            let Some((symbol, tail)) = stem.rsplit_once('_') else {
                continue;
            };
            if let Some(digits) = tail.strip_suffix('m') {
                if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }
}
