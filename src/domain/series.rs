//! Validated per-symbol bar sequence.
//!
//! A `SymbolSeries` is immutable once constructed: the constructor checks the
//! bar invariants (strictly increasing timestamps, high/low consistency,
//! non-negative volume) and rejects the whole series if any bar violates
//! them. Indicator computations borrow the bars; nothing mutates them.

use crate::domain::ohlcv::Bar;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,

    #[error("timestamps not strictly increasing at bar {index}")]
    NonMonotonicTimestamps { index: usize },

    #[error("inconsistent high/low range at bar {index}")]
    InvalidRange { index: usize },

    #[error("negative volume at bar {index}")]
    NegativeVolume { index: usize },
}

#[derive(Debug, Clone)]
pub struct SymbolSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl SymbolSeries {
    pub fn new(symbol: String, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (i, bar) in bars.iter().enumerate() {
            let body_high = bar.open.max(bar.close);
            let body_low = bar.open.min(bar.close);
            if bar.high < bar.low || bar.high < body_high || bar.low > body_low {
                return Err(SeriesError::InvalidRange { index: i });
            }
            if bar.volume < 0 {
                return Err(SeriesError::NegativeVolume { index: i });
            }
            if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
                return Err(SeriesError::NonMonotonicTimestamps { index: i });
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn last_bar(&self) -> &Bar {
        // Constructor rejects empty series.
        &self.bars[self.bars.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(minute: u32, close: f64) -> Bar {
        Bar {
            symbol: "AAPL".into(),
            timestamp: NaiveDate::from_ymd_opt(2024, 6, 3)
                .unwrap()
                .and_hms_opt(10, minute, 0)
                .unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn accepts_well_formed_bars() {
        let series =
            SymbolSeries::new("AAPL".into(), vec![bar(0, 100.0), bar(15, 101.0)]).unwrap();
        assert_eq!(series.bar_count(), 2);
        assert_eq!(series.symbol(), "AAPL");
        assert!((series.last_bar().close - 101.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_empty_series() {
        let result = SymbolSeries::new("AAPL".into(), vec![]);
        assert!(matches!(result, Err(SeriesError::Empty)));
    }

    #[test]
    fn rejects_out_of_order_timestamps() {
        let result = SymbolSeries::new("AAPL".into(), vec![bar(15, 100.0), bar(0, 101.0)]);
        assert!(matches!(
            result,
            Err(SeriesError::NonMonotonicTimestamps { index: 1 })
        ));
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let result = SymbolSeries::new("AAPL".into(), vec![bar(0, 100.0), bar(0, 101.0)]);
        assert!(matches!(
            result,
            Err(SeriesError::NonMonotonicTimestamps { index: 1 })
        ));
    }

    #[test]
    fn rejects_high_below_low() {
        let mut broken = bar(0, 100.0);
        broken.high = 98.0;
        let result = SymbolSeries::new("AAPL".into(), vec![broken]);
        assert!(matches!(result, Err(SeriesError::InvalidRange { index: 0 })));
    }

    #[test]
    fn rejects_close_outside_range() {
        let mut broken = bar(0, 100.0);
        broken.close = 102.0; // above high of 101
        let result = SymbolSeries::new("AAPL".into(), vec![broken]);
        assert!(matches!(result, Err(SeriesError::InvalidRange { index: 0 })));
    }

    #[test]
    fn rejects_negative_volume() {
        let mut broken = bar(0, 100.0);
        broken.volume = -1;
        let result = SymbolSeries::new("AAPL".into(), vec![broken]);
        assert!(matches!(
            result,
            Err(SeriesError::NegativeVolume { index: 0 })
        ));
    }
}
