//! Market data access port trait.

use crate::domain::error::ScanError;
use crate::domain::ohlcv::Bar;

/// A (period, interval) bar request: how far back and at what granularity.
#[derive(Debug, Clone, Copy)]
pub struct BarRequest {
    pub lookback_days: u32,
    pub interval_minutes: u32,
}

pub trait MarketDataPort {
    /// Bars for one symbol, oldest first. An empty vec means the provider
    /// has no data for the symbol; the scanner decides what to do with
    /// short series.
    fn fetch_bars(&self, symbol: &str, request: &BarRequest) -> Result<Vec<Bar>, ScanError>;

    fn list_symbols(&self) -> Result<Vec<String>, ScanError>;
}
