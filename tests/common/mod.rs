#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use intrascan::domain::classify::{CrossoverParams, RuleProfile};
use intrascan::domain::error::ScanError;
pub use intrascan::domain::ohlcv::Bar;
use intrascan::domain::scan::ScanConfig;
use intrascan::domain::snapshot::IndicatorParams;
use intrascan::ports::data_port::{BarRequest, MarketDataPort};
use std::collections::HashMap;

pub struct MockMarketData {
    pub bars: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_bars(&self, symbol: &str, _request: &BarRequest) -> Result<Vec<Bar>, ScanError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScanError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.bars.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScanError> {
        let mut symbols: Vec<String> = self.bars.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn session_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 3)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

pub fn make_bar(symbol: &str, index: usize, close: f64, volume: i64) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        timestamp: session_start() + chrono::Duration::minutes(15 * index as i64),
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume,
    }
}

pub fn make_bars(symbol: &str, closes: &[f64], volumes: &[i64]) -> Vec<Bar> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| make_bar(symbol, i, close, volume))
        .collect()
}

/// 60 bars of a steady climb with constant volume.
pub fn rising_bars(symbol: &str) -> Vec<Bar> {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
    make_bars(symbol, &closes, &vec![1000; 60])
}

/// Small indicator windows so six bars are enough for every warm-up.
pub fn small_indicator_params() -> IndicatorParams {
    IndicatorParams {
        rsi_period: 2,
        macd_fast: 1,
        macd_slow: 3,
        macd_signal: 2,
        stoch_k: 2,
        stoch_d: 2,
        ema_fast: 1,
        ema_slow: 3,
        adx_period: 2,
        bollinger_period: 2,
        bollinger_mult_x100: 200,
        volume_period: 2,
        volume_mult_x100: 150,
    }
}

pub fn small_scan_config() -> ScanConfig {
    ScanConfig {
        request: BarRequest {
            lookback_days: 5,
            interval_minutes: 15,
        },
        min_bars: 6,
        profile: RuleProfile::CrossoverGated(CrossoverParams::default()),
        indicators: small_indicator_params(),
    }
}

/// Decline then a pop at the last bar: MACD(1,3,2) crosses its signal line
/// upward exactly at the final bar with RSI(2) oversold and %K above %D.
pub fn buy_scenario_bars(symbol: &str) -> Vec<Bar> {
    make_bars(
        symbol,
        &[10.0, 10.0, 10.0, 9.0, 8.0, 8.5],
        &[1000, 1000, 1000, 1000, 1000, 2000],
    )
}
