//! Per-evaluation indicator computation and the latest-value snapshot.
//!
//! `compute_indicators` runs the full battery over one symbol's series;
//! `LatestValues::capture` then pulls the current (last index) and previous
//! (second-last index) values the rule profiles consume. Every extracted
//! value is an `Option`: `None` wherever the underlying point is invalid, so
//! an indeterminate indicator can never reach a rule comparison as NaN.

use crate::domain::indicator::{
    adx, bollinger, calculate_adx, calculate_bollinger, calculate_ema, calculate_macd,
    calculate_rsi, calculate_stochastic, calculate_volume_spike, macd, rsi, stochastic, volume,
    IndicatorSeries, IndicatorValue,
};
use crate::domain::series::SymbolSeries;

pub const DEFAULT_EMA_FAST: usize = 9;
pub const DEFAULT_EMA_SLOW: usize = 21;

#[derive(Debug, Clone)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub stoch_k: usize,
    pub stoch_d: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub adx_period: usize,
    pub bollinger_period: usize,
    pub bollinger_mult_x100: u32,
    pub volume_period: usize,
    pub volume_mult_x100: u32,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            stoch_k: stochastic::DEFAULT_K_PERIOD,
            stoch_d: stochastic::DEFAULT_D_PERIOD,
            ema_fast: DEFAULT_EMA_FAST,
            ema_slow: DEFAULT_EMA_SLOW,
            adx_period: adx::DEFAULT_PERIOD,
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_mult_x100: bollinger::DEFAULT_MULT_X100,
            volume_period: volume::DEFAULT_PERIOD,
            volume_mult_x100: volume::DEFAULT_MULT_X100,
        }
    }
}

/// The indicator battery computed for one evaluation. Owned by the call,
/// discarded with the snapshot.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub rsi: IndicatorSeries,
    pub macd: IndicatorSeries,
    pub stochastic: IndicatorSeries,
    pub ema_fast: IndicatorSeries,
    pub ema_slow: IndicatorSeries,
    pub adx: IndicatorSeries,
    pub bollinger: IndicatorSeries,
    pub volume: IndicatorSeries,
}

pub fn compute_indicators(series: &SymbolSeries, params: &IndicatorParams) -> IndicatorSet {
    let bars = series.bars();
    IndicatorSet {
        rsi: calculate_rsi(bars, params.rsi_period),
        macd: calculate_macd(bars, params.macd_fast, params.macd_slow, params.macd_signal),
        stochastic: calculate_stochastic(bars, params.stoch_k, params.stoch_d),
        ema_fast: calculate_ema(bars, params.ema_fast),
        ema_slow: calculate_ema(bars, params.ema_slow),
        adx: calculate_adx(bars, params.adx_period),
        bollinger: calculate_bollinger(bars, params.bollinger_period, params.bollinger_mult_x100),
        volume: calculate_volume_spike(bars, params.volume_period, params.volume_mult_x100),
    }
}

/// Snapshot of the values a rule profile can consume, taken at the last bar.
#[derive(Debug, Clone)]
pub struct LatestValues {
    pub symbol: String,
    pub close: f64,
    pub volume: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub prev_macd: Option<f64>,
    pub prev_macd_signal: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub adx: Option<f64>,
    pub volume_average: Option<f64>,
    pub volume_spike: Option<bool>,
}

impl LatestValues {
    pub fn capture(series: &SymbolSeries, set: &IndicatorSet) -> Self {
        let last_bar = series.last_bar();
        let last = series.bar_count() - 1;
        let prev = last.checked_sub(1);

        let (macd, macd_signal) = macd_at(&set.macd, Some(last));
        let (prev_macd, prev_macd_signal) = macd_at(&set.macd, prev);
        let (stoch_k, stoch_d) = stoch_at(&set.stochastic, last);
        let (volume_spike, volume_average) = volume_at(&set.volume, last);

        Self {
            symbol: series.symbol().to_string(),
            close: last_bar.close,
            volume: last_bar.volume as f64,
            rsi: set.rsi.simple_at(last),
            macd,
            macd_signal,
            prev_macd,
            prev_macd_signal,
            stoch_k,
            stoch_d,
            ema_fast: set.ema_fast.simple_at(last),
            ema_slow: set.ema_slow.simple_at(last),
            bollinger_lower: bollinger_lower_at(&set.bollinger, last),
            adx: set.adx.simple_at(last),
            volume_average,
            volume_spike,
        }
    }
}

fn macd_at(series: &IndicatorSeries, index: Option<usize>) -> (Option<f64>, Option<f64>) {
    match index.and_then(|i| series.value_at(i)) {
        Some(IndicatorValue::Macd { line, signal, .. }) => (Some(*line), Some(*signal)),
        _ => (None, None),
    }
}

fn stoch_at(series: &IndicatorSeries, index: usize) -> (Option<f64>, Option<f64>) {
    match series.value_at(index) {
        Some(IndicatorValue::Stochastic { k, d }) => (Some(*k), Some(*d)),
        _ => (None, None),
    }
}

fn bollinger_lower_at(series: &IndicatorSeries, index: usize) -> Option<f64> {
    match series.value_at(index) {
        Some(IndicatorValue::Bollinger { lower, .. }) => Some(*lower),
        _ => None,
    }
}

fn volume_at(series: &IndicatorSeries, index: usize) -> (Option<bool>, Option<f64>) {
    match series.value_at(index) {
        Some(IndicatorValue::VolumeSpike { spike, average }) => (Some(*spike), Some(*average)),
        _ => (None, None),
    }
}
