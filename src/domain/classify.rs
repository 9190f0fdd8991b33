//! Rule profiles and signal classification.
//!
//! Two rule families, both driven by configuration rather than code:
//!
//! - `CrossoverGated`: a MACD/signal-line crossover between the previous and
//!   current bar, gated by an RSI threshold, an optional stochastic %K/%D
//!   ordering, and a volume gate.
//! - `ScoreBased`: one point per satisfied bullish condition (oversold RSI,
//!   MACD above signal, fast EMA above slow, close below the lower Bollinger
//!   band, trending ADX); BUY at or above `buy_score`, SELL at or below
//!   `sell_score`.
//!
//! If any value the active profile needs is absent (indicator still in
//! warm-up, or indeterminate), classification yields no signal. Comparisons
//! only ever see finite numbers.

use crate::domain::signal::{Direction, Signal, SignalMetrics};
use crate::domain::snapshot::LatestValues;

pub const DEFAULT_RSI_BUY_MAX: f64 = 40.0;
pub const DEFAULT_RSI_SELL_MIN: f64 = 60.0;
pub const DEFAULT_RSI_OVERSOLD: f64 = 30.0;
pub const DEFAULT_ADX_TREND: f64 = 25.0;
pub const DEFAULT_BUY_SCORE: u32 = 4;
pub const DEFAULT_SELL_SCORE: u32 = 1;

/// Strict two-point crossover test: A closes above B having been below it on
/// the previous bar. Ties at either point count as no-crossover.
pub fn cross_up(prev_a: f64, prev_b: f64, curr_a: f64, curr_b: f64) -> bool {
    prev_a < prev_b && curr_a > curr_b
}

pub fn cross_down(prev_a: f64, prev_b: f64, curr_a: f64, curr_b: f64) -> bool {
    prev_a > prev_b && curr_a < curr_b
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeGate {
    /// Latest volume strictly positive (the reference behavior).
    Positive,
    /// Latest volume above its rolling average.
    AboveAverage,
    /// Latest volume above multiplier x rolling average.
    Spike,
}

impl VolumeGate {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "positive" => Some(VolumeGate::Positive),
            "above-average" => Some(VolumeGate::AboveAverage),
            "spike" => Some(VolumeGate::Spike),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrossoverParams {
    pub rsi_buy_max: f64,
    pub rsi_sell_min: f64,
    pub require_stochastic: bool,
    pub volume_gate: VolumeGate,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            rsi_buy_max: DEFAULT_RSI_BUY_MAX,
            rsi_sell_min: DEFAULT_RSI_SELL_MIN,
            require_stochastic: true,
            volume_gate: VolumeGate::Positive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoreParams {
    pub rsi_oversold: f64,
    pub adx_trend: f64,
    pub buy_score: u32,
    pub sell_score: u32,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            rsi_oversold: DEFAULT_RSI_OVERSOLD,
            adx_trend: DEFAULT_ADX_TREND,
            buy_score: DEFAULT_BUY_SCORE,
            sell_score: DEFAULT_SELL_SCORE,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RuleProfile {
    CrossoverGated(CrossoverParams),
    ScoreBased(ScoreParams),
}

impl RuleProfile {
    pub fn name(&self) -> &'static str {
        match self {
            RuleProfile::CrossoverGated(_) => "crossover",
            RuleProfile::ScoreBased(_) => "score",
        }
    }
}

pub fn classify(latest: &LatestValues, profile: &RuleProfile) -> Option<Signal> {
    match profile {
        RuleProfile::CrossoverGated(params) => classify_crossover(latest, params),
        RuleProfile::ScoreBased(params) => classify_score(latest, params),
    }
}

fn classify_crossover(latest: &LatestValues, params: &CrossoverParams) -> Option<Signal> {
    let (Some(rsi), Some(macd), Some(macd_signal), Some(prev_macd), Some(prev_signal)) = (
        latest.rsi,
        latest.macd,
        latest.macd_signal,
        latest.prev_macd,
        latest.prev_macd_signal,
    ) else {
        return None;
    };

    let stoch = if params.require_stochastic {
        match (latest.stoch_k, latest.stoch_d) {
            (Some(k), Some(d)) => Some((k, d)),
            _ => return None,
        }
    } else {
        None
    };

    if !volume_gate_open(latest, params.volume_gate)? {
        return None;
    }

    let crossed_up = cross_up(prev_macd, prev_signal, macd, macd_signal);
    let crossed_down = cross_down(prev_macd, prev_signal, macd, macd_signal);

    let direction = if crossed_up
        && rsi < params.rsi_buy_max
        && stoch.is_none_or(|(k, d)| k > d)
    {
        Direction::Buy
    } else if crossed_down
        && rsi > params.rsi_sell_min
        && stoch.is_none_or(|(k, d)| k < d)
    {
        Direction::Sell
    } else {
        return None;
    };

    Some(Signal {
        symbol: latest.symbol.clone(),
        direction,
        metrics: SignalMetrics {
            rsi,
            macd,
            macd_signal,
            stoch_k: stoch.map(|(k, _)| k),
            stoch_d: stoch.map(|(_, d)| d),
        },
        score: None,
    })
}

fn classify_score(latest: &LatestValues, params: &ScoreParams) -> Option<Signal> {
    let (
        Some(rsi),
        Some(macd),
        Some(macd_signal),
        Some(ema_fast),
        Some(ema_slow),
        Some(bollinger_lower),
        Some(adx),
    ) = (
        latest.rsi,
        latest.macd,
        latest.macd_signal,
        latest.ema_fast,
        latest.ema_slow,
        latest.bollinger_lower,
        latest.adx,
    ) else {
        return None;
    };

    let conditions = [
        rsi < params.rsi_oversold,
        macd > macd_signal,
        ema_fast > ema_slow,
        latest.close < bollinger_lower,
        adx > params.adx_trend,
    ];
    let score = conditions.iter().filter(|&&met| met).count() as u32;

    let direction = if score >= params.buy_score {
        Direction::Buy
    } else if score <= params.sell_score {
        Direction::Sell
    } else {
        return None;
    };

    Some(Signal {
        symbol: latest.symbol.clone(),
        direction,
        metrics: SignalMetrics {
            rsi,
            macd,
            macd_signal,
            stoch_k: latest.stoch_k,
            stoch_d: latest.stoch_d,
        },
        score: Some(score),
    })
}

/// None when the gate needs a value the snapshot does not have.
fn volume_gate_open(latest: &LatestValues, gate: VolumeGate) -> Option<bool> {
    match gate {
        VolumeGate::Positive => Some(latest.volume > 0.0),
        VolumeGate::AboveAverage => latest.volume_average.map(|avg| latest.volume > avg),
        VolumeGate::Spike => latest.volume_spike,
    }
}
