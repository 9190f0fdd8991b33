//! Classified trading signals and their report formatting.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn marker(&self) -> &'static str {
        match self {
            Direction::Buy => "📈",
            Direction::Sell => "📉",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// Indicator values at classification time, kept for the report.
#[derive(Debug, Clone)]
pub struct SignalMetrics {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Signal {
    pub symbol: String,
    pub direction: Direction,
    pub metrics: SignalMetrics,
    /// Points scored by the score-based rule family; None for
    /// crossover-gated signals.
    pub score: Option<u32>,
}

impl Signal {
    /// One-line human-readable summary. Oscillators are rounded to 2
    /// decimal places, MACD-scale values to 4.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("RSI: {:.2}", self.metrics.rsi),
            format!("MACD: {:.4}", self.metrics.macd),
        ];
        if let Some(k) = self.metrics.stoch_k {
            parts.push(format!("Stoch: {:.2}", k));
        }
        if let Some(score) = self.score {
            parts.push(format!("Score: {}", score));
        }

        format!(
            "{} {} {} ({})",
            self.direction.marker(),
            self.direction,
            self.symbol,
            parts.join(", ")
        )
    }
}
