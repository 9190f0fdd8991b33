//! Scan cycle: evaluate every symbol, aggregate signals, isolate failures.
//!
//! A failed symbol (provider error, missing or short data, malformed series)
//! is recorded as skipped and the batch continues; nothing a single symbol
//! does can abort the cycle. The report renderer distinguishes "ran, nothing
//! found" from "did not run" with an explicit no-signals line.

use crate::domain::classify::{classify, RuleProfile};
use crate::domain::signal::Signal;
use crate::domain::series::SymbolSeries;
use crate::domain::snapshot::{compute_indicators, IndicatorParams, LatestValues};
use crate::ports::data_port::{BarRequest, MarketDataPort};
use chrono::NaiveDateTime;
use std::fmt;

/// Floor on usable history, at least the longest compound indicator warm-up.
/// The scanner enforces this itself rather than trusting the provider.
pub const DEFAULT_MIN_BARS: usize = 50;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub request: BarRequest,
    pub min_bars: usize,
    pub profile: RuleProfile,
    pub indicators: IndicatorParams,
}

#[derive(Debug, Clone)]
pub enum SkipReason {
    Provider { reason: String },
    NoData,
    InsufficientBars { bars: usize, minimum: usize },
    InvalidSeries { reason: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Provider { reason } => write!(f, "provider error: {}", reason),
            SkipReason::NoData => write!(f, "no data"),
            SkipReason::InsufficientBars { bars, minimum } => {
                write!(f, "insufficient data ({} bars, minimum {})", bars, minimum)
            }
            SkipReason::InvalidSeries { reason } => write!(f, "invalid series: {}", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Non-NONE classifications in input order.
    pub signals: Vec<Signal>,
    pub skipped: Vec<SkippedSymbol>,
    /// Symbols that made it through to classification.
    pub evaluated: usize,
}

pub fn run_scan(
    data_port: &dyn MarketDataPort,
    symbols: &[String],
    config: &ScanConfig,
) -> ScanReport {
    let mut signals = Vec::new();
    let mut skipped = Vec::new();
    let mut evaluated = 0;

    for symbol in symbols {
        let bars = match data_port.fetch_bars(symbol, &config.request) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", symbol, e);
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: SkipReason::Provider {
                        reason: e.to_string(),
                    },
                });
                continue;
            }
        };

        if bars.is_empty() {
            eprintln!("Warning: skipping {} (no data found)", symbol);
            skipped.push(SkippedSymbol {
                symbol: symbol.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        if bars.len() < config.min_bars {
            eprintln!(
                "Warning: skipping {} (only {} bars, minimum {} required)",
                symbol,
                bars.len(),
                config.min_bars
            );
            skipped.push(SkippedSymbol {
                symbol: symbol.clone(),
                reason: SkipReason::InsufficientBars {
                    bars: bars.len(),
                    minimum: config.min_bars,
                },
            });
            continue;
        }

        let series = match SymbolSeries::new(symbol.clone(), bars) {
            Ok(series) => series,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", symbol, e);
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: SkipReason::InvalidSeries {
                        reason: e.to_string(),
                    },
                });
                continue;
            }
        };

        let set = compute_indicators(&series, &config.indicators);
        let latest = LatestValues::capture(&series, &set);
        evaluated += 1;

        if let Some(signal) = classify(&latest, &config.profile) {
            signals.push(signal);
        }
    }

    ScanReport {
        signals,
        skipped,
        evaluated,
    }
}

pub fn format_report(report: &ScanReport, profile: &str, generated_at: NaiveDateTime) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Intraday scan {} (profile: {})\n",
        generated_at.format("%Y-%m-%d %H:%M"),
        profile
    ));

    if report.signals.is_empty() {
        out.push_str("No signals found.\n");
    } else {
        for signal in &report.signals {
            out.push_str(&signal.summary());
            out.push('\n');
        }
    }

    for skip in &report.skipped {
        out.push_str(&format!("Skipped {}: {}\n", skip.symbol, skip.reason));
    }

    out.push_str(&format!(
        "{} evaluated, {} signals, {} skipped\n",
        report.evaluated,
        report.signals.len(),
        report.skipped.len()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classify::CrossoverParams;
    use crate::domain::error::ScanError;
    use crate::domain::ohlcv::Bar;
    use crate::domain::signal::Direction;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    struct MockData {
        bars: HashMap<String, Vec<Bar>>,
        errors: HashMap<String, String>,
    }

    impl MockData {
        fn new() -> Self {
            Self {
                bars: HashMap::new(),
                errors: HashMap::new(),
            }
        }

        fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
            self.bars.insert(symbol.to_string(), bars);
            self
        }

        fn with_error(mut self, symbol: &str, reason: &str) -> Self {
            self.errors.insert(symbol.to_string(), reason.to_string());
            self
        }
    }

    impl MarketDataPort for MockData {
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

    fn make_bars(symbol: &str, closes: &[f64], volumes: &[i64]) -> Vec<Bar> {
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| Bar {
                symbol: symbol.to_string(),
                timestamp: NaiveDate::from_ymd_opt(2024, 6, 3)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap()
                    + chrono::Duration::minutes(15 * i as i64),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume,
            })
            .collect()
    }

    fn small_config() -> ScanConfig {
        ScanConfig {
            request: BarRequest {
                lookback_days: 5,
                interval_minutes: 15,
            },
            min_bars: 6,
            profile: RuleProfile::CrossoverGated(CrossoverParams::default()),
            indicators: IndicatorParams {
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
            },
        }
    }

    /// Decline then a pop at the last bar: MACD(1,3,2) crosses up through
    /// its signal line exactly there, RSI(2) sits at 33.3, and %K > %D.
    fn buy_scenario_bars(symbol: &str) -> Vec<Bar> {
        make_bars(
            symbol,
            &[10.0, 10.0, 10.0, 9.0, 8.0, 8.5],
            &[1000, 1000, 1000, 1000, 1000, 2000],
        )
    }

    fn flat_bars(symbol: &str) -> Vec<Bar> {
        make_bars(symbol, &[10.0; 6], &[1000; 6])
    }

    #[test]
    fn scan_classifies_buy_scenario() {
        let data = MockData::new().with_bars("POP", buy_scenario_bars("POP"));
        let report = run_scan(&data, &["POP".to_string()], &small_config());

        assert_eq!(report.evaluated, 1);
        assert!(report.skipped.is_empty());
        assert_eq!(report.signals.len(), 1);
        assert_eq!(report.signals[0].symbol, "POP");
        assert_eq!(report.signals[0].direction, Direction::Buy);
    }

    #[test]
    fn short_series_is_skipped_without_halting_batch() {
        let data = MockData::new()
            .with_bars("SHORT", make_bars("SHORT", &[10.0; 3], &[1000; 3]))
            .with_bars("POP", buy_scenario_bars("POP"));
        let symbols = vec!["SHORT".to_string(), "POP".to_string()];
        let report = run_scan(&data, &symbols, &small_config());

        assert_eq!(report.evaluated, 1);
        assert_eq!(report.signals.len(), 1);
        assert_eq!(report.signals[0].symbol, "POP");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].symbol, "SHORT");
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::InsufficientBars {
                bars: 3,
                minimum: 6
            }
        ));
    }

    #[test]
    fn provider_error_is_contained() {
        let data = MockData::new()
            .with_error("BAD", "connection refused")
            .with_bars("FLAT", flat_bars("FLAT"));
        let symbols = vec!["BAD".to_string(), "FLAT".to_string()];
        let report = run_scan(&data, &symbols, &small_config());

        assert_eq!(report.evaluated, 1);
        assert!(report.signals.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::Provider { .. }
        ));
    }

    #[test]
    fn missing_symbol_is_no_data() {
        let data = MockData::new();
        let report = run_scan(&data, &["GONE".to_string()], &small_config());

        assert_eq!(report.evaluated, 0);
        assert!(matches!(report.skipped[0].reason, SkipReason::NoData));
    }

    #[test]
    fn malformed_series_is_skipped() {
        let mut bars = flat_bars("DUP");
        bars[1].timestamp = bars[0].timestamp;
        let data = MockData::new().with_bars("DUP", bars);
        let report = run_scan(&data, &["DUP".to_string()], &small_config());

        assert_eq!(report.evaluated, 0);
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::InvalidSeries { .. }
        ));
    }

    #[test]
    fn indeterminate_indicators_yield_no_signal_not_a_skip() {
        // Flat closes leave RSI at 0/0; the symbol still counts as evaluated.
        let data = MockData::new().with_bars("FLAT", flat_bars("FLAT"));
        let report = run_scan(&data, &["FLAT".to_string()], &small_config());

        assert_eq!(report.evaluated, 1);
        assert!(report.signals.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn signals_preserve_input_order() {
        let data = MockData::new()
            .with_bars("BBB", buy_scenario_bars("BBB"))
            .with_bars("AAA", buy_scenario_bars("AAA"));
        let symbols = vec!["BBB".to_string(), "AAA".to_string()];
        let report = run_scan(&data, &symbols, &small_config());

        assert_eq!(report.signals.len(), 2);
        assert_eq!(report.signals[0].symbol, "BBB");
        assert_eq!(report.signals[1].symbol, "AAA");
    }

    #[test]
    fn report_with_no_signals_says_so() {
        let report = ScanReport {
            signals: Vec::new(),
            skipped: Vec::new(),
            evaluated: 3,
        };
        let generated_at = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        let text = format_report(&report, "crossover", generated_at);

        assert!(text.contains("Intraday scan 2024-06-03 16:00 (profile: crossover)"));
        assert!(text.contains("No signals found."));
        assert!(text.contains("3 evaluated, 0 signals, 0 skipped"));
    }

    #[test]
    fn report_lists_signals_and_skips() {
        let data = MockData::new()
            .with_bars("POP", buy_scenario_bars("POP"))
            .with_bars("SHORT", make_bars("SHORT", &[10.0; 2], &[1000; 2]));
        let symbols = vec!["POP".to_string(), "SHORT".to_string()];
        let report = run_scan(&data, &symbols, &small_config());

        let generated_at = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        let text = format_report(&report, "crossover", generated_at);

        assert!(text.contains("📈 BUY POP"));
        assert!(text.contains("Skipped SHORT: insufficient data (2 bars, minimum 6)"));
        assert!(text.contains("1 evaluated, 1 signals, 1 skipped"));
        assert!(!text.contains("No signals found."));
    }
}
