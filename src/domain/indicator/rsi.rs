//! RSI (Relative Strength Index) indicator.
//!
//! Averages gains and losses with a simple rolling mean over the trailing
//! `period` bar-over-bar deltas (not Wilder's smoothing):
//!
//!   rs  = avg_gain / avg_loss
//!   rsi = 100 - 100 / (1 + rs)
//!
//! The rs division is left to IEEE arithmetic on purpose: a window with no
//! losses gives rs = +inf and rsi = 100, a flat window gives 0/0 = NaN and
//! the point is marked invalid. First `period` bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[Bar], period: usize) -> IndicatorSeries {
    let mut gains: Vec<f64> = Vec::new();
    let mut losses: Vec<f64> = Vec::new();

    for i in 1..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if period == 0 || i < period {
            values.push(IndicatorPoint {
                timestamp: bar.timestamp,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            });
            continue;
        }

        // Deltas for bars (i - period + 1)..=i live at gains[i - period..i].
        let avg_gain = gains[i - period..i].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[i - period..i].iter().sum::<f64>() / period as f64;

        let rs = avg_gain / avg_loss;
        let rsi = 100.0 - 100.0 / (1.0 + rs);

        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: !rsi.is_nan(),
            value: IndicatorValue::Simple(if rsi.is_nan() { 0.0 } else { rsi }),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                symbol: "TEST".into(),
                timestamp: NaiveDate::from_ymd_opt(2024, 6, 3)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap()
                    + chrono::Duration::minutes(15 * i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (0..16).map(|i| 100.0 + (i % 5) as f64).collect();
        let bars = make_bars(&prices);
        let series = calculate_rsi(&bars, 14);

        for i in 0..14 {
            assert!(!series.values[i].valid, "bar {} should be invalid", i);
        }
        assert!(series.values[14].valid);
        assert!(series.values[15].valid);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..16).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&prices);
        let series = calculate_rsi(&bars, 14);

        // avg_loss = 0 with avg_gain > 0: rs = +inf, rsi = 100.
        assert_relative_eq!(series.simple_at(14).unwrap(), 100.0);
        assert_relative_eq!(series.simple_at(15).unwrap(), 100.0);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..16).map(|i| 100.0 - i as f64 * 0.5).collect();
        let bars = make_bars(&prices);
        let series = calculate_rsi(&bars, 14);

        assert_relative_eq!(series.simple_at(14).unwrap(), 0.0);
    }

    #[test]
    fn rsi_flat_series_is_indeterminate() {
        let bars = make_bars(&[100.0; 20]);
        let series = calculate_rsi(&bars, 14);

        // 0/0 after warm-up: every point stays invalid, nothing panics.
        assert_eq!(series.len(), 20);
        for point in &series.values {
            assert!(!point.valid);
        }
    }

    #[test]
    fn rsi_known_values() {
        let bars = make_bars(&[44.0, 44.5, 44.25, 45.0]);
        let series = calculate_rsi(&bars, 2);

        // window at bar 2: gains [0.5, 0], losses [0, 0.25]
        // rs = 0.25 / 0.125 = 2, rsi = 100 - 100/3
        assert_relative_eq!(series.simple_at(2).unwrap(), 100.0 - 100.0 / 3.0);
        // window at bar 3: gains [0, 0.75], losses [0.25, 0]
        // rs = 0.375 / 0.125 = 3, rsi = 75
        assert_relative_eq!(series.simple_at(3).unwrap(), 75.0);
    }

    #[test]
    fn rsi_zero_period_all_invalid() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let series = calculate_rsi(&bars, 0);

        assert_eq!(series.len(), 3);
        for point in &series.values {
            assert!(!point.valid);
        }
    }

    #[test]
    fn rsi_empty_bars() {
        let series = calculate_rsi(&[], 14);
        assert!(series.is_empty());
    }

    #[test]
    fn rsi_idempotent() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + ((i * 7) % 5) as f64).collect();
        let bars = make_bars(&prices);
        let first = calculate_rsi(&bars, 14);
        let second = calculate_rsi(&bars, 14);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn rsi_valid_points_stay_in_range(prices in proptest::collection::vec(1.0f64..1000.0, 15..40)) {
            let bars = make_bars(&prices);
            let series = calculate_rsi(&bars, 14);
            for point in &series.values {
                if point.valid {
                    if let IndicatorValue::Simple(rsi) = point.value {
                        prop_assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
                    }
                }
            }
        }
    }
}
