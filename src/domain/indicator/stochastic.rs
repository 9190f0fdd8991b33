//! Stochastic oscillator (%K / %D).
//!
//! %K = 100 * (close - rollingMin(low, k)) / (rollingMax(high, k) - rollingMin(low, k))
//! %D = simple rolling mean of %K over d bars
//!
//! A window whose high/low range is zero makes %K indeterminate at that
//! point, and any indeterminate %K inside a %D window makes that %D point
//! indeterminate too. Both propagate as invalid points rather than being
//! zeroed. A point is valid only once both components are defined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;

pub fn calculate_stochastic(bars: &[Bar], k_period: usize, d_period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Stochastic { k_period, d_period };
    let n = bars.len();

    // Raw %K with NaN standing in for "not yet defined" or zero-range
    // windows, so the %D rolling mean propagates it naturally.
    let mut k_raw = vec![f64::NAN; n];
    if k_period > 0 {
        for i in (k_period - 1)..n {
            let window = &bars[i + 1 - k_period..=i];
            let low_min = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let high_max = window
                .iter()
                .map(|b| b.high)
                .fold(f64::NEG_INFINITY, f64::max);
            let range = high_max - low_min;
            if range == 0.0 {
                continue;
            }
            k_raw[i] = 100.0 * (bars[i].close - low_min) / range;
        }
    }

    let mut values = Vec::with_capacity(n);
    for (i, bar) in bars.iter().enumerate() {
        let k = k_raw[i];
        let d = if d_period > 0 && i + 1 >= d_period {
            k_raw[i + 1 - d_period..=i].iter().sum::<f64>() / d_period as f64
        } else {
            f64::NAN
        };

        let valid = k.is_finite() && d.is_finite();
        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid,
            value: if valid {
                IndicatorValue::Stochastic { k, d }
            } else {
                IndicatorValue::Stochastic { k: 0.0, d: 0.0 }
            },
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
