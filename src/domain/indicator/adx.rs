//! ADX (Average Directional Index) indicator.
//!
//! Pipeline per bar transition:
//!   +DM / -DM keep only the larger positive side of the paired high/low
//!   deltas (the other is zeroed); TR = max(high-low, |high-prevClose|,
//!   |low-prevClose|).
//! Then over a trailing `period` window of transitions:
//!   +DI = 100 * mean(+DM) / mean(TR),  -DI likewise
//!   DX  = 100 * |+DI - -DI| / (+DI + -DI)
//!   ADX = rolling mean of DX over `period`.
//!
//! Transitions start at bar 1, so DX is first defined at index `period` and
//! ADX at index `2*period - 1` (the two warm-up windows compound). A zero
//! TR mean or a zero DI sum leaves the point indeterminate, and that
//! indeterminacy poisons every ADX window containing it.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 14;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn calculate_adx(bars: &[Bar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Adx(period);
    let n = bars.len();

    let m = n.saturating_sub(1);
    let mut plus_dm = vec![0.0; m];
    let mut minus_dm = vec![0.0; m];
    let mut tr = vec![0.0; m];

    for i in 1..n {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        plus_dm[i - 1] = if up > down && up > 0.0 { up } else { 0.0 };
        minus_dm[i - 1] = if down > up && down > 0.0 { down } else { 0.0 };
        tr[i - 1] = bars[i].true_range(bars[i - 1].close);
    }

    // DX aligned to bar indices, NaN until its window of transitions fills.
    let mut dx = vec![f64::NAN; n];
    if period > 0 {
        for i in period..n {
            // Transitions for bars (i - period + 1)..=i.
            let window = i - period..i;
            let atr = mean(&tr[window.clone()]);
            let plus_di = 100.0 * mean(&plus_dm[window.clone()]) / atr;
            let minus_di = 100.0 * mean(&minus_dm[window]) / atr;
            dx[i] = 100.0 * (plus_di - minus_di).abs() / (plus_di + minus_di);
        }
    }

    let mut values = Vec::with_capacity(n);
    for (i, bar) in bars.iter().enumerate() {
        let adx = if period > 0 && i + 1 >= 2 * period {
            mean(&dx[i + 1 - period..=i])
        } else {
            f64::NAN
        };

        let valid = adx.is_finite();
        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid,
            value: IndicatorValue::Simple(if valid { adx } else { 0.0 }),
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
