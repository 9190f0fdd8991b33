//! Volume anomaly detection.
//!
//! Rolling mean of volume over `period` bars; a bar is flagged as a spike
//! when its volume exceeds multiplier * rolling mean. Each point carries the
//! rolling average alongside the flag so reports can show both. Warmup:
//! first (period-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT_X100: u32 = 150;

pub fn calculate_volume_spike(bars: &[Bar], period: usize, mult_x100: u32) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let mult = mult_x100 as f64 / 100.0;

    for i in 0..bars.len() {
        let valid = period > 0 && i + 1 >= period;

        let (spike, average) = if valid {
            let window = &bars[i + 1 - period..=i];
            let average =
                window.iter().map(|b| b.volume as f64).sum::<f64>() / period as f64;
            (bars[i].volume as f64 > mult * average, average)
        } else {
            (false, 0.0)
        };

        values.push(IndicatorPoint {
            timestamp: bars[i].timestamp,
            valid,
            value: IndicatorValue::VolumeSpike { spike, average },
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::VolumeSpike { period, mult_x100 },
        values,
    }
}
