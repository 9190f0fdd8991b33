//! Configuration validation.
//!
//! Validates all config fields before a scan runs. Anything wrong here is a
//! startup-time fatal condition; per-symbol problems during the scan itself
//! never are.

use crate::domain::classify::VolumeGate;
use crate::domain::error::ScanError;
use crate::ports::config_port::ConfigPort;

pub fn validate_scan_config(config: &dyn ConfigPort) -> Result<(), ScanError> {
    validate_data_section(config)?;
    validate_scan_section(config)?;
    validate_indicator_periods(config)?;
    validate_crossover_section(config)?;
    validate_score_section(config)?;
    validate_notify_section(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> ScanError {
    ScanError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_data_section(config: &dyn ConfigPort) -> Result<(), ScanError> {
    match config.get_string("data", "bars_path") {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(ScanError::ConfigMissing {
                section: "data".to_string(),
                key: "bars_path".to_string(),
            });
        }
    }

    if config.get_int("data", "interval_minutes", 15) <= 0 {
        return Err(invalid(
            "data",
            "interval_minutes",
            "interval_minutes must be positive",
        ));
    }
    if config.get_int("data", "lookback_days", 5) <= 0 {
        return Err(invalid(
            "data",
            "lookback_days",
            "lookback_days must be positive",
        ));
    }
    Ok(())
}

fn validate_scan_section(config: &dyn ConfigPort) -> Result<(), ScanError> {
    if config.get_int("scan", "min_bars", 50) < 2 {
        return Err(invalid(
            "scan",
            "min_bars",
            "min_bars must be at least 2 (crossovers compare two bars)",
        ));
    }

    let profile = config
        .get_string("scan", "profile")
        .unwrap_or_else(|| "crossover".to_string());
    match profile.as_str() {
        "crossover" | "score" => Ok(()),
        other => Err(invalid(
            "scan",
            "profile",
            &format!("unknown profile '{}', expected crossover or score", other),
        )),
    }
}

fn validate_indicator_periods(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let periods = [
        ("rsi_period", 14),
        ("macd_fast", 12),
        ("macd_slow", 26),
        ("macd_signal", 9),
        ("stoch_k", 14),
        ("stoch_d", 3),
        ("ema_fast", 9),
        ("ema_slow", 21),
        ("adx_period", 14),
        ("bollinger_period", 20),
        ("volume_period", 20),
    ];
    for (key, default) in periods {
        if config.get_int("indicators", key, default) <= 0 {
            return Err(invalid("indicators", key, "period must be positive"));
        }
    }

    let macd_fast = config.get_int("indicators", "macd_fast", 12);
    let macd_slow = config.get_int("indicators", "macd_slow", 26);
    if macd_fast >= macd_slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be less than macd_slow",
        ));
    }

    let ema_fast = config.get_int("indicators", "ema_fast", 9);
    let ema_slow = config.get_int("indicators", "ema_slow", 21);
    if ema_fast >= ema_slow {
        return Err(invalid(
            "indicators",
            "ema_fast",
            "ema_fast must be less than ema_slow",
        ));
    }

    for key in ["bollinger_mult", "volume_mult"] {
        let default = if key == "bollinger_mult" { 2.0 } else { 1.5 };
        if config.get_double("indicators", key, default) <= 0.0 {
            return Err(invalid("indicators", key, "multiplier must be positive"));
        }
    }
    Ok(())
}

fn validate_crossover_section(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let buy_max = config.get_double("crossover", "rsi_buy_max", 40.0);
    let sell_min = config.get_double("crossover", "rsi_sell_min", 60.0);

    if !(0.0..=100.0).contains(&buy_max) {
        return Err(invalid(
            "crossover",
            "rsi_buy_max",
            "rsi_buy_max must be between 0 and 100",
        ));
    }
    if !(0.0..=100.0).contains(&sell_min) {
        return Err(invalid(
            "crossover",
            "rsi_sell_min",
            "rsi_sell_min must be between 0 and 100",
        ));
    }
    if buy_max > sell_min {
        return Err(invalid(
            "crossover",
            "rsi_buy_max",
            "rsi_buy_max must not exceed rsi_sell_min",
        ));
    }

    let gate = config
        .get_string("crossover", "volume_gate")
        .unwrap_or_else(|| "positive".to_string());
    if VolumeGate::parse(&gate).is_none() {
        return Err(invalid(
            "crossover",
            "volume_gate",
            &format!(
                "unknown volume_gate '{}', expected positive, above-average or spike",
                gate
            ),
        ));
    }
    Ok(())
}

fn validate_score_section(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let oversold = config.get_double("score", "rsi_oversold", 30.0);
    if !(0.0..=100.0).contains(&oversold) {
        return Err(invalid(
            "score",
            "rsi_oversold",
            "rsi_oversold must be between 0 and 100",
        ));
    }

    let adx_trend = config.get_double("score", "adx_trend", 25.0);
    if !(0.0..=100.0).contains(&adx_trend) {
        return Err(invalid(
            "score",
            "adx_trend",
            "adx_trend must be between 0 and 100",
        ));
    }

    let buy_score = config.get_int("score", "buy_score", 4);
    let sell_score = config.get_int("score", "sell_score", 1);
    if !(0..=5).contains(&buy_score) {
        return Err(invalid(
            "score",
            "buy_score",
            "buy_score must be between 0 and 5",
        ));
    }
    if sell_score >= buy_score {
        return Err(invalid(
            "score",
            "sell_score",
            "sell_score must be less than buy_score",
        ));
    }
    Ok(())
}

fn validate_notify_section(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let sink = config
        .get_string("notify", "sink")
        .unwrap_or_else(|| "console".to_string());
    match sink.as_str() {
        "console" => Ok(()),
        "file" => match config.get_string("notify", "path") {
            Some(p) if !p.trim().is_empty() => Ok(()),
            _ => Err(ScanError::ConfigMissing {
                section: "notify".to_string(),
                key: "path".to_string(),
            }),
        },
        other => Err(invalid(
            "notify",
            "sink",
            &format!("unknown sink '{}', expected console or file", other),
        )),
    }
}
