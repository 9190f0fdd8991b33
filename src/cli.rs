//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_bars_adapter::CsvBarsAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::notify_adapter::{ConsoleNotifyAdapter, FileNotifyAdapter};
use crate::domain::classify::{CrossoverParams, RuleProfile, ScoreParams, VolumeGate};
use crate::domain::config_validation::validate_scan_config;
use crate::domain::error::ScanError;
use crate::domain::scan::{self, ScanConfig, DEFAULT_MIN_BARS};
use crate::domain::snapshot::IndicatorParams;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{BarRequest, MarketDataPort};
use crate::ports::notify_port::NotifyPort;

#[derive(Parser, Debug)]
#[command(name = "intrascan", about = "Intraday technical signal scanner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one scan cycle over the configured symbols
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated symbol list overriding the configured one
        #[arg(long)]
        symbols: Option<String>,
        /// Rule profile overriding the configured one
        #[arg(long)]
        profile: Option<String>,
        /// Write the report to this file instead of the configured sink
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List symbols the data adapter can serve
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a scan configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show bar count and time range for a symbol
    Info {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan {
            config,
            symbols,
            profile,
            output,
        } => run_scan_command(&config, symbols.as_deref(), profile.as_deref(), output),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Info { symbol, config } => run_info(&symbol, &config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ScanError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_scan_command(
    config_path: &PathBuf,
    symbols_override: Option<&str>,
    profile_override: Option<&str>,
    output: Option<PathBuf>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_scan_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let scan_config = match build_scan_config(&adapter, profile_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match resolve_symbols(symbols_override, &adapter, &data_port) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if symbols.is_empty() {
        eprintln!("error: no symbols to scan");
        return ExitCode::from(2);
    }

    let notify: Box<dyn NotifyPort> = match output {
        Some(path) => Box::new(FileNotifyAdapter::new(path)),
        None => match build_notify_port(&adapter) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    eprintln!(
        "Scanning {} symbols (profile: {})...",
        symbols.len(),
        scan_config.profile.name()
    );

    let report = scan::run_scan(&data_port, &symbols, &scan_config);
    let text = scan::format_report(
        &report,
        scan_config.profile.name(),
        Local::now().naive_local(),
    );

    // Best effort: a failed delivery is logged and the scan still counts.
    if let Err(e) = notify.deliver(&text) {
        eprintln!("Warning: {e}");
    }

    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data_port.list_symbols() {
        Ok(symbols) => {
            for symbol in symbols {
                println!("{symbol}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_scan_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = build_scan_config(&adapter, None) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    println!("Configuration OK");
    ExitCode::SUCCESS
}

fn run_info(symbol: &str, config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let request = build_bar_request(&adapter);
    match data_port.fetch_bars(symbol, &request) {
        Ok(bars) if bars.is_empty() => {
            let err = ScanError::NoData {
                symbol: symbol.to_string(),
            };
            eprintln!("error: {err}");
            (&err).into()
        }
        Ok(bars) => {
            println!(
                "{}: {} bars from {} to {}",
                symbol,
                bars.len(),
                bars[0].timestamp.format("%Y-%m-%d %H:%M"),
                bars[bars.len() - 1].timestamp.format("%Y-%m-%d %H:%M")
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn build_bar_request(adapter: &dyn ConfigPort) -> BarRequest {
    BarRequest {
        lookback_days: adapter.get_int("data", "lookback_days", 5) as u32,
        interval_minutes: adapter.get_int("data", "interval_minutes", 15) as u32,
    }
}

pub fn build_scan_config(
    adapter: &dyn ConfigPort,
    profile_override: Option<&str>,
) -> Result<ScanConfig, ScanError> {
    Ok(ScanConfig {
        request: build_bar_request(adapter),
        min_bars: adapter.get_int("scan", "min_bars", DEFAULT_MIN_BARS as i64) as usize,
        profile: build_profile(adapter, profile_override)?,
        indicators: build_indicator_params(adapter),
    })
}

pub fn build_profile(
    adapter: &dyn ConfigPort,
    profile_override: Option<&str>,
) -> Result<RuleProfile, ScanError> {
    let name = match profile_override {
        Some(name) => name.to_string(),
        None => adapter
            .get_string("scan", "profile")
            .unwrap_or_else(|| "crossover".to_string()),
    };

    match name.as_str() {
        "crossover" => {
            let gate_name = adapter
                .get_string("crossover", "volume_gate")
                .unwrap_or_else(|| "positive".to_string());
            let volume_gate =
                VolumeGate::parse(&gate_name).ok_or_else(|| ScanError::ConfigInvalid {
                    section: "crossover".to_string(),
                    key: "volume_gate".to_string(),
                    reason: format!("unknown volume_gate '{}'", gate_name),
                })?;

            let defaults = CrossoverParams::default();
            Ok(RuleProfile::CrossoverGated(CrossoverParams {
                rsi_buy_max: adapter.get_double("crossover", "rsi_buy_max", defaults.rsi_buy_max),
                rsi_sell_min: adapter.get_double(
                    "crossover",
                    "rsi_sell_min",
                    defaults.rsi_sell_min,
                ),
                require_stochastic: adapter.get_bool(
                    "crossover",
                    "require_stochastic",
                    defaults.require_stochastic,
                ),
                volume_gate,
            }))
        }
        "score" => {
            let defaults = ScoreParams::default();
            Ok(RuleProfile::ScoreBased(ScoreParams {
                rsi_oversold: adapter.get_double("score", "rsi_oversold", defaults.rsi_oversold),
                adx_trend: adapter.get_double("score", "adx_trend", defaults.adx_trend),
                buy_score: adapter.get_int("score", "buy_score", defaults.buy_score as i64) as u32,
                sell_score: adapter.get_int("score", "sell_score", defaults.sell_score as i64)
                    as u32,
            }))
        }
        other => Err(ScanError::ConfigInvalid {
            section: "scan".to_string(),
            key: "profile".to_string(),
            reason: format!("unknown profile '{}'", other),
        }),
    }
}

pub fn build_indicator_params(adapter: &dyn ConfigPort) -> IndicatorParams {
    let defaults = IndicatorParams::default();
    let period = |key: &str, default: usize| -> usize {
        adapter.get_int("indicators", key, default as i64) as usize
    };
    let mult_x100 = |key: &str, default: u32| -> u32 {
        (adapter.get_double("indicators", key, default as f64 / 100.0) * 100.0).round() as u32
    };

    IndicatorParams {
        rsi_period: period("rsi_period", defaults.rsi_period),
        macd_fast: period("macd_fast", defaults.macd_fast),
        macd_slow: period("macd_slow", defaults.macd_slow),
        macd_signal: period("macd_signal", defaults.macd_signal),
        stoch_k: period("stoch_k", defaults.stoch_k),
        stoch_d: period("stoch_d", defaults.stoch_d),
        ema_fast: period("ema_fast", defaults.ema_fast),
        ema_slow: period("ema_slow", defaults.ema_slow),
        adx_period: period("adx_period", defaults.adx_period),
        bollinger_period: period("bollinger_period", defaults.bollinger_period),
        bollinger_mult_x100: mult_x100("bollinger_mult", defaults.bollinger_mult_x100),
        volume_period: period("volume_period", defaults.volume_period),
        volume_mult_x100: mult_x100("volume_mult", defaults.volume_mult_x100),
    }
}

pub fn build_data_port(adapter: &dyn ConfigPort) -> Result<CsvBarsAdapter, ScanError> {
    let bars_path = adapter
        .get_string("data", "bars_path")
        .ok_or_else(|| ScanError::ConfigMissing {
            section: "data".to_string(),
            key: "bars_path".to_string(),
        })?;
    Ok(CsvBarsAdapter::new(PathBuf::from(bars_path)))
}

pub fn build_notify_port(adapter: &dyn ConfigPort) -> Result<Box<dyn NotifyPort>, ScanError> {
    let sink = adapter
        .get_string("notify", "sink")
        .unwrap_or_else(|| "console".to_string());
    match sink.as_str() {
        "console" => Ok(Box::new(ConsoleNotifyAdapter)),
        "file" => {
            let path = adapter
                .get_string("notify", "path")
                .ok_or_else(|| ScanError::ConfigMissing {
                    section: "notify".to_string(),
                    key: "path".to_string(),
                })?;
            Ok(Box::new(FileNotifyAdapter::new(PathBuf::from(path))))
        }
        other => Err(ScanError::ConfigInvalid {
            section: "notify".to_string(),
            key: "sink".to_string(),
            reason: format!("unknown sink '{}'", other),
        }),
    }
}

/// Resolve the scan universe: CLI override first, then the configured list,
/// then whatever the data adapter can serve.
pub fn resolve_symbols(
    symbols_override: Option<&str>,
    adapter: &dyn ConfigPort,
    data_port: &dyn MarketDataPort,
) -> Result<Vec<String>, ScanError> {
    let configured = symbols_override
        .map(|s| s.to_string())
        .or_else(|| adapter.get_string("scan", "symbols"));

    match configured {
        Some(list) => parse_symbols(&list).map_err(|e| ScanError::ConfigInvalid {
            section: "scan".to_string(),
            key: "symbols".to_string(),
            reason: e.to_string(),
        }),
        None => data_port.list_symbols(),
    }
}
