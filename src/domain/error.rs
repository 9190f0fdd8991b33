//! Domain error types.

/// Top-level error type for intrascan.
///
/// Configuration problems are startup-fatal; data and notification problems
/// are contained per symbol or per delivery inside a scan cycle and only
/// become fatal for the single-symbol commands.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientBars {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("notification delivery failed: {reason}")]
    Notify { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScanError> for std::process::ExitCode {
    fn from(err: &ScanError) -> Self {
        let code: u8 = match err {
            ScanError::Io(_) => 1,
            ScanError::ConfigParse { .. }
            | ScanError::ConfigMissing { .. }
            | ScanError::ConfigInvalid { .. } => 2,
            ScanError::DataSource { .. } => 3,
            ScanError::Notify { .. } => 4,
            ScanError::NoData { .. } | ScanError::InsufficientBars { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
