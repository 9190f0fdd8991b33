//! Notification sink adapters.

use crate::domain::error::ScanError;
use crate::ports::notify_port::NotifyPort;
use std::fs;
use std::path::PathBuf;

/// Writes the report to stdout.
pub struct ConsoleNotifyAdapter;

impl NotifyPort for ConsoleNotifyAdapter {
    fn deliver(&self, message: &str) -> Result<(), ScanError> {
        println!("{}", message);
        Ok(())
    }
}

/// Writes the report to a file, replacing any previous one.
pub struct FileNotifyAdapter {
    path: PathBuf,
}

impl FileNotifyAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl NotifyPort for FileNotifyAdapter {
    fn deliver(&self, message: &str) -> Result<(), ScanError> {
        fs::write(&self.path, message).map_err(|e| ScanError::Notify {
            reason: format!("failed to write {}: {}", self.path.display(), e),
        })
    }
}
