//! Opt-in debug log sink.
//!
//! Stdout belongs to the UI, so diagnostics go to a file named by
//! `ASSISTANT_DEBUG_LOG`. When the variable is unset every call is a no-op.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::EnvConfig;

#[derive(Debug, Default)]
pub struct DebugLog {
    sink: Option<Mutex<File>>,
}

impl DebugLog {
    /// A disabled sink.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Opens the sink named by the environment, appending to an existing file.
    ///
    /// An unopenable path degrades to a disabled sink rather than failing
    /// startup.
    #[must_use]
    pub fn from_env(config: &EnvConfig) -> Self {
        let sink = config.debug_log.as_deref().and_then(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
                .map(Mutex::new)
        });

        Self { sink }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Appends one timestamped line; errors are swallowed so logging can
    /// never disturb a running turn.
    pub fn log(&self, message: &str) {
        let Some(sink) = &self.sink else {
            return;
        };

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();

        if let Ok(mut file) = sink.lock() {
            let _ = writeln!(file, "[{millis}] {message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_sink_ignores_messages() {
        let log = DebugLog::disabled();
        assert!(!log.is_enabled());
        log.log("dropped");
    }

    #[test]
    fn enabled_sink_appends_timestamped_lines() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("debug.log");
        let config = EnvConfig {
            debug_log: Some(path.display().to_string()),
            ..EnvConfig::default()
        };

        let log = DebugLog::from_env(&config);
        assert!(log.is_enabled());
        log.log("first");
        log.log("second");

        let contents = std::fs::read_to_string(&path).expect("read log");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[test]
    fn unopenable_path_degrades_to_disabled() {
        let config = EnvConfig {
            debug_log: Some("/nonexistent-root-dir/never/debug.log".to_string()),
            ..EnvConfig::default()
        };
        assert!(!DebugLog::from_env(&config).is_enabled());
    }
}
