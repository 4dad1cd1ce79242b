//! Environment configuration.

use std::env;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Path for the opt-in debug log sink; unset disables logging entirely.
    pub debug_log: Option<String>,
    /// Selects the light theme instead of the default dark one.
    pub light_theme: bool,
}

impl EnvConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            debug_log: env_string_opt("ASSISTANT_DEBUG_LOG"),
            light_theme: env_flag("ASSISTANT_LIGHT_THEME"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_flag_requires_literal_one() {
        std::env::set_var("LEDGER_TUI_TEST_FLAG", "true");
        assert!(!env_flag("LEDGER_TUI_TEST_FLAG"));
        std::env::set_var("LEDGER_TUI_TEST_FLAG", "1");
        assert!(env_flag("LEDGER_TUI_TEST_FLAG"));
        std::env::remove_var("LEDGER_TUI_TEST_FLAG");
    }

    #[test]
    fn env_string_opt_rejects_blank_values() {
        std::env::set_var("LEDGER_TUI_TEST_STR", "   ");
        assert_eq!(env_string_opt("LEDGER_TUI_TEST_STR"), None);
        std::env::set_var("LEDGER_TUI_TEST_STR", "/tmp/log");
        assert_eq!(
            env_string_opt("LEDGER_TUI_TEST_STR"),
            Some("/tmp/log".to_string())
        );
        std::env::remove_var("LEDGER_TUI_TEST_STR");
    }
}
