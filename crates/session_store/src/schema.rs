use std::time::{SystemTime, UNIX_EPOCH};

use chat_api::Message;
use serde::{Deserialize, Serialize};

/// One persisted conversation, keyed on disk by `run_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub run_id: String,
    /// Creation instant in epoch milliseconds; drives latest-run selection.
    pub created_at: u64,
    pub working_dir: String,
    pub model: String,
    #[serde(default)]
    pub log: Vec<Message>,
}

impl SessionData {
    /// A fresh record stamped with the current time and an empty log.
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        working_dir: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            created_at: epoch_millis(),
            working_dir: working_dir.into(),
            model: model.into(),
            log: Vec::new(),
        }
    }
}

/// The subset of a record needed to rank sessions by age.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SessionStamp {
    pub run_id: String,
    pub created_at: u64,
}

pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
