use std::fs;
use std::path::Path;

use uuid::Uuid;

use crate::error::SessionStoreError;
use crate::paths::session_file_path;
use crate::schema::{SessionData, SessionStamp};

/// Generates a fresh unique run identifier.
#[must_use]
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

/// Persists one session record, replacing any previous record for the run.
///
/// The record is written to a sibling temp file first and renamed into
/// place, so readers never observe a half-written document.
pub fn save_session(
    run_id: &str,
    session: &SessionData,
    root: &Path,
) -> Result<(), SessionStoreError> {
    fs::create_dir_all(root)
        .map_err(|source| SessionStoreError::io("creating session root", root, source))?;

    let path = session_file_path(root, run_id);
    let body = serde_json::to_string_pretty(session)
        .map_err(|source| SessionStoreError::serialize(&path, source))?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, body)
        .map_err(|source| SessionStoreError::io("writing session record", &temp_path, source))?;
    fs::rename(&temp_path, &path)
        .map_err(|source| SessionStoreError::io("committing session record", &path, source))?;

    Ok(())
}

/// Loads a session record; missing or corrupt records read as `None`.
#[must_use]
pub fn load_session(run_id: &str, root: &Path) -> Option<SessionData> {
    let path = session_file_path(root, run_id);
    let body = fs::read_to_string(path).ok()?;
    serde_json::from_str(&body).ok()
}

/// Finds the most recently created run id under a session root.
///
/// Ordered by the persisted `created_at` stamp; equal stamps resolve to the
/// lexicographically greatest run id so the result is stable. Unreadable
/// records are skipped.
#[must_use]
pub fn find_latest_run_id(root: &Path) -> Option<String> {
    let entries = fs::read_dir(root).ok()?;

    let mut latest: Option<SessionStamp> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let Ok(body) = fs::read_to_string(&path) else {
            continue;
        };
        let Ok(stamp) = serde_json::from_str::<SessionStamp>(&body) else {
            continue;
        };

        let newer = match &latest {
            None => true,
            Some(current) => {
                (stamp.created_at, stamp.run_id.as_str())
                    > (current.created_at, current.run_id.as_str())
            }
        };
        if newer {
            latest = Some(stamp);
        }
    }

    latest.map(|stamp| stamp.run_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_run_ids_are_unique_and_prefixed() {
        let first = generate_run_id();
        let second = generate_run_id();
        assert!(first.starts_with("run_"));
        assert_ne!(first, second);
    }
}
