use std::path::{Path, PathBuf};

pub const SESSION_DIR: [&str; 2] = [".assistant", "sessions"];

/// Default session root under a working directory.
#[must_use]
pub fn session_root(cwd: &Path) -> PathBuf {
    cwd.join(SESSION_DIR[0]).join(SESSION_DIR[1])
}

/// Record file name for one run id.
#[must_use]
pub fn session_file_name(run_id: &str) -> String {
    format!("{run_id}.json")
}

/// Full record path for one run id under a session root.
#[must_use]
pub fn session_file_path(root: &Path, run_id: &str) -> PathBuf {
    root.join(session_file_name(run_id))
}
