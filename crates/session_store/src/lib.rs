//! Session persistence keyed by run identifier.
//!
//! One session is one pretty-printed JSON document at
//! `<root>/<run_id>.json`; the default root is `.assistant/sessions` under
//! the working directory. Loads never fail: missing or corrupt records read
//! as `None` so a bad file can only cost its own history.

mod error;
mod paths;
mod schema;
mod store;

pub use error::SessionStoreError;
pub use paths::{session_file_name, session_file_path, session_root, SESSION_DIR};
pub use schema::SessionData;
pub use store::{find_latest_run_id, generate_run_id, load_session, save_session};
