use chat_api::Message;
use session_store::{
    find_latest_run_id, generate_run_id, load_session, save_session, session_file_path,
    SessionData,
};
use tempfile::tempdir;

fn session_with(run_id: &str, created_at: u64) -> SessionData {
    let mut session = SessionData::new(run_id, "/tmp", "test-model");
    session.created_at = created_at;
    session
}

#[test]
fn save_then_load_round_trips_the_record() {
    let root = tempdir().expect("temp session root");
    let run_id = generate_run_id();

    let mut session = SessionData::new(&run_id, "/work", "test-model");
    session.log.push(Message::user("hello"));
    session.log.push(Message::assistant("hi there"));

    save_session(&run_id, &session, root.path()).expect("save session");
    let loaded = load_session(&run_id, root.path()).expect("record should load");
    assert_eq!(loaded, session);
}

#[test]
fn missing_record_loads_as_none() {
    let root = tempdir().expect("temp session root");
    assert!(load_session("missing", root.path()).is_none());
}

#[test]
fn corrupt_record_loads_as_none() {
    let root = tempdir().expect("temp session root");
    let run_id = "run_corrupt";
    let session = session_with(run_id, 100);
    save_session(run_id, &session, root.path()).expect("save session");

    std::fs::write(session_file_path(root.path(), run_id), "{ not json")
        .expect("clobber record");
    assert!(load_session(run_id, root.path()).is_none());
}

#[test]
fn saving_twice_replaces_the_record() {
    let root = tempdir().expect("temp session root");
    let run_id = "run_replace";

    let mut session = session_with(run_id, 100);
    save_session(run_id, &session, root.path()).expect("first save");

    session.log.push(Message::user("later"));
    save_session(run_id, &session, root.path()).expect("second save");

    let loaded = load_session(run_id, root.path()).expect("record should load");
    assert_eq!(loaded.log.len(), 1);
}

#[test]
fn latest_run_id_ranks_by_created_at() {
    let root = tempdir().expect("temp session root");
    save_session("run_old", &session_with("run_old", 1_000), root.path()).expect("save old");
    save_session("run_new", &session_with("run_new", 2_000), root.path()).expect("save new");

    assert_eq!(
        find_latest_run_id(root.path()),
        Some("run_new".to_string())
    );
}

#[test]
fn latest_run_id_tie_breaks_stably() {
    let root = tempdir().expect("temp session root");
    save_session("run_a", &session_with("run_a", 500), root.path()).expect("save a");
    save_session("run_b", &session_with("run_b", 500), root.path()).expect("save b");

    assert_eq!(find_latest_run_id(root.path()), Some("run_b".to_string()));
}

#[test]
fn latest_run_id_skips_unreadable_records() {
    let root = tempdir().expect("temp session root");
    save_session("run_good", &session_with("run_good", 10), root.path()).expect("save good");
    std::fs::write(root.path().join("broken.json"), "not a record").expect("write junk");

    assert_eq!(
        find_latest_run_id(root.path()),
        Some("run_good".to_string())
    );
}

#[test]
fn latest_run_id_is_none_for_missing_root() {
    let root = tempdir().expect("temp session root");
    let nested = root.path().join("never-created");
    assert!(find_latest_run_id(&nested).is_none());
}
