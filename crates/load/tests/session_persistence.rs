use std::sync::Arc;

use cs_load::{FileKvStore, KvStore, LoadLevel, LoadRepository, LoadSession};

fn open(dir: &std::path::Path) -> LoadSession {
    let store = FileKvStore::new(dir).unwrap();
    LoadSession::open(LoadRepository::new(Arc::new(store)), 1000)
}

#[test]
fn fresh_state_directory_starts_from_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let session = open(&tmp.path().join("state"));
    let snap = session.snapshot();

    assert_eq!(snap.types.len(), 3);
    assert!(snap.quantities.is_empty());
    assert_eq!(snap.capacity, 1000);
    assert_eq!(snap.total_weight, 0.0);
    assert_eq!(snap.level(), LoadLevel::Normal);
}

#[test]
fn state_survives_restart_on_disk() {
    let tmp = tempfile::tempdir().unwrap();

    let tools_id = {
        let mut session = open(tmp.path());
        session.set_quantity("box-1", 10);
        let tools = session.add_custom_type("Tools", 12.5).unwrap();
        session.set_quantity(&tools.id, 2);
        session.set_capacity(500);
        tools.id
    };

    let session = open(tmp.path());
    let snap = session.snapshot();
    assert_eq!(snap.quantities.get("box-1"), Some(&10));
    assert_eq!(snap.quantities.get(&tools_id), Some(&2));
    assert_eq!(snap.capacity, 500);
    assert_eq!(snap.total_weight, 175.0);
    assert_eq!(snap.percentage(), 35.0);
}

#[test]
fn corrupt_record_on_disk_only_resets_that_record() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut session = open(tmp.path());
        session.set_quantity("box-2", 4);
        session.set_capacity(300);
    }
    std::fs::write(tmp.path().join("cs_quantities.json"), "{ truncated").unwrap();

    let session = open(tmp.path());
    let snap = session.snapshot();
    assert!(snap.quantities.is_empty());
    assert_eq!(snap.capacity, 300);
}

#[test]
fn over_capacity_load_is_flagged() {
    let tmp = tempfile::tempdir().unwrap();
    let mut session = open(tmp.path());
    session.set_capacity(100);
    session.set_quantity("box-1", 7);

    let snap = session.snapshot();
    assert_eq!(snap.total_weight, 105.0);
    assert_eq!(snap.remaining(), 0.0);
    assert_eq!(snap.level(), LoadLevel::Over);
}

#[test]
fn reset_requires_confirmation() {
    let tmp = tempfile::tempdir().unwrap();
    let mut session = open(tmp.path());
    session.set_quantity("box-1", 2);
    session.set_quantity("box-3", 1);

    let declined = session.request_reset();
    session.cancel_reset(declined);
    assert_eq!(session.snapshot().total_weight, 35.0);

    let confirmed = session.request_reset();
    assert_eq!(session.confirm_reset(confirmed), Some(2));
    drop(session);

    let reopened = open(tmp.path());
    assert!(reopened.snapshot().quantities.is_empty());
}

#[test]
fn deleted_custom_type_does_not_come_back() {
    let tmp = tempfile::tempdir().unwrap();
    let tools_id = {
        let mut session = open(tmp.path());
        let tools = session.add_custom_type("Tools", 12.5).unwrap();
        session.set_quantity(&tools.id, 2);
        assert_eq!(session.snapshot().total_weight, 25.0);
        assert!(session.delete_type(&tools.id).is_some());
        assert_eq!(session.snapshot().total_weight, 0.0);
        tools.id
    };

    let store = FileKvStore::new(tmp.path()).unwrap();
    assert_eq!(store.get("cs_custom_boxes").unwrap().as_deref(), Some("[]"));

    let session = open(tmp.path());
    assert!(session.state().catalog().get(&tools_id).is_none());
    assert!(session.snapshot().quantities.is_empty());
}
