use std::fs;
use std::rc::Rc;

use study_buddy::storage::{FileStore, KeyValueStore, StoreHandle, SESSION_KEY, TASKS_KEY};
use study_buddy::{DataStore, SessionManager, TaskItem};

fn open(dir: &std::path::Path) -> StoreHandle {
    Rc::new(FileStore::open(dir, 1000).expect("open file store"))
}

#[test]
fn reload_reproduces_accounts_tasks_and_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = open(dir.path());

    let mut data = DataStore::load(storage.clone());
    let mut sessions = SessionManager::load(storage);
    let bob = sessions
        .try_signup(&mut data, "bob", "Secret1!")
        .expect("signup");
    sessions
        .try_signup(&mut data, "carol", "Secret2@")
        .expect("signup");

    let essay = TaskItem::new(bob.id.clone(), "essay");
    let essay_id = essay.id.clone();
    data.add_task(essay);
    data.add_task(TaskItem::new(bob.id.clone(), "quiz"));
    data.add_task(TaskItem::new(bob.id.clone(), "lab report"));
    data.toggle_task(&essay_id);
    data.update_task_title(&essay_id, "final essay");

    let reopened = open(dir.path());
    let reloaded = DataStore::load(reopened.clone());
    let restored = SessionManager::load(reopened);

    assert_eq!(reloaded.list_accounts(), data.list_accounts());
    assert_eq!(
        reloaded.list_tasks_for_owner(&bob.id),
        data.list_tasks_for_owner(&bob.id)
    );
    assert_eq!(restored.session_state(), sessions.session_state());
    assert_eq!(restored.current_account().unwrap().username, "carol");
}

#[test]
fn legacy_browser_records_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("study-buddy-users.json"),
        r#"[{"id":"u1","username":"bob","password":"Secret1!"}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("study-buddy-tasks.json"),
        r#"[{"id":"t1","userId":"u1","title":"Read","completed":false}]"#,
    )
    .unwrap();

    let storage = open(dir.path());
    let data = DataStore::load(storage.clone());
    let mut sessions = SessionManager::load(storage);

    assert!(sessions.login(&data, "bob", "Secret1!").success);
    let tasks = data.list_tasks_for_owner("u1");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Read");
}

#[test]
fn corrupt_records_load_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = open(dir.path());
    storage.set(TASKS_KEY, "[{broken").unwrap();
    storage.set(SESSION_KEY, "nope").unwrap();

    let data = DataStore::load(storage.clone());
    let sessions = SessionManager::load(storage);
    assert!(data.list_tasks_for_owner("anyone").is_empty());
    assert!(!sessions.is_logged_in());
}

#[test]
fn logout_removes_session_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = open(dir.path());
    let mut data = DataStore::load(storage.clone());
    let mut sessions = SessionManager::load(storage);

    sessions.signup(&mut data, "bob", "Secret1!");
    let session_file = dir.path().join("study-buddy-session.json");
    assert!(session_file.exists());

    sessions.logout();
    assert!(!session_file.exists());
}
