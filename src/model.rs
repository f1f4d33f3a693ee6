//! Records shared by the data store and the session manager.
//!
//! Field names on the wire are camelCase. `userId` and `currentUser` are
//! accepted on read so data written by the browser build still loads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Generate a fresh opaque identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A registered user's credentials and identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    /// Stored as entered; no hashing.
    pub password: String,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A single checklist entry owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: String,
    #[serde(alias = "userId")]
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl TaskItem {
    /// Build a new, not yet completed task for `owner_id`.
    pub fn new(owner_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            owner_id: owner_id.into(),
            title: title.into(),
            completed: false,
        }
    }
}

/// Which account, if any, is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_logged_in: bool,
    #[serde(alias = "currentUser")]
    pub current_account: Option<Account>,
}

impl Session {
    pub fn logged_in(account: Account) -> Self {
        Self {
            is_logged_in: true,
            current_account: Some(account),
        }
    }

    pub fn logged_out() -> Self {
        Self::default()
    }
}

/// Check a task title the way the add/edit forms do.
///
/// A title that is empty after trimming is rejected. An accepted title is
/// returned as entered, surrounding whitespace included.
pub fn validate_title(raw: &str) -> Result<&str> {
    if raw.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "task title cannot be empty".to_string(),
        ));
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_reads_legacy_user_id_field() {
        let raw = r#"{"id":"t1","userId":"u1","title":"Read ch. 3","completed":true}"#;
        let task: TaskItem = serde_json::from_str(raw).unwrap();
        assert_eq!(task.owner_id, "u1");
        assert!(task.completed);
    }

    #[test]
    fn task_writes_owner_id() {
        let task = TaskItem::new("u1", "Flashcards");
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["ownerId"], "u1");
        assert_eq!(json["completed"], false);
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn session_reads_legacy_current_user_field() {
        let raw = r#"{"isLoggedIn":true,
            "currentUser":{"id":"u1","username":"bob","password":"Secret1!"}}"#;
        let session: Session = serde_json::from_str(raw).unwrap();
        assert!(session.is_logged_in);
        assert_eq!(session.current_account.unwrap().username, "bob");
    }

    #[test]
    fn logged_out_session_serializes_null_account() {
        let json = serde_json::to_value(Session::logged_out()).unwrap();
        assert_eq!(json["isLoggedIn"], false);
        assert!(json["currentAccount"].is_null());
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn validate_title_rejects_blank() {
        assert!(validate_title("   ").is_err());
        assert!(validate_title("").is_err());
        assert_eq!(validate_title("  Essay ").unwrap(), "  Essay ");
    }
}
