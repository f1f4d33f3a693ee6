//! In-memory data store for accounts and task items.
//!
//! The store is the authoritative copy of both collections. Every mutation
//! writes the whole affected collection back to durable storage before
//! returning. Storage problems are logged and otherwise ignored; nothing
//! here returns an error.

use crate::model::{Account, TaskItem};
use crate::storage::{load_record, save_record, StoreHandle, ACCOUNTS_KEY, TASKS_KEY};

pub struct DataStore {
    storage: StoreHandle,
    accounts: Vec<Account>,
    tasks: Vec<TaskItem>,
}

impl DataStore {
    /// Build the store, loading both collections from `storage`.
    ///
    /// Missing or undecodable collections start out empty.
    pub fn load(storage: StoreHandle) -> Self {
        let accounts: Vec<Account> =
            load_record(storage.as_ref(), ACCOUNTS_KEY).unwrap_or_default();
        let tasks: Vec<TaskItem> =
            load_record(storage.as_ref(), TASKS_KEY).unwrap_or_default();
        tracing::debug!(
            accounts = accounts.len(),
            tasks = tasks.len(),
            durable = storage.is_durable(),
            "loaded data store"
        );
        Self {
            storage,
            accounts,
            tasks,
        }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// All accounts, in insertion order
    pub fn list_accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// First account whose username matches exactly (case-sensitive)
    pub fn find_account_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    /// Append an account. Uniqueness is the caller's job.
    pub fn add_account(&mut self, account: Account) {
        tracing::debug!(account_id = %account.id, "adding account");
        self.accounts.push(account);
        self.persist_accounts();
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Tasks owned by `owner_id`, in insertion order
    pub fn list_tasks_for_owner(&self, owner_id: &str) -> Vec<TaskItem> {
        self.tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect()
    }

    pub fn add_task(&mut self, task: TaskItem) {
        tracing::debug!(task_id = %task.id, owner_id = %task.owner_id, "adding task");
        self.tasks.push(task);
        self.persist_tasks();
    }

    /// Remove the task with `task_id`.
    ///
    /// Returns whether a task matched; an unknown id is a no-op.
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        let removed = self.tasks.len() != before;
        tracing::debug!(task_id, removed, "delete task");
        self.persist_tasks();
        removed
    }

    /// Flip `completed` on the task with `task_id`.
    ///
    /// Returns whether a task matched; an unknown id is a no-op.
    pub fn toggle_task(&mut self, task_id: &str) -> bool {
        self.update_task(task_id, |task| task.completed = !task.completed)
    }

    /// Overwrite the title of the task with `task_id`. No validation.
    ///
    /// Returns whether a task matched; an unknown id is a no-op.
    pub fn update_task_title(&mut self, task_id: &str, new_title: &str) -> bool {
        self.update_task(task_id, |task| task.title = new_title.to_string())
    }

    fn update_task<F>(&mut self, task_id: &str, mutator: F) -> bool
    where
        F: FnOnce(&mut TaskItem),
    {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            tracing::debug!(task_id, "task not found; ignoring update");
            return false;
        };
        mutator(task);
        self.persist_tasks();
        true
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn persist_accounts(&self) {
        save_record(self.storage.as_ref(), ACCOUNTS_KEY, &self.accounts);
    }

    fn persist_tasks(&self) {
        save_record(self.storage.as_ref(), TASKS_KEY, &self.tasks);
    }
}
