//! study-buddy - personal checklist library
//!
//! Accounts, a single signed-in session, and per-account task lists, kept
//! in memory and mirrored to a durable key-value store on every change.
//!
//! # Core Concepts
//!
//! - **Account**: username and password of a registered user
//! - **Task Item**: one checklist entry owned by an account
//! - **Session**: which account, if any, is logged in
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `buddy.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `model`: Account, task and session records
//! - `output`: Human and JSON output for commands
//! - `session`: Signup/login rules and the current session
//! - `storage`: Key-value backends (file, memory) and record helpers
//! - `store`: The account and task collections

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod session;
pub mod storage;
pub mod store;

pub use error::{AuthFailure, Error, Result};
pub use model::{Account, Session, TaskItem};
pub use session::{AuthOutcome, SessionManager};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreHandle};
pub use store::DataStore;
