//! Command-line interface for buddy
//!
//! This module defines the CLI structure using clap derive macros.
//! Account commands live in `auth`, checklist commands in `task`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::model::Account;
use crate::output::{HumanOutput, OutputOptions};
use crate::session::SessionManager;
use crate::storage::{self, MemoryStore, StoreHandle};
use crate::store::DataStore;

mod auth;
mod task;

/// buddy - Study Buddy checklist
///
/// Sign up or log in once, then keep a personal list of study tasks.
/// The session and the list persist between runs.
#[derive(Parser, Debug)]
#[command(name = "buddy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the stored records (defaults to the platform data dir)
    #[arg(long, global = true, env = "BUDDY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and log in to it
    Signup {
        /// 3-20 characters, must not be taken
        username: String,

        /// At least 8 characters including one of ! @ # $ % ^ & *
        #[arg(long, env = "BUDDY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in to an existing account
    Login {
        username: String,

        #[arg(long, env = "BUDDY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Manage the current account's tasks
    #[command(subcommand)]
    Task(TaskCommands),
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task title (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// List tasks in the order they were added
    Ls,

    /// Flip a task between open and done
    Toggle {
        /// Task id or unique id prefix
        id: String,
    },

    /// Change a task's title
    Rename {
        /// Task id or unique id prefix
        id: String,

        /// New title (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Delete a task
    Rm {
        /// Task id or unique id prefix
        id: String,
    },
}

/// The stores a command works against, opened once per invocation.
pub struct Context {
    pub data: DataStore,
    pub sessions: SessionManager,
    pub output: OutputOptions,
    durable: bool,
}

impl Context {
    /// Open the data directory and load both stores from it.
    pub fn open(data_dir: Option<PathBuf>, output: OutputOptions) -> Self {
        let storage: StoreHandle = match config::resolve_data_dir(data_dir) {
            Ok(dir) => {
                let config = Config::load_from_dir(&dir);
                storage::open_store(&config, &dir)
            }
            Err(err) => {
                tracing::warn!(error = %err, "no data directory; running in memory");
                std::rc::Rc::new(MemoryStore::new())
            }
        };

        Self {
            durable: storage.is_durable(),
            data: DataStore::load(storage.clone()),
            sessions: SessionManager::load(storage),
            output,
        }
    }

    /// Account of the current session, or [`Error::NotLoggedIn`].
    pub fn require_account(&self) -> Result<Account> {
        self.sessions
            .current_account()
            .cloned()
            .ok_or(Error::NotLoggedIn)
    }

    /// Note on human output when nothing will survive this run.
    pub fn note_storage(&self, human: &mut HumanOutput) {
        if !self.durable {
            human.push_summary("storage", "in memory only; changes will not be kept");
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let mut ctx = Context::open(self.data_dir, output);

        match self.command {
            Commands::Signup { username, password } => {
                auth::run_signup(&mut ctx, &username, &password)
            }
            Commands::Login { username, password } => {
                auth::run_login(&mut ctx, &username, &password)
            }
            Commands::Logout => auth::run_logout(&mut ctx),
            Commands::Whoami => auth::run_whoami(&ctx),
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add { title } => task::run_add(&mut ctx, &title.join(" ")),
                TaskCommands::Ls => task::run_list(&ctx),
                TaskCommands::Toggle { id } => task::run_toggle(&mut ctx, &id),
                TaskCommands::Rename { id, title } => {
                    task::run_rename(&mut ctx, &id, &title.join(" "))
                }
                TaskCommands::Rm { id } => task::run_remove(&mut ctx, &id),
            },
        }
    }
}
