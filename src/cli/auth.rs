//! buddy signup / login / logout / whoami

use serde::Serialize;

use crate::cli::Context;
use crate::error::Result;
use crate::model::Account;
use crate::output::{emit_success, HumanOutput};

#[derive(Serialize)]
struct AccountReport {
    account_id: String,
    username: String,
}

impl From<&Account> for AccountReport {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id.clone(),
            username: account.username.clone(),
        }
    }
}

#[derive(Serialize)]
struct WhoamiReport {
    logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<AccountReport>,
}

pub fn run_signup(ctx: &mut Context, username: &str, password: &str) -> Result<()> {
    let account = ctx.sessions.try_signup(&mut ctx.data, username, password)?;

    let mut human = HumanOutput::new(format!("Welcome, {}!", account.username));
    human.push_summary("account", account.id.clone());
    ctx.note_storage(&mut human);
    human.push_hint("buddy task add <title>");

    emit_success(ctx.output, "signup", &AccountReport::from(&account), Some(&human))
}

pub fn run_login(ctx: &mut Context, username: &str, password: &str) -> Result<()> {
    let account = ctx.sessions.try_login(&ctx.data, username, password)?;
    let open = ctx
        .data
        .list_tasks_for_owner(&account.id)
        .iter()
        .filter(|t| !t.completed)
        .count();

    let mut human = HumanOutput::new(format!("Logged in as {}", account.username));
    human.push_summary("open tasks", open.to_string());
    ctx.note_storage(&mut human);
    human.push_hint("buddy task ls");

    emit_success(ctx.output, "login", &AccountReport::from(&account), Some(&human))
}

pub fn run_logout(ctx: &mut Context) -> Result<()> {
    let previous = ctx.sessions.current_account().map(AccountReport::from);
    ctx.sessions.logout();

    let header = match &previous {
        Some(account) => format!("Logged out {}", account.username),
        None => "Not logged in".to_string(),
    };
    let human = HumanOutput::new(header);

    let report = WhoamiReport {
        logged_in: false,
        account: previous,
    };
    emit_success(ctx.output, "logout", &report, Some(&human))
}

pub fn run_whoami(ctx: &Context) -> Result<()> {
    let session = ctx.sessions.session_state();
    let report = WhoamiReport {
        logged_in: session.is_logged_in,
        account: session.current_account.as_ref().map(AccountReport::from),
    };

    let mut human = match &report.account {
        Some(account) => {
            let mut human = HumanOutput::new(account.username.clone());
            human.push_summary("account", account.account_id.clone());
            human
        }
        None => {
            let mut human = HumanOutput::new("Not logged in");
            human.push_hint("buddy login <username> --password <password>");
            human
        }
    };
    ctx.note_storage(&mut human);

    emit_success(ctx.output, "whoami", &report, Some(&human))
}
