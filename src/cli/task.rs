//! buddy task commands
//!
//! All of these act on the logged-in account's tasks only. Ids may be
//! given in full or as a prefix that matches exactly one of those tasks.

use serde::Serialize;

use crate::cli::Context;
use crate::error::{Error, Result};
use crate::model::{validate_title, TaskItem};
use crate::output::{emit_success, HumanOutput};

const SHORT_ID_LEN: usize = 8;

#[derive(Serialize)]
struct TaskListReport {
    owner_id: String,
    total: usize,
    open: usize,
    tasks: Vec<TaskItem>,
}

pub fn run_add(ctx: &mut Context, title: &str) -> Result<()> {
    let account = ctx.require_account()?;
    let title = validate_title(title)?;

    let task = TaskItem::new(account.id, title);
    ctx.data.add_task(task.clone());

    let mut human = HumanOutput::new(format!("Added {}", task_line(&task)));
    ctx.note_storage(&mut human);
    emit_success(ctx.output, "task add", &task, Some(&human))
}

pub fn run_list(ctx: &Context) -> Result<()> {
    let account = ctx.require_account()?;
    let tasks = ctx.data.list_tasks_for_owner(&account.id);
    let open = tasks.iter().filter(|t| !t.completed).count();

    let mut human = HumanOutput::new(format!("Tasks for {}", account.username));
    human.push_summary("open", open.to_string());
    human.push_summary("done", (tasks.len() - open).to_string());
    for task in &tasks {
        human.push_item(task_line(task));
    }
    if tasks.is_empty() {
        human.push_hint("buddy task add <title>");
    }
    ctx.note_storage(&mut human);

    let report = TaskListReport {
        owner_id: account.id,
        total: tasks.len(),
        open,
        tasks,
    };
    emit_success(ctx.output, "task ls", &report, Some(&human))
}

pub fn run_toggle(ctx: &mut Context, id: &str) -> Result<()> {
    let task_id = resolve_owned_task(ctx, id)?;
    ctx.data.toggle_task(&task_id);

    let task = owned_task(ctx, &task_id)?;
    let verb = if task.completed { "Completed" } else { "Reopened" };
    let human = HumanOutput::new(format!("{verb} {}", task_line(&task)));
    emit_success(ctx.output, "task toggle", &task, Some(&human))
}

pub fn run_rename(ctx: &mut Context, id: &str, title: &str) -> Result<()> {
    let title = validate_title(title)?;
    let task_id = resolve_owned_task(ctx, id)?;
    ctx.data.update_task_title(&task_id, title);

    let task = owned_task(ctx, &task_id)?;
    let human = HumanOutput::new(format!("Renamed {}", task_line(&task)));
    emit_success(ctx.output, "task rename", &task, Some(&human))
}

pub fn run_remove(ctx: &mut Context, id: &str) -> Result<()> {
    let task_id = resolve_owned_task(ctx, id)?;
    let task = owned_task(ctx, &task_id)?;
    ctx.data.delete_task(&task_id);

    let human = HumanOutput::new(format!("Deleted {}", task_line(&task)));
    emit_success(ctx.output, "task rm", &task, Some(&human))
}

fn resolve_owned_task(ctx: &Context, needle: &str) -> Result<String> {
    let account = ctx.require_account()?;
    resolve_task_id(&ctx.data.list_tasks_for_owner(&account.id), needle)
}

fn owned_task(ctx: &Context, task_id: &str) -> Result<TaskItem> {
    let account = ctx.require_account()?;
    ctx.data
        .list_tasks_for_owner(&account.id)
        .into_iter()
        .find(|t| t.id == task_id)
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
}

/// Match `needle` against task ids: exact match first, then unique prefix.
fn resolve_task_id(tasks: &[TaskItem], needle: &str) -> Result<String> {
    let needle = needle.trim();
    if needle.is_empty() {
        return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
    }

    if let Some(task) = tasks.iter().find(|t| t.id == needle) {
        return Ok(task.id.clone());
    }

    let matches: Vec<&TaskItem> = tasks.iter().filter(|t| t.id.starts_with(needle)).collect();
    match matches.as_slice() {
        [task] => Ok(task.id.clone()),
        [] => Err(Error::TaskNotFound(needle.to_string())),
        _ => Err(Error::AmbiguousTask {
            prefix: needle.to_string(),
            count: matches.len(),
        }),
    }
}

fn task_line(task: &TaskItem) -> String {
    let mark = if task.completed { "x" } else { " " };
    let short: String = task.id.chars().take(SHORT_ID_LEN).collect();
    format!("[{mark}] {short} {}", task.title)
}
