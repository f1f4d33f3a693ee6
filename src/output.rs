//! Shared output formatting for buddy commands.
//!
//! Every command produces a serializable report. With `--json` the report
//! is wrapped in a versioned envelope; otherwise a [`HumanOutput`] is
//! printed unless `--quiet` is set.

use serde::Serialize;

use crate::error::{exit_codes, Error, Result};

pub const SCHEMA_VERSION: &str = "buddy.v1";

/// Global flags that take a value, skipped when inferring the command name.
const VALUE_FLAGS: [&str; 2] = ["--data-dir", "--password"];

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    items: Vec<String>,
    hints: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            items: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    /// One line in the body, e.g. a task row
    pub fn push_item(&mut self, value: impl Into<String>) {
        self.items.push(value.into());
    }

    /// A follow-up command worth suggesting
    pub fn push_hint(&mut self, value: impl Into<String>) {
        self.hints.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            hints: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            hints: human.map(|h| h.hints.clone()).unwrap_or_default(),
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hints = error_hints(err);
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            hints: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            },
            hints,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hints.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = vec![output.header.clone()];

    if !output.summary.is_empty() {
        lines.push(String::new());
        for (key, value) in &output.summary {
            lines.push(format!("  {key}: {value}"));
        }
    }

    if !output.items.is_empty() {
        lines.push(String::new());
        lines.extend(output.items.iter().map(|item| format!("  {item}")));
    }

    if !output.hints.is_empty() {
        lines.push(String::new());
        lines.push("Next:".to_string());
        lines.extend(output.hints.iter().map(|hint| format!("  {hint}")));
    }

    lines.join("\n")
}

/// Best-effort command name ("task add", "login") for error envelopes,
/// available even when argument parsing fails.
pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

fn command_name_from(args: impl IntoIterator<Item = String>) -> String {
    let mut positional = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        positional.push(arg);
        if positional.len() == 2 || positional[0] != "task" {
            break;
        }
    }

    if positional.is_empty() {
        "buddy".to_string()
    } else {
        positional.join(" ")
    }
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        exit_codes::USER_ERROR => "user_error",
        _ => "operation_failed",
    }
}

fn error_hints(err: &Error) -> Vec<String> {
    match err {
        Error::NotLoggedIn => vec![
            "buddy login <username> --password <password>".to_string(),
            "buddy signup <username> --password <password>".to_string(),
        ],
        Error::TaskNotFound(_) | Error::AmbiguousTask { .. } => {
            vec!["buddy task ls".to_string()]
        }
        Error::InvalidConfig(_) => vec!["fix buddy.toml then retry".to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn command_name_includes_task_subcommand() {
        assert_eq!(command_name_from(args(&["task", "add", "essay"])), "task add");
        assert_eq!(command_name_from(args(&["--json", "login", "bob"])), "login");
    }

    #[test]
    fn command_name_skips_flag_values() {
        assert_eq!(
            command_name_from(args(&["--data-dir", "/tmp/x", "task", "ls"])),
            "task ls"
        );
        assert_eq!(command_name_from(args(&[])), "buddy");
    }

    #[test]
    fn human_output_lists_sections() {
        let mut human = HumanOutput::new("Tasks for bob");
        human.push_summary("open", "1");
        human.push_item("[ ] 1a2b3c4d essay");
        human.push_hint("buddy task add <title>");

        let text = format_human(&human);
        assert!(text.starts_with("Tasks for bob"));
        assert!(text.contains("open: 1"));
        assert!(text.contains("[ ] 1a2b3c4d essay"));
        assert!(text.contains("Next:"));
    }

    #[test]
    fn not_logged_in_suggests_login() {
        let hints = error_hints(&Error::NotLoggedIn);
        assert!(hints[0].starts_with("buddy login"));
    }
}
