use crate::cli::Command;
use std::env;

pub const AUTOMATION_ENV: &str = "LAUNCHER_AUTOMATION";

/// How the CLI is being driven, which decides where logs go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A developer at a terminal.
    Interactive,
    /// CI jobs and scripts; progress is consumed through the event hub instead.
    Automation,
}

pub fn detect_context(command: &Command) -> ExecutionContext {
    if matches!(command, Command::Show(_)) {
        return ExecutionContext::Interactive;
    }
    if automation_enabled() {
        ExecutionContext::Automation
    } else {
        ExecutionContext::Interactive
    }
}

fn automation_enabled() -> bool {
    let flag = env::var(AUTOMATION_ENV)
        .map(|value| value.trim() == "1")
        .unwrap_or(false);
    flag || env::var("CI").map(|value| !value.trim().is_empty()).unwrap_or(false)
}
