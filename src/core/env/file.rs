#![allow(clippy::result_large_err)]

//! Reading and writing `KEY=VALUE` env files.

use crate::core::env::generator::EnvVariables;
use crate::core::error::AppError;
use crate::utils::write_atomic;
use std::path::Path;

/// Parse env file content. Comments and blank lines are skipped, surrounding quotes
/// stripped; double-quoted values have `\\`, `\"`, `\n` and `\r` unescaped.
pub fn parse_env(content: &str) -> EnvVariables {
    let mut variables = EnvVariables::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        variables.insert(key.trim().to_string(), unquote(value.trim()));
    }
    variables
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return unescape(&value[1..value.len() - 1]);
    }
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].to_string();
    }
    value.to_string()
}

fn unescape(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some(next @ ('"' | '\\')) => unescaped.push(next),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

/// Render variables one per line. Values that would not read back verbatim are
/// double-quoted and escaped.
pub fn render_env(variables: &EnvVariables) -> String {
    let mut content = String::new();
    for (key, value) in variables {
        let needs_quotes = value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\'));
        if needs_quotes {
            content.push_str(&format!("{}=\"{}\"\n", key, escape(value)));
        } else {
            content.push_str(&format!("{}={}\n", key, value));
        }
    }
    content
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Variables of an env file, or `None` when it does not exist.
pub fn read_env_file(path: &Path) -> Result<Option<EnvVariables>, AppError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(parse_env(&content)))
}

pub fn write_env_file(path: &Path, variables: &EnvVariables) -> Result<(), AppError> {
    write_atomic(path, render_env(variables).as_bytes())
}
