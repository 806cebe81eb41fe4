#![allow(clippy::result_large_err)] // Runner returns AppError directly so callers keep the failed command in context.

use crate::core::error::AppError;
use crate::core::events::{EventKind, EventPublisher, ProgressEvent};
use crate::core::process::classify::{classify, LineSplitter, OutputStream};
use crate::core::types::ErrorCategory;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
const READ_CHUNK_BYTES: usize = 8192;

/// External command to execute.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRequest {
    pub program: String,
    pub args: Vec<String>,
    pub start_label: String,
    pub working_dir: PathBuf,
    pub env: BTreeMap<String, String>,
    /// Keep output out of the progress stream (lookups such as `docker images -q`).
    pub quiet: bool,
}

impl ProcessRequest {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let start_label = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            program: program.to_string(),
            args,
            start_label,
            working_dir: PathBuf::from("."),
            env: BTreeMap::new(),
            quiet: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.start_label = label.into();
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Shell-like rendering of the command, for logs and errors.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|candidate| candidate == arg)
    }
}

/// Result of a finished process.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    /// Stdout fragments in arrival order.
    pub stdout: Vec<String>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> String {
        self.stdout.join("\n")
    }
}

/// Executes external commands.
///
/// A nonzero exit code is not an error: callers decide whether to escalate with
/// [`process_failure`]. Errors are reserved for spawn failures and idle timeouts.
#[async_trait]
pub trait ProcessRunner: Send + Sync + 'static {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, AppError>;
}

/// Build the error surfaced when a command exits nonzero.
pub fn process_failure(request: &ProcessRequest, exit_code: i32) -> AppError {
    AppError::new(
        ErrorCategory::ProcessExecutionError,
        format!(
            "command `{}` failed with exit code {}",
            request.command_line(),
            exit_code
        ),
    )
    .with_code("PROC-003")
    .with_context("command", request.command_line())
    .with_context("exit_code", exit_code.to_string())
}

/// Run the request and turn a nonzero exit code into a `ProcessExecutionError`.
pub async fn run_checked(
    runner: &dyn ProcessRunner,
    request: &ProcessRequest,
) -> Result<ProcessOutput, AppError> {
    let output = runner.run(request).await?;
    if !output.success() {
        return Err(process_failure(request, output.exit_code));
    }
    Ok(output)
}

/// Runner spawning real processes with tokio and streaming their output as events.
pub struct TokioProcessRunner {
    publisher: Arc<dyn EventPublisher>,
    idle_timeout: Duration,
}

impl TokioProcessRunner {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            publisher,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    fn emit(&self, request: &ProcessRequest, stream: OutputStream, fragment: &str) {
        let severity = classify(fragment, stream);
        if request.quiet {
            tracing::trace!(?stream, ?severity, "{}", fragment);
            return;
        }
        self.publisher
            .publish(ProgressEvent::new(fragment, severity).with_kind(EventKind::Log));
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, AppError> {
        tracing::debug!(
            cmd = %request.command_line(),
            cwd = %request.working_dir.display(),
            "executing command"
        );
        if !request.quiet {
            self.publisher
                .publish(ProgressEvent::info(request.start_label.clone()).with_kind(EventKind::Log));
        }

        let mut child = Command::new(&request.program)
            .args(&request.args)
            .current_dir(&request.working_dir)
            .envs(&request.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                AppError::with_source(
                    ErrorCategory::ProcessExecutionError,
                    format!("failed to start `{}`", request.command_line()),
                    err,
                )
                .with_code("PROC-001")
                .with_context("command", request.command_line())
            })?;

        let (chunk_tx, mut chunk_rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            spawn_reader(stdout, OutputStream::Stdout, chunk_tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_reader(stderr, OutputStream::Stderr, chunk_tx.clone());
        }
        drop(chunk_tx);

        let mut stdout_splitter = LineSplitter::new();
        let mut stderr_splitter = LineSplitter::new();
        let mut output = ProcessOutput::default();

        loop {
            match tokio::time::timeout(self.idle_timeout, chunk_rx.recv()).await {
                Ok(Some((stream, chunk))) => {
                    let fragments = match stream {
                        OutputStream::Stdout => stdout_splitter.push(&chunk),
                        OutputStream::Stderr => stderr_splitter.push(&chunk),
                    };
                    for fragment in fragments {
                        self.emit(request, stream, &fragment);
                        if stream == OutputStream::Stdout {
                            output.stdout.push(fragment);
                        }
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    if let Err(err) = child.kill().await {
                        tracing::warn!(error = %err, "failed to kill idle process");
                    }
                    let message = format!(
                        "`{}` produced no output for {}s",
                        request.command_line(),
                        self.idle_timeout.as_secs()
                    );
                    self.publisher.publish(
                        ProgressEvent::error(request.start_label.clone(), message.clone())
                            .with_kind(EventKind::Log),
                    );
                    return Err(AppError::new(ErrorCategory::ProcessExecutionError, message)
                        .with_code("PROC-002")
                        .with_context("command", request.command_line()));
                }
            }
        }

        for fragment in stdout_splitter.finish() {
            self.emit(request, OutputStream::Stdout, &fragment);
            output.stdout.push(fragment);
        }
        for fragment in stderr_splitter.finish() {
            self.emit(request, OutputStream::Stderr, &fragment);
        }

        let status = child.wait().await.map_err(|err| {
            AppError::with_source(
                ErrorCategory::ProcessExecutionError,
                format!("failed to wait for `{}`", request.command_line()),
                err,
            )
            .with_code("PROC-001")
        })?;
        output.exit_code = status.code().unwrap_or(-1);

        if !request.quiet {
            let event = if output.success() {
                ProgressEvent::success(format!("{}: success", request.start_label))
            } else {
                ProgressEvent::error(
                    format!("{}: error (code {})", request.start_label, output.exit_code),
                    format!("exit code {}", output.exit_code),
                )
            };
            self.publisher.publish(event.with_kind(EventKind::Log));
        }
        tracing::debug!(cmd = %request.command_line(), exit_code = output.exit_code, "command finished");
        Ok(output)
    }
}

fn spawn_reader<R>(
    mut reader: R,
    stream: OutputStream,
    sender: mpsc::UnboundedSender<(OutputStream, Vec<u8>)>,
) where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buffer = vec![0u8; READ_CHUNK_BYTES];
        loop {
            match reader.read(&mut buffer).await {
                Ok(0) => break,
                Ok(read) => {
                    if sender.send((stream, buffer[..read].to_vec())).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(?stream, error = %err, "failed to read process output");
                    break;
                }
            }
        }
    });
}
