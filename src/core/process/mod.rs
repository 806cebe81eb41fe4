//! External process execution with streamed, classified output.

pub mod classify;
pub mod runner;

pub use classify::{classify, split_fragments, split_records, LineSplitter, OutputStream};
pub use runner::{
    process_failure, run_checked, ProcessOutput, ProcessRequest, ProcessRunner,
    TokioProcessRunner, DEFAULT_IDLE_TIMEOUT,
};
