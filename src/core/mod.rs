pub mod compose;
pub mod config;
pub mod docker;
pub mod env;
pub mod error;
pub mod events;
pub mod model;
pub mod orchestrator;
pub mod process;
pub mod registrar;
pub mod steps;
pub mod store;
pub mod strategy;
pub mod template;
pub mod types;
pub mod workspace;

pub use config::{ConfigLoader, ConfigValidator, LauncherConfig};
pub use error::AppError;
pub use orchestrator::{Launcher, LifecycleReport, Operation, StartOptions};
pub use types::*;
