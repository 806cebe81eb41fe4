use clap::Args;
use std::time::Duration;

/// Identity of the project a command targets.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Client owning the project
    #[arg(value_name = "CLIENT")]
    pub client: String,

    /// Project name within the client
    #[arg(value_name = "PROJECT")]
    pub project: String,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub target: ProjectArgs,

    /// Build only this docker service (repeatable, default: every project container)
    #[arg(long = "service", value_name = "SERVICE")]
    pub services: Vec<String>,
}

#[derive(Args, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub target: ProjectArgs,

    /// Wait until every project container reports running
    #[arg(long)]
    pub wait: bool,

    /// Readiness deadline when waiting, e.g. `90s` or `2m` (default: readiness.timeout)
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration, requires = "wait")]
    pub timeout: Option<Duration>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: ProjectArgs,

    /// Confirm removal of the project directory and its images
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct RemoveServiceArgs {
    #[command(flatten)]
    pub target: ProjectArgs,

    /// Docker service name of the container to remove
    #[arg(value_name = "SERVICE")]
    pub service: String,
}

#[derive(Args, Debug)]
pub struct RenameProjectArgs {
    #[command(flatten)]
    pub target: ProjectArgs,

    /// New project name
    #[arg(value_name = "NEW_NAME")]
    pub new_name: String,
}

#[derive(Args, Debug)]
pub struct RenameClientArgs {
    /// Current client name
    #[arg(value_name = "CLIENT")]
    pub client: String,

    /// New client name
    #[arg(value_name = "NEW_CLIENT")]
    pub new_client: String,
}
