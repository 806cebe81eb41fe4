pub mod args;
pub mod commands;
pub mod context;

pub use args::{
    BuildArgs, DeleteArgs, ProjectArgs, RemoveServiceArgs, RenameClientArgs, RenameProjectArgs,
    StartArgs,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
PROJECT COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "launcher")]
#[command(version = crate::VERSION)]
#[command(about = "Generate and drive docker-compose development projects")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: generate the project tree, build images, start containers, stop them when done."
)]
pub struct Args {
    /// Path to launcher.toml (default: ~/.launcher/launcher.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Write the project tree, compose file and container files",
        long_about = "Generate registers every container in docker-compose.yml, renders Dockerfiles and env files, and runs the build steps of each project container.",
        after_help = "Example:\n    launcher generate acme shop"
    )]
    Generate(ProjectArgs),
    #[command(
        about = "Build container images",
        long_about = "Build creates the shared socle image of each runtime version when missing, then runs `docker compose build` per project container.",
        after_help = "Example:\n    launcher build acme shop --service api"
    )]
    Build(BuildArgs),
    #[command(
        about = "Start the project's containers",
        long_about = "Start brings up service containers first, then project containers, running their start steps and optionally waiting for readiness.",
        after_help = "Example:\n    launcher start acme shop --wait --timeout 90s"
    )]
    Start(StartArgs),
    #[command(
        about = "Stop the project's containers",
        long_about = "Stop runs `docker compose down --remove-orphans`. Named volumes holding database data are kept.",
        after_help = "Example:\n    launcher stop acme shop"
    )]
    Stop(ProjectArgs),
    #[command(
        about = "Remove the project, its images and its directory",
        after_help = "Example:\n    launcher delete acme shop --yes"
    )]
    Delete(DeleteArgs),
    #[command(
        about = "Print the stored project descriptor",
        after_help = "Example:\n    launcher show acme shop"
    )]
    Show(ProjectArgs),
    #[command(
        about = "Drop a container from the project",
        after_help = "Example:\n    launcher remove-service acme shop redis"
    )]
    RemoveService(RemoveServiceArgs),
    #[command(
        about = "Rename a project of a client",
        after_help = "Example:\n    launcher rename-project acme shop store"
    )]
    RenameProject(RenameProjectArgs),
    #[command(
        about = "Rename a client and move all its projects",
        after_help = "Example:\n    launcher rename-client acme globex"
    )]
    RenameClient(RenameClientArgs),
}

pub async fn run(args: Args) -> crate::Result<()> {
    let config = args.config;
    match args.command {
        Command::Generate(target) => commands::generate(config, target).await,
        Command::Build(build_args) => commands::build(config, build_args).await,
        Command::Start(start_args) => commands::start(config, start_args).await,
        Command::Stop(target) => commands::stop(config, target).await,
        Command::Delete(delete_args) => commands::delete(config, delete_args).await,
        Command::Show(target) => commands::show(config, target).await,
        Command::RemoveService(remove_args) => commands::remove_service(config, remove_args).await,
        Command::RenameProject(rename_args) => commands::rename_project(config, rename_args).await,
        Command::RenameClient(rename_args) => commands::rename_client(config, rename_args).await,
    }
}
