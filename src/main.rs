use clap::Parser;
use launcher::cli::{self, Args};
use launcher::core::config::ConfigLoader;
use launcher::logging;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config_file = args.config.clone().or_else(ConfigLoader::default_config_path);
    let _logging = match logging::init(&args.command, config_file.as_deref()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("logging disabled: {:#}", err);
            None
        }
    };

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
