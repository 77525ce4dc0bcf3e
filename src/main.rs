use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{env, run, target};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(version = VERSION)]
#[command(about = "Push-to-deploy git updates over SSH")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update a remote checkout and run its restart command
    Run(run::RunArgs),
    /// Manage saved deploy targets
    Target(target::TargetArgs),
    /// Report which DEPLOY_* variables are set
    Env(env::EnvArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    let print_result = output::print_json_result(json_result);
    if let Err(err) = print_result {
        tty::status(&format!("Failed to write response: {}", err));
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
