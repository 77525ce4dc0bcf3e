use clap::{Args, Subcommand};
use serde::Serialize;

use dockhand::target::{self, Target};
use dockhand::trigger;
use dockhand::Error;

use super::CmdResult;

#[derive(Args)]
pub struct TargetArgs {
    #[command(subcommand)]
    pub subcommand: TargetSubcommand,
}

#[derive(Subcommand)]
pub enum TargetSubcommand {
    /// Save a new deploy target
    Add(AddArgs),
    /// List saved targets
    List,
    /// Show one saved target
    Show { id: String },
    /// Remove a saved target
    Remove { id: String },
}

#[derive(Args)]
pub struct AddArgs {
    /// Target ID (used as the config file name)
    pub id: String,

    /// Remote server address
    #[arg(long)]
    pub host: String,

    /// Remote login user
    #[arg(long)]
    pub user: String,

    /// Remote SSH port
    #[arg(long, default_value_t = 22)]
    pub port: u16,

    /// Absolute path to the checkout on the remote host
    #[arg(long)]
    pub path: String,

    /// Git remote to fetch from
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Branch to deploy
    #[arg(long)]
    pub branch: String,

    /// Shell command to run after updating code
    #[arg(long)]
    pub restart_cmd: Option<String>,

    /// Path to the SSH private key for this target
    #[arg(long)]
    pub identity_file: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "action")]
pub enum TargetOutput {
    Add(TargetItemOutput),
    List(TargetListOutput),
    Show(TargetItemOutput),
    Remove(TargetRemoveOutput),
}

#[derive(Serialize)]
pub struct TargetItemOutput {
    pub target: Target,
}

#[derive(Serialize)]
pub struct TargetListOutput {
    pub targets: Vec<Target>,
}

#[derive(Serialize)]
pub struct TargetRemoveOutput {
    pub id: String,
    pub removed: bool,
}

pub fn run(args: TargetArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<TargetOutput> {
    match args.subcommand {
        TargetSubcommand::Add(add) => {
            if target::exists(&add.id) {
                return Err(Error::validation_invalid_argument(
                    "id",
                    format!("Target '{}' already exists", add.id),
                    Some(add.id.clone()),
                    None,
                )
                .with_hint("Run 'dockhand target remove <id>' first to replace it"));
            }

            trigger::validate_ref_name("branch", &add.branch)?;
            trigger::validate_ref_name("remote", &add.remote)?;

            let new_target = Target {
                id: add.id,
                host: add.host,
                user: add.user,
                port: add.port,
                path: add.path,
                remote: add.remote,
                branch: add.branch,
                restart_cmd: add.restart_cmd,
                identity_file: add.identity_file,
            };

            new_target.validate_path()?;
            target::save(&new_target)?;
            Ok((TargetOutput::Add(TargetItemOutput { target: new_target }), 0))
        }
        TargetSubcommand::List => {
            let targets = target::list()?;
            Ok((TargetOutput::List(TargetListOutput { targets }), 0))
        }
        TargetSubcommand::Show { id } => {
            let loaded = target::load(&id)?;
            Ok((TargetOutput::Show(TargetItemOutput { target: loaded }), 0))
        }
        TargetSubcommand::Remove { id } => {
            target::delete(&id)?;
            Ok((
                TargetOutput::Remove(TargetRemoveOutput { id, removed: true }),
                0,
            ))
        }
    }
}
