use clap::Args;
use serde::Serialize;

use dockhand::deploy::{self, RunOptions, RunReport};
use dockhand::target::{self, Target};

use super::CmdResult;

#[derive(Args)]
pub struct RunArgs {
    /// Saved target ID (omit to read everything from DEPLOY_* variables)
    pub target_id: Option<String>,

    /// Pushed ref reported by the CI system (e.g. refs/heads/main).
    /// When it does not name the deploy branch the run is skipped with
    /// exit code 0, so pipelines can invoke dockhand on every push.
    #[arg(long = "ref")]
    pub pushed_ref: Option<String>,

    /// Compose and report the remote command without executing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
pub struct RunOutput {
    pub command: String,
    #[serde(flatten)]
    pub report: RunReport,
}

pub fn run(args: RunArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RunOutput> {
    let target = resolve_target(args.target_id.as_deref())?;

    let options = RunOptions {
        pushed_ref: args.pushed_ref,
        dry_run: args.dry_run,
    };

    let report = deploy::run(&target, &options)?;

    Ok((
        RunOutput {
            command: "deploy.run".to_string(),
            report,
        },
        0,
    ))
}

fn resolve_target(target_id: Option<&str>) -> dockhand::Result<Target> {
    match target_id {
        Some(id) => {
            let mut target = target::load(id)?;
            target.apply_env_overrides(|name| std::env::var(name).ok())?;
            Ok(target)
        }
        None => Target::from_env().map_err(|e| {
            e.with_hint("Pass a saved target ID or export the DEPLOY_* variables")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockhand::target::{ENV_BRANCH, ENV_HOST, ENV_PATH, ENV_USER};
    use std::collections::HashMap;

    fn env_target() -> Target {
        let vars: HashMap<String, String> = [
            (ENV_HOST, "deploy.example.com"),
            (ENV_USER, "deploy"),
            (ENV_PATH, "/var/www/app"),
            (ENV_BRANCH, "main"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Target::from_env_with(|k| vars.get(k).cloned()).unwrap()
    }

    fn output_for(pushed_ref: Option<&str>, dry_run: bool) -> serde_json::Value {
        let options = RunOptions {
            pushed_ref: pushed_ref.map(|r| r.to_string()),
            dry_run,
        };
        let report = deploy::run_with_env(&env_target(), &options, |_| None).unwrap();

        serde_json::to_value(RunOutput {
            command: "deploy.run".to_string(),
            report,
        })
        .unwrap()
    }

    #[test]
    fn planned_output_keeps_envelope_label_and_remote_command() {
        let value = output_for(None, true);

        assert_eq!(value["command"], "deploy.run");
        assert_eq!(value["status"], "planned");
        assert!(value["remoteCommand"]
            .as_str()
            .unwrap()
            .starts_with("cd '/var/www/app'"));
    }

    #[test]
    fn skipped_output_carries_same_envelope_label() {
        let value = output_for(Some("refs/heads/other"), false);

        assert_eq!(value["command"], "deploy.run");
        assert_eq!(value["status"], "skipped");
    }
}
