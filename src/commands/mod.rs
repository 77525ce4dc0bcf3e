pub type CmdResult<T> = dockhand::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod env;
pub mod run;
pub mod target;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (dockhand::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Run(args) => dispatch!(args, global, run),
        crate::Commands::Target(args) => dispatch!(args, global, target),
        crate::Commands::Env(args) => dispatch!(args, global, env),
    }
}
