mod client;
mod identity;

pub use client::{execute_local_command, is_local_host, CommandOutput, SshClient};
pub use identity::{plan_identity, resolve_identity, write_key_material};
