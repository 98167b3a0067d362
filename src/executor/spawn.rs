//! External command launch: resolve, fork, exec, wait.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, execve, fork};
use tracing::{debug, warn};

use crate::environment::Environment;

use super::dispatch::ExecError;

pub struct PathResolver;

impl PathResolver {
    /// Standard executable-search semantics, against the shell's own
    /// environment rather than the inherited process one: names containing
    /// a slash are used as-is, everything else is looked up along `PATH`.
    pub fn resolve(&self, command: &str, env: &Environment) -> Option<PathBuf> {
        if command.contains('/') {
            let path = Path::new(command);
            return path.is_file().then(|| path.to_path_buf());
        }

        std::env::split_paths(env.get("PATH"))
            .map(|dir| dir.join(command))
            .find(|candidate| candidate.is_file())
    }
}

/// Forks, replaces the child's image with the resolved command and blocks
/// until it terminates. The environment block is materialized freshly here,
/// so every `set`/`unset`/`cd` since the last launch is visible to the child,
/// and it is dropped again as soon as the wait returns.
pub fn run_external(argv: &[String], env: &Environment) -> Result<i32, ExecError> {
    let program = PathResolver
        .resolve(&argv[0], env)
        .ok_or_else(|| ExecError::CommandNotFound(argv[0].clone()))?;

    let program_c = CString::new(program.as_os_str().as_bytes())?;
    let argv_c = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let envp = env.materialize()?;

    match unsafe { fork() }.map_err(ExecError::Fork)? {
        ForkResult::Child => {
            // Nothing but exec or _exit may happen on this side; returning
            // here would leave two copies of the shell running.
            let errno = execve(&program_c, &argv_c, &envp).unwrap_err();
            eprintln!("rawsh: {}: {}", argv[0], errno.desc());
            unsafe { libc::_exit(127) }
        }
        ForkResult::Parent { child } => {
            debug!(pid = %child, program = %program.display(), "waiting for child");
            match waitpid(child, None).map_err(ExecError::Wait)? {
                WaitStatus::Exited(_, code) => {
                    debug!(code, "child exited");
                    Ok(code)
                }
                WaitStatus::Signaled(_, signal, _) => {
                    warn!(%signal, "child terminated by signal");
                    Ok(128 + signal as i32)
                }
                other => {
                    warn!(?other, "unexpected wait status");
                    Ok(1)
                }
            }
        }
    }
}
