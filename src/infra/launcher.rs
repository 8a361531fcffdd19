//! Infrastructure implementation of the `InstanceLauncher` port.
//!
//! `RuntimeLauncher` resolves a named, pre-provisioned runtime to its
//! interpreter and starts the instance entry point as a detached child.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::application::ports::{InstanceLauncher, ProcessHandle};
use crate::domain::error::LaunchError;
use crate::domain::instance::ENTRY_POINT;

/// Launches instance processes under named runtimes.
pub struct RuntimeLauncher {
    runtimes_dir: PathBuf,
}

impl RuntimeLauncher {
    #[must_use]
    pub fn new(runtimes_dir: PathBuf) -> Self {
        Self { runtimes_dir }
    }
}

/// Resolve a runtime name to its interpreter binary.
///
/// # Errors
///
/// `LaunchError::RuntimeNotFound` if the runtime directory or its
/// interpreter does not exist.
pub fn resolve_interpreter(runtimes_dir: &Path, runtime: &str) -> Result<PathBuf, LaunchError> {
    let root = runtimes_dir.join(runtime);
    #[cfg(unix)]
    let interpreter = root.join("bin").join("python3");
    #[cfg(windows)]
    let interpreter = root.join("Scripts").join("python.exe");
    if !interpreter.is_file() {
        return Err(LaunchError::RuntimeNotFound(runtime.to_string()));
    }
    Ok(interpreter)
}

impl InstanceLauncher for RuntimeLauncher {
    async fn start(&self, dir: &Path, runtime: &str) -> Result<ProcessHandle, LaunchError> {
        let interpreter = resolve_interpreter(&self.runtimes_dir, runtime)?;
        let entry = dir.join(ENTRY_POINT);
        if !entry.is_file() {
            return Err(LaunchError::EntryMissing(entry));
        }

        // Detached: null stdio, and the child is not killed when the handle
        // drops. Launch success means "process started", nothing more.
        let child = tokio::process::Command::new(interpreter)
            .arg(ENTRY_POINT)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false)
            .spawn()
            .map_err(LaunchError::Spawn)?;

        let pid = child.id().ok_or_else(|| {
            LaunchError::Spawn(std::io::Error::other(
                "process exited before a pid could be captured",
            ))
        })?;
        Ok(ProcessHandle { pid })
    }
}
