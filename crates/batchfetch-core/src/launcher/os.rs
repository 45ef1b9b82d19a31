//! `ProcessLauncher` backed by real child processes (unix).

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::process::Command;

use super::{ExitStatus, LaunchError, ProcessHandle, ProcessLauncher};

/// Exit code reported for a fetcher that was found but could not be executed.
const EXIT_NOT_EXECUTABLE: u8 = 126;
/// Exit code reported for a fetcher that could not be found at exec time.
const EXIT_NOT_FOUND: u8 = 127;

/// Spawns fetchers with `std::process::Command` and reaps them with
/// `waitpid(-1)`.
///
/// `wait_any` reaps *any* child of the current process, so nothing else in
/// the process should spawn children while a run is in progress. Handles of
/// such foreign children are reported like any other and left to the caller
/// to ignore.
///
/// A child that was created but failed to `exec` the fetcher is not a launch
/// failure: it gets a handle outside the pid range and is reported by the next
/// `wait_any` as exited with 126 (or 127 when the program was not found). Only
/// errors from creating the process itself (`EAGAIN`, `ENOMEM`, ...) surface as
/// [`LaunchError`].
#[derive(Debug)]
pub struct OsLauncher {
    exec_failed: VecDeque<(ProcessHandle, ExitStatus)>,
    next_exec_failed: u32,
}

impl Default for OsLauncher {
    fn default() -> Self {
        Self {
            exec_failed: VecDeque::new(),
            // Real pids fit in a positive i32; count down from the top of u32.
            next_exec_failed: u32::MAX,
        }
    }
}

impl OsLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_exec_failure(&mut self, code: u8) -> ProcessHandle {
        let handle = ProcessHandle::new(self.next_exec_failed);
        self.next_exec_failed -= 1;
        self.exec_failed
            .push_back((handle, ExitStatus::from_code(code)));
        handle
    }
}

/// Exit code to report when `err` came from the exec stage of a spawn.
fn exec_stage_exit_code(err: &io::Error) -> Option<u8> {
    match err.raw_os_error()? {
        libc::ENOENT => Some(EXIT_NOT_FOUND),
        libc::EACCES | libc::ENOEXEC | libc::E2BIG => Some(EXIT_NOT_EXECUTABLE),
        _ => None,
    }
}

impl ProcessLauncher for OsLauncher {
    fn launch(
        &mut self,
        program: &Path,
        arg: &str,
        cwd: &Path,
    ) -> Result<ProcessHandle, LaunchError> {
        let child = match Command::new(program).arg(arg).current_dir(cwd).spawn() {
            Ok(child) => child,
            Err(source) => match exec_stage_exit_code(&source) {
                Some(code) => {
                    let handle = self.record_exec_failure(code);
                    tracing::warn!(
                        program = %program.display(),
                        item = %arg,
                        error = %source,
                        "fetcher could not be executed; counting item as finished"
                    );
                    return Ok(handle);
                }
                None => {
                    return Err(LaunchError {
                        program: program.to_path_buf(),
                        source,
                    })
                }
            },
        };
        let handle = ProcessHandle::new(child.id());
        // Dropping `Child` neither kills nor reaps; the exit is collected by `wait_any`.
        drop(child);
        Ok(handle)
    }

    fn wait_any(&mut self) -> io::Result<(ProcessHandle, ExitStatus)> {
        if let Some(exited) = self.exec_failed.pop_front() {
            return Ok(exited);
        }
        let mut status: libc::c_int = 0;
        loop {
            let pid = unsafe { libc::waitpid(-1, &mut status, 0) };
            if pid > 0 {
                return Ok((ProcessHandle::new(pid as u32), ExitStatus::from_raw(status)));
            }
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_stage_errors_map_to_shell_codes() {
        let code = |errno| exec_stage_exit_code(&io::Error::from_raw_os_error(errno));
        assert_eq!(code(libc::ENOENT), Some(127));
        assert_eq!(code(libc::EACCES), Some(126));
        assert_eq!(code(libc::ENOEXEC), Some(126));
        assert_eq!(code(libc::E2BIG), Some(126));
        assert_eq!(code(libc::EAGAIN), None);
        assert_eq!(code(libc::ENOMEM), None);
        assert_eq!(exec_stage_exit_code(&io::Error::new(io::ErrorKind::Other, "x")), None);
    }

    #[test]
    fn exec_failures_are_reported_by_wait_any_in_order() {
        let mut launcher = OsLauncher::new();
        let first = launcher.record_exec_failure(EXIT_NOT_EXECUTABLE);
        let second = launcher.record_exec_failure(EXIT_NOT_FOUND);
        assert_ne!(first, second);
        assert!(first.to_string().parse::<u32>().unwrap() > i32::MAX as u32);

        let (handle, status) = launcher.wait_any().unwrap();
        assert_eq!(handle, first);
        assert_eq!(status.code(), Some(126));
        let (handle, status) = launcher.wait_any().unwrap();
        assert_eq!(handle, second);
        assert_eq!(status.code(), Some(127));
    }

    #[test]
    fn non_executable_fetcher_launches_as_finished_child() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("download_ctx.s");
        std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        // Mode 0644 from the default umask: exec fails with EACCES.

        let mut launcher = OsLauncher::new();
        let handle = launcher.launch(&script, "A", dir.path()).unwrap();
        let (exited, status) = launcher.wait_any().unwrap();
        assert_eq!(exited, handle);
        assert_eq!(status.code(), Some(126));
        assert!(!status.success());
    }
}
