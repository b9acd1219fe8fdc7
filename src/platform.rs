use std::io;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with status {code}")]
    NonZeroExit { program: String, code: i32 },
}

/// Opens a target (URI or file path) with the OS default handler or with a
/// named one. Open requests are fire-and-forget: the opened application's
/// lifetime is not tracked.
pub trait Opener {
    fn open_default(&self, target: &str) -> Result<(), PlatformError>;
    fn open_with(&self, target: &str, handler: &str) -> Result<(), PlatformError>;
}

/// Spawns an executable with an argument vector and blocks until the child
/// exits. `Ok` carries the exit code; starting or waiting on the child can
/// fail with a [`PlatformError`].
pub trait Runner {
    fn run(&self, program: &str, args: &[String]) -> Result<i32, PlatformError>;
}

pub struct SystemOpener;

pub struct SystemRunner;

fn spawn_detached(command: &mut Command) -> Result<(), PlatformError> {
    let program = command.get_program().to_string_lossy().into_owned();
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(drop)
        .map_err(|source| PlatformError::Spawn { program, source })
}

#[cfg(target_os = "linux")]
impl Opener for SystemOpener {
    fn open_default(&self, target: &str) -> Result<(), PlatformError> {
        spawn_detached(Command::new("xdg-open").arg(target))
    }

    fn open_with(&self, target: &str, handler: &str) -> Result<(), PlatformError> {
        spawn_detached(Command::new(handler).arg(target))
    }
}

#[cfg(target_os = "macos")]
impl Opener for SystemOpener {
    fn open_default(&self, target: &str) -> Result<(), PlatformError> {
        spawn_detached(Command::new("open").arg(target))
    }

    fn open_with(&self, target: &str, handler: &str) -> Result<(), PlatformError> {
        spawn_detached(Command::new("open").arg("-a").arg(handler).arg(target))
    }
}

#[cfg(windows)]
impl Opener for SystemOpener {
    fn open_default(&self, target: &str) -> Result<(), PlatformError> {
        spawn_detached(Command::new("cmd").args(["/C", "start", ""]).arg(target))
    }

    fn open_with(&self, target: &str, handler: &str) -> Result<(), PlatformError> {
        spawn_detached(Command::new("cmd").args(["/C", "start", "", handler]).arg(target))
    }
}

impl Runner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<i32, PlatformError> {
        let mut child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(|source| PlatformError::Spawn {
                program: program.to_string(),
                source,
            })?;
        let status = child.wait().map_err(|source| PlatformError::Wait {
            program: program.to_string(),
            source,
        })?;
        match status.code() {
            Some(code) => Ok(code),
            None => Ok(signal_exit_code(status)),
        }
    }
}

#[cfg(unix)]
fn signal_exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => 128 + signal,
        None => -1,
    }
}

#[cfg(not(unix))]
fn signal_exit_code(_status: ExitStatus) -> i32 {
    -1
}
