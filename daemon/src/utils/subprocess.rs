//! Supervision of external child processes.
//!
//! A [`Supervised`] child is stopped with a SIGTERM first. If it has not exited once the grace
//! period is over, it is SIGKILLed and reaped, so two instances never overlap.

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use smol::process::{Child, Command, Stdio};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("cannot spawn `{0}`: {1}")]
    CannotSpawn(String, std::io::Error),
    #[error("failed to signal child {0}: {1}")]
    SignalFailed(u32, nix::Error),
}

pub struct Supervised {
    name: String,
    child: Child,
}

/// Builds a [`Command`] whose output is discarded.
pub fn quiet_command(program: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

/// Spawns a program and forgets about it.
/// Used for host operations like powering off, whose outcome nobody waits for.
pub fn fire_and_forget(program: &str, args: &[String]) {
    match quiet_command(program, args).spawn() {
        Ok(mut child) => {
            smol::spawn(async move {
                let _ = child.status().await;
            })
            .detach();
        }
        Err(err) => log::error!("cannot spawn `{program}`: {err}"),
    }
}

impl Supervised {
    /// Spawns the given [`Command`].
    ///
    /// # Errors
    /// Returns [`SubprocessError::CannotSpawn`] if the program cannot be started.
    pub fn spawn(name: &str, cmd: &mut Command) -> Result<Self, SubprocessError> {
        let child = cmd
            .spawn()
            .map_err(|err| SubprocessError::CannotSpawn(name.to_string(), err))?;
        log::debug!("spawned `{name}` with pid {}", child.id());
        Ok(Self {
            name: name.to_string(),
            child,
        })
    }

    /// Whether the child has not exited yet.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_status(), Ok(None))
    }

    /// Sends a signal to the child.
    ///
    /// # Errors
    /// Returns [`SubprocessError::SignalFailed`] if the signal cannot be delivered.
    pub fn signal(&self, signal: Signal) -> Result<(), SubprocessError> {
        let id = self.child.id();
        let pid = i32::try_from(id)
            .map_err(|_| SubprocessError::SignalFailed(id, nix::Error::EINVAL))?;
        kill(Pid::from_raw(pid), signal).map_err(|err| SubprocessError::SignalFailed(id, err))
    }

    /// Asks the child to exit and waits at most `grace` for it.
    /// A child still alive afterwards is killed and reaped.
    pub async fn terminate(mut self, grace: Duration) {
        if !self.is_alive() {
            return;
        }
        if let Err(err) = self.signal(Signal::SIGTERM) {
            log::warn!("{err}");
        }
        let exited = smol::future::race(
            async {
                let _ = self.child.status().await;
                true
            },
            async {
                smol::Timer::after(grace).await;
                false
            },
        )
        .await;
        if !exited {
            log::warn!(
                "`{}` did not exit within {}ms, killing it",
                self.name,
                grace.as_millis()
            );
            self.kill().await;
        }
    }

    /// Asks the child to exit without waiting for it.
    pub fn interrupt(mut self) {
        if !self.is_alive() {
            return;
        }
        if let Err(err) = self.signal(Signal::SIGTERM) {
            log::warn!("{err}");
        }
    }

    /// Kills the child immediately and reaps it.
    pub async fn kill(mut self) {
        if !self.is_alive() {
            return;
        }
        if let Err(err) = self.signal(Signal::SIGKILL) {
            log::warn!("{err}");
            return;
        }
        let _ = self.child.status().await;
    }
}
