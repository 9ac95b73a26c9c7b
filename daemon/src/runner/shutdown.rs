//! Cooperative shutdown.
//!
//! [`Shutdown`] is cloned into every task. Triggering it closes an internal channel, which wakes
//! every task waiting on it. Termination signals only raise a flag, the main loop turns that flag
//! into a triggered [`Shutdown`].

use nix::libc::c_int;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use smol::channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static SIGNALLED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_signal(_: c_int) {
    SIGNALLED.store(true, Ordering::SeqCst);
}

/// Makes SIGTERM and SIGINT request a shutdown.
///
/// # Errors
/// See [`sigaction`].
pub fn install_signal_handlers() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in [Signal::SIGTERM, Signal::SIGINT] {
        // Safety: the handler only stores into an atomic.
        unsafe { sigaction(signal, &action) }?;
    }
    Ok(())
}

/// Whether a termination signal was received.
pub fn signalled() -> bool {
    SIGNALLED.load(Ordering::SeqCst)
}

#[derive(Clone)]
pub struct Shutdown {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl Default for Shutdown {
    fn default() -> Self {
        let (tx, rx) = smol::channel::bounded(1);
        Self { tx, rx }
    }
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.tx.close();
    }

    pub fn is_triggered(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once triggered.
    pub async fn wait(&self) {
        // Nothing is ever sent, this only returns when the channel is closed.
        let _ = self.rx.recv().await;
    }

    /// Sleeps for `duration`. Returns `false` if interrupted by a shutdown.
    pub async fn sleep(&self, duration: Duration) -> bool {
        smol::future::race(
            async {
                smol::Timer::after(duration).await;
                true
            },
            async {
                self.wait().await;
                false
            },
        )
        .await
    }
}
