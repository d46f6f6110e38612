//! Stop requests from the operating system.
//!
//! [`ShutdownSignal::install`] registers the handlers at call time, so a
//! SIGINT or SIGTERM that lands while the first tick is still writing the
//! relays is queued instead of killing the process with the outputs on.
//! Must be called from inside the tokio runtime.

use std::future::pending;

use log::{info, warn};

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

pub struct ShutdownSignal {
    #[cfg(unix)]
    interrupt: Option<Signal>,
    #[cfg(unix)]
    terminate: Option<Signal>,
    #[cfg(windows)]
    ctrl_c: Option<tokio::signal::windows::CtrlC>,
}

impl ShutdownSignal {
    /// Register the stop handlers.  A handler that cannot be registered is
    /// logged and never fires; the others still work.
    #[cfg(unix)]
    pub fn install() -> Self {
        Self {
            interrupt: listen(SignalKind::interrupt(), "SIGINT"),
            terminate: listen(SignalKind::terminate(), "SIGTERM"),
        }
    }

    #[cfg(windows)]
    pub fn install() -> Self {
        let ctrl_c = match tokio::signal::windows::ctrl_c() {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("Ctrl-C handler unavailable: {e}");
                None
            }
        };
        Self { ctrl_c }
    }

    /// Resolves once a stop signal arrives, including one delivered
    /// between [`install`](Self::install) and the first poll.
    #[cfg(unix)]
    pub async fn recv(mut self) {
        tokio::select! {
            () = next(self.interrupt.as_mut()) => info!("SIGINT received"),
            () = next(self.terminate.as_mut()) => info!("SIGTERM received"),
        }
    }

    #[cfg(windows)]
    pub async fn recv(mut self) {
        match self.ctrl_c.as_mut() {
            Some(s) if s.recv().await.is_some() => info!("Ctrl-C received"),
            _ => pending::<()>().await,
        }
    }
}

#[cfg(unix)]
fn listen(kind: SignalKind, name: &str) -> Option<Signal> {
    match signal(kind) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("{name} handler unavailable: {e}");
            None
        }
    }
}

/// Missing or closed streams never resolve.
#[cfg(unix)]
async fn next(signal: Option<&mut Signal>) {
    if let Some(s) = signal {
        if s.recv().await.is_some() {
            return;
        }
    }
    pending::<()>().await;
}
