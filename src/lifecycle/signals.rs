//! Job-control signal handling (Unix only).

use signal_hook::consts::{SIGCONT, SIGSTOP, SIGTSTP};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{LifecycleError, LifecycleEvent, Suspender};

/// Listens for `SIGTSTP` and `SIGCONT` and forwards them as lifecycle events.
///
/// Installing the `SIGTSTP` listener replaces the default "stop" action, so
/// the controller becomes responsible for actually stopping the process
/// (after restoring the terminal) through [`ProcessSuspender`].
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error if either listener cannot be installed.
pub fn spawn_signal_observer(
    tx: mpsc::UnboundedSender<LifecycleEvent>,
) -> Result<JoinHandle<()>, LifecycleError> {
    let mut stop_requests =
        signal(SignalKind::from_raw(SIGTSTP)).map_err(|source| LifecycleError::Listen {
            signal: "SIGTSTP",
            source,
        })?;
    let mut continues =
        signal(SignalKind::from_raw(SIGCONT)).map_err(|source| LifecycleError::Listen {
            signal: "SIGCONT",
            source,
        })?;

    Ok(tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                received = stop_requests.recv() => match received {
                    Some(()) => LifecycleEvent::background_now(),
                    None => break,
                },
                received = continues.recv() => match received {
                    Some(()) => LifecycleEvent::foreground_now(),
                    None => break,
                },
            };

            debug!(?event, "lifecycle signal");
            if tx.send(event).is_err() {
                break;
            }
        }
    }))
}

/// Stops the whole process with `SIGSTOP` until a `SIGCONT` arrives.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSuspender;

impl Suspender for ProcessSuspender {
    fn suspend(&self) -> Result<(), LifecycleError> {
        signal_hook::low_level::raise(SIGSTOP).map_err(LifecycleError::Suspend)
    }
}
