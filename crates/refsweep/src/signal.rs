//! Ctrl-C handling.
//!
//! The listener runs on its own thread with a current-thread runtime and
//! raises the sweep's cancellation flag on the first interrupt. The sweep
//! itself stays synchronous.

use std::io;
use std::thread::{self, JoinHandle};

use refsweep_core::SweepProgress;
use tracing::{error, warn};

/// Spawn a thread that cancels `progress` when Ctrl-C is pressed.
///
/// The thread is meant to be left detached; it ends after the first
/// interrupt or when the process exits.
pub fn spawn_interrupt_listener(progress: SweepProgress) -> io::Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        warn!("Interrupt received, stopping the sweep");
                        progress.cancel();
                    }
                    Err(e) => error!("Failed to listen for Ctrl-C: {e}"),
                }
            });
        })
}
