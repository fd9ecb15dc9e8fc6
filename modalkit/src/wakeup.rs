//! Wakeup channel telling the render surface that modal state changed.
//!
//! The host loop blocks when idle. Opening or closing a modal, or a
//! component finishing its load, sends a wakeup so the surface re-renders.
//! At most one signal is buffered; a host that is already awake re-reads
//! the whole stack anyway.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};

/// Sending half, held by [`Modals`](crate::Modals) and the registry.
#[derive(Clone, Debug)]
pub struct WakeupSender {
    tx: mpsc::Sender<()>,
}

impl WakeupSender {
    /// Signal the host. Never blocks.
    pub fn send(&self) {
        if let Err(TrySendError::Closed(())) = self.tx.try_send(()) {
            log::trace!("[wakeup] receiver gone");
        }
    }
}

/// Receiving half, owned by the host loop.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
}

impl WakeupReceiver {
    /// Wait for the next signal. `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Discard signals that arrived while the host was busy.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        while self.rx.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}

/// Create a connected sender/receiver pair.
pub fn channel() -> (WakeupSender, WakeupReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (WakeupSender { tx }, WakeupReceiver { rx })
}

/// Late-bound sender slot shared between clones of a handle.
#[derive(Debug, Default, Clone)]
pub(crate) struct WakeupSlot {
    sender: Arc<Mutex<Option<WakeupSender>>>,
}

impl WakeupSlot {
    pub(crate) fn install(&self, sender: WakeupSender) {
        *self.sender.lock().unwrap_or_else(PoisonError::into_inner) = Some(sender);
    }

    /// Signal through the installed sender, if any.
    pub(crate) fn notify(&self) {
        if let Some(sender) = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            sender.send();
        }
    }
}
