//! Wake-up channel for the foreground loop.
//!
//! Terminal input and background progress callbacks both feed one bounded
//! channel. The loop blocks on it with a tick timeout, so a dropped wake-up
//! only delays the next redraw.

use crossterm::event::KeyEvent;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

/// Something the foreground loop should react to.
#[derive(Debug, Clone)]
pub enum UiEvent {
    Key(KeyEvent),
    /// Progress changed or the terminal was resized.
    Redraw,
}

/// Create the channel with room for `capacity` pending events.
pub fn channel(capacity: usize) -> (Waker, Receiver<UiEvent>) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (Waker { tx: Some(tx) }, rx)
}

/// Cheap handle used by background work to request a redraw.
#[derive(Debug, Clone, Default)]
pub struct Waker {
    tx: Option<SyncSender<UiEvent>>,
}

impl Waker {
    /// A waker connected to nothing, for headless runs.
    pub fn noop() -> Self {
        Self { tx: None }
    }

    /// Request a redraw without blocking. A full channel already holds a
    /// pending wake-up, so the request is dropped.
    pub fn wake(&self) {
        if let Some(tx) = &self.tx {
            match tx.try_send(UiEvent::Redraw) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => {
                    tracing::trace!("wake after foreground loop exited");
                }
            }
        }
    }

    /// Forward terminal input, waiting for room. Returns false once the
    /// foreground loop is gone.
    pub fn send_input(&self, event: UiEvent) -> bool {
        match &self.tx {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wake_never_blocks_when_full() {
        let (waker, rx) = channel(1);
        waker.wake();
        waker.wake();
        waker.wake();
        assert!(matches!(rx.try_recv(), Ok(UiEvent::Redraw)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn wake_after_receiver_dropped_is_harmless() {
        let (waker, rx) = channel(1);
        drop(rx);
        waker.wake();
        assert!(!waker.send_input(UiEvent::Redraw));
    }

    #[test]
    fn noop_waker() {
        let waker = Waker::noop();
        waker.wake();
        assert!(!waker.send_input(UiEvent::Redraw));
    }
}
