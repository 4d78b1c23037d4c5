//! # Audio Loudness Bus
//!
//! Carries RMS loudness samples from the audio analysis thread to the render
//! thread.
//!
//! ```text
//! ┌──────────────┐  try_send   ┌─────────────┐  pump()   ┌──────────────────┐
//! │ Audio thread │────────────>│  bounded    │──────────>│ ModulationDriver │
//! │ (analysis)   │  drop full  │  channel    │  drain    │ (render thread)  │
//! └──────────────┘             └─────────────┘           └──────────────────┘
//! ```
//!
//! Delivery is best-effort. A full channel drops the sample; the driver has no
//! buffering obligation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Default channel capacity (about a second of analysis frames).
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// Bounded loudness channel.
pub struct AudioBus {
    sender: Sender<f32>,
    receiver: Receiver<f32>,
    dropped: Arc<AtomicU64>,
}

impl AudioBus {
    /// Creates a bus holding at most `capacity` pending samples.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns a sender for the analysis side.
    #[must_use]
    pub fn sender(&self) -> RmsSender {
        RmsSender {
            sender: self.sender.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Returns a receiver for the render side.
    #[must_use]
    pub fn receiver(&self) -> RmsReceiver {
        RmsReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a connected sender/receiver pair.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (RmsSender, RmsReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

impl Default for AudioBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

/// Sending half, cloned into the audio thread.
#[derive(Clone)]
pub struct RmsSender {
    sender: Sender<f32>,
    dropped: Arc<AtomicU64>,
}

impl RmsSender {
    /// Sends a loudness sample without blocking.
    ///
    /// Returns false if the sample was dropped (channel full or receiver gone).
    #[inline]
    pub fn send(&self, rms: f32) -> bool {
        match self.sender.try_send(rms) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Samples dropped so far across all senders of this bus.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Receiving half, polled by the render thread.
#[derive(Clone)]
pub struct RmsReceiver {
    receiver: Receiver<f32>,
}

impl RmsReceiver {
    /// Takes one pending sample.
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<f32> {
        self.receiver.try_recv().ok()
    }

    /// Number of samples waiting.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns true if samples are waiting.
    #[inline]
    #[must_use]
    pub fn has_samples(&self) -> bool {
        !self.receiver.is_empty()
    }
}
