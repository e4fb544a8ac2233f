//! Location watch — device position fixes delivered over a bounded channel.
//!
//! The sensor side holds a `LocationFeed` and pushes fixes from any thread.
//! The engine drains them on its own thread, one fix per transition, so
//! fixes never overlap with user commands. At most one watch is active;
//! stopping it drops the receiving end, after which every push reports
//! `FeedStatus::Closed` and nothing further is delivered.

use crate::grid::LatLng;
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Queued,
    /// Channel full; the fix was discarded.
    Dropped,
    /// The watch was stopped.
    Closed,
}

/// Sending half handed to the position source.
#[derive(Debug, Clone)]
pub struct LocationFeed {
    sender: SyncSender<LatLng>,
}

impl LocationFeed {
    pub fn push(&self, fix: LatLng) -> FeedStatus {
        match self.sender.try_send(fix) {
            Ok(()) => FeedStatus::Queued,
            Err(TrySendError::Full(_)) => {
                log::debug!("tracking: channel full, dropped fix {fix}");
                FeedStatus::Dropped
            }
            Err(TrySendError::Disconnected(_)) => FeedStatus::Closed,
        }
    }
}

struct ActiveWatch {
    feed:     LocationFeed,
    receiver: Receiver<LatLng>,
}

pub struct LocationWatch {
    capacity: usize,
    active:   Option<ActiveWatch>,
}

impl LocationWatch {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            active:   None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Register the watch. Returns `None` if one is already registered.
    pub fn start(&mut self) -> Option<LocationFeed> {
        if self.active.is_some() {
            return None;
        }
        let (sender, receiver) = mpsc::sync_channel(self.capacity);
        let feed = LocationFeed { sender };
        self.active = Some(ActiveWatch {
            feed: feed.clone(),
            receiver,
        });
        Some(feed)
    }

    /// Unregister the watch. Pending fixes are discarded.
    /// Returns whether a watch was active.
    pub fn stop(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Another handle to the active feed, if any.
    pub fn feed(&self) -> Option<LocationFeed> {
        self.active.as_ref().map(|w| w.feed.clone())
    }

    /// Take every fix queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<LatLng> {
        let Some(watch) = &self.active else {
            return Vec::new();
        };
        let mut fixes = Vec::new();
        loop {
            match watch.receiver.try_recv() {
                Ok(fix) => fixes.push(fix),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        fixes
    }
}
