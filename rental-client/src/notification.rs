//! Notification store
//!
//! Bounded, newest-first window of admin notifications with an unread
//! counter. The counter always equals the number of unread entries in the
//! window; the server stays the source of truth and a refill resets it.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared::models::Notification;
use std::collections::VecDeque;

use crate::config::DEFAULT_NOTIFICATION_CAP;

#[derive(Debug, Default)]
struct State {
    items: VecDeque<Notification>,
    unread: usize,
}

/// Shared notification window
#[derive(Debug)]
pub struct NotificationStore {
    state: Mutex<State>,
    cap: usize,
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_CAP)
    }
}

impl NotificationStore {
    pub fn new(cap: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            cap: cap.max(1),
        }
    }

    /// Prepend a pushed notification, evicting the oldest past the cap
    pub fn push(&self, notification: Notification) {
        let mut state = self.state.lock();
        if !notification.read {
            state.unread += 1;
        }
        state.items.push_front(notification);

        while state.items.len() > self.cap {
            if let Some(evicted) = state.items.pop_back()
                && !evicted.read
            {
                state.unread = state.unread.saturating_sub(1);
            }
        }
    }

    /// Replace the window with a fetched list (newest first)
    pub fn replace(&self, notifications: Vec<Notification>) {
        let items: VecDeque<Notification> = notifications.into_iter().take(self.cap).collect();
        let mut state = self.state.lock();
        state.unread = items.iter().filter(|n| !n.read).count();
        state.items = items;
    }

    /// Mark one entry read. Returns false when it is unknown or already read.
    pub fn mark_read(&self, id: &str, at: DateTime<Utc>) -> bool {
        let mut state = self.state.lock();
        let Some(entry) = state.items.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if entry.read {
            return false;
        }
        entry.mark_read(at);
        state.unread = state.unread.saturating_sub(1);
        true
    }

    pub fn mark_all_read(&self, at: DateTime<Utc>) {
        let mut state = self.state.lock();
        for entry in state.items.iter_mut() {
            entry.mark_read(at);
        }
        state.unread = 0;
    }

    pub fn is_read(&self, id: &str) -> Option<bool> {
        self.state
            .lock()
            .items
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.read)
    }

    pub fn unread_count(&self) -> usize {
        self.state.lock().unread
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Copy of the window, newest first
    pub fn snapshot(&self) -> Vec<Notification> {
        self.state.lock().items.iter().cloned().collect()
    }
}
