//! Shared request status

use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle of the most recent call using a status cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

impl RequestStatus {
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// Observable request status shared between a call site and its client.
///
/// Cloning yields another handle on the same cell. Concurrent calls sharing a
/// cell race on the final state; the last call to settle wins.
#[derive(Clone, Debug)]
pub struct StatusCell {
    sender: Arc<watch::Sender<RequestStatus>>,
}

impl StatusCell {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(RequestStatus::Idle);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Current status
    #[must_use]
    pub fn get(&self) -> RequestStatus {
        *self.sender.borrow()
    }

    pub(crate) fn set(&self, status: RequestStatus) {
        self.sender.send_replace(status);
    }

    /// Receive every status change from now on
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestStatus> {
        self.sender.subscribe()
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_is_shared_between_clones() {
        let cell = StatusCell::new();
        assert_eq!(cell.get(), RequestStatus::Idle);

        let other = cell.clone();
        other.set(RequestStatus::Pending);
        assert_eq!(cell.get(), RequestStatus::Pending);
        assert!(!cell.get().is_settled());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let cell = StatusCell::new();
        let mut rx = cell.subscribe();

        cell.set(RequestStatus::Success);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), RequestStatus::Success);
    }
}
