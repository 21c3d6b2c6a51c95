//! Cooperative cancellation for the philosopher loops.
//!
//! A [`ShutdownTrigger`] is held by the table; every philosopher (and the watchdog)
//! gets a cloned [`ShutdownSignal`]. Dropping the trigger counts as a shutdown
//! request, so a table that goes out of scope never leaves tasks spinning.

use tokio::sync::watch;

/// The sending half. Fires once; later calls are no-ops.
#[derive(Debug)]
pub struct ShutdownTrigger {
    sender: watch::Sender<bool>,
}

/// The receiving half, checked at the top of each cycle and raced against
/// every blocking wait.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

/// Creates a connected trigger/signal pair.
pub fn channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownTrigger { sender }, ShutdownSignal { receiver })
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // send_replace succeeds even with no receivers left.
        self.sender.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once shutdown has been requested or the trigger was dropped.
    pub async fn triggered(&mut self) {
        let _ = self.receiver.wait_for(|stop| *stop).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn signal_resolves_after_trigger() {
        let (trigger, mut signal) = channel();
        assert!(!signal.is_triggered());

        let waiter = tokio::spawn(async move {
            signal.triggered().await;
            signal.is_triggered()
        });

        trigger.trigger();
        let seen = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("signal never resolved")
            .unwrap();
        assert!(seen);
        assert!(trigger.is_triggered());
    }

    #[tokio::test]
    async fn dropping_trigger_releases_waiters() {
        let (trigger, mut signal) = channel();
        drop(trigger);
        tokio::time::timeout(Duration::from_secs(1), signal.triggered())
            .await
            .expect("dropped trigger should release waiters");
    }
}
