//! Login-state stream: a single watch channel downstream consumers subscribe
//! to. Starts at `Unknown`; later values are last-write-wins.

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unknown,
    SignedIn {
        user_id: Uuid,
        username: String,
        role: String,
    },
    SignedOut,
}

#[derive(Clone)]
pub struct AuthEvents {
    tx: Arc<watch::Sender<AuthState>>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::Unknown);
        Self { tx: Arc::new(tx) }
    }

    /// Publish a new state. Subscribers are only woken when the value
    /// actually changes.
    pub fn publish(&self, next: AuthState) {
        self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in(name: &str) -> AuthState {
        AuthState::SignedIn {
            user_id: Uuid::new_v4(),
            username: name.into(),
            role: "user".into(),
        }
    }

    #[tokio::test]
    async fn initial_state_is_unknown() {
        let events = AuthEvents::new();
        assert_eq!(events.current(), AuthState::Unknown);
        let rx = events.subscribe();
        assert_eq!(*rx.borrow(), AuthState::Unknown);
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let events = AuthEvents::new();
        let mut rx = events.subscribe();

        let state = signed_in("alice");
        events.publish(state.clone());
        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow_and_update(), state);

        events.publish(AuthState::SignedOut);
        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn republishing_same_state_does_not_wake_subscribers() {
        let events = AuthEvents::new();
        let state = signed_in("alice");
        events.publish(state.clone());

        let mut rx = events.subscribe();
        rx.borrow_and_update();
        events.publish(state);
        assert!(!rx.has_changed().expect("sender alive"));
    }

    #[tokio::test]
    async fn last_write_wins() {
        let events = AuthEvents::new();
        events.publish(signed_in("alice"));
        events.publish(AuthState::SignedOut);
        let late = events.subscribe();
        assert_eq!(*late.borrow(), AuthState::SignedOut);
    }
}
