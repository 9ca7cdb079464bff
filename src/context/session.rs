use crate::runtime::lock;
use std::sync::{Arc, Mutex};

pub type SessionCallback = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// Subscription token returned by [`SessionContext::on_session_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

#[derive(Default)]
struct SessionState {
    current_user_id: Option<String>,
    listeners: Vec<(u64, SessionCallback)>,
    next_id: u64,
}

/// Current-user state fed by the identity provider adapter.
///
/// Passed explicitly to whatever needs it; there is no global instance.
#[derive(Clone, Default)]
pub struct SessionContext {
    state: Arc<Mutex<SessionState>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user_id(&self) -> Option<String> {
        lock(&self.state).current_user_id.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        lock(&self.state).current_user_id.is_some()
    }

    /// Records a sign-in or sign-out and notifies listeners if it changed
    pub fn set_current_user(&self, user_id: Option<String>) {
        let listeners = {
            let mut state = lock(&self.state);
            if state.current_user_id == user_id {
                return;
            }
            state.current_user_id = user_id.clone();
            state
                .listeners
                .iter()
                .map(|(_, callback)| callback.clone())
                .collect::<Vec<_>>()
        };

        log::info!(
            "session changed: {}",
            user_id.as_deref().unwrap_or("signed out")
        );
        for callback in listeners {
            callback(user_id.as_deref());
        }
    }

    /// Registers `callback`, which is invoked right away with the current
    /// user and then after every change
    pub fn on_session_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        let callback: SessionCallback = Arc::new(callback);
        let (id, current) = {
            let mut state = lock(&self.state);
            state.next_id += 1;
            let id = state.next_id;
            state.listeners.push((id, callback.clone()));
            (id, state.current_user_id.clone())
        };
        callback(current.as_deref());
        Subscription(id)
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut state = lock(&self.state);
        let before = state.listeners.len();
        state.listeners.retain(|(id, _)| *id != subscription.0);
        state.listeners.len() != before
    }
}
