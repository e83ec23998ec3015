use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, MutexGuard,
};

use tokio::sync::watch;

use crate::models::domain::Session;

/// Identifies a callback registered with [`SessionManager::on_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

/// Single source of truth for who is logged in on this client.
///
/// The current session lives in a `watch` channel, so `subscribe`rs always
/// observe the most recent state. Callbacks registered with `on_change` run
/// synchronously, after the new state is stored, in registration order.
/// They are called without any internal lock held, so a callback may
/// register or remove listeners or change the session itself.
pub struct SessionManager {
    state: watch::Sender<Option<Session>>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
    loading: AtomicBool,
}

impl SessionManager {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state,
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            loading: AtomicBool::new(false),
        }
    }

    pub fn get(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().as_ref().is_some_and(Session::is_admin)
    }

    /// Replaces the current session. The last call wins.
    pub fn set(&self, session: Session) {
        log::debug!("Session set for user '{}'", session.user.username);
        self.state.send_replace(Some(session));
        self.notify();
    }

    pub fn clear(&self) {
        let previous = self.state.send_replace(None);
        if let Some(previous) = previous {
            log::debug!("Session cleared for user '{}'", previous.user.username);
        }
        self.notify();
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    pub fn on_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        id
    }

    /// Returns false if the listener was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::Release);
    }

    /// Drops every registered callback. Channel subscribers see the
    /// session cleared.
    pub fn teardown(&self) {
        self.lock_listeners().clear();
        self.state.send_replace(None);
    }

    fn notify(&self) {
        let current = self.get();
        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(current.as_ref());
        }
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        // A panicking listener must not wedge the session for everyone else.
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
