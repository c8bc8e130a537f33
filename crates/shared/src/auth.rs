use std::sync::{Arc, RwLock};

use domain::UserId;

/// Accessor for the authenticated caller. The access service takes this
/// as a constructor parameter so tests can substitute a stub.
pub trait CurrentUser {
    /// The signed-in user's identifier, or `None` when no session is
    /// established.
    fn current_user(&self) -> Option<UserId>;
}

#[derive(Debug)]
struct SessionState {
    user: Option<UserId>,
    // True until the initial session resolution has completed.
    loading: bool,
}

/// Shared handle onto the auth provider's session state. The host
/// application drives the transitions from its auth-state change
/// callbacks; consumers only read.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    /// A session that is still resolving; no user yet.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                user: None,
                loading: true,
            })),
        }
    }

    pub fn set_signed_in(&self, user: UserId) {
        let mut state = self.state.write().expect("session lock poisoned");
        state.user = Some(user);
        state.loading = false;
    }

    pub fn set_signed_out(&self) {
        let mut state = self.state.write().expect("session lock poisoned");
        state.user = None;
        state.loading = false;
    }

    /// Marks initial resolution finished without changing the user,
    /// e.g. when the provider reports no stored session.
    pub fn finish_loading(&self) {
        self.state.write().expect("session lock poisoned").loading = false;
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .expect("session lock poisoned")
            .user
            .is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().expect("session lock poisoned").loading
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrentUser for Session {
    fn current_user(&self) -> Option<UserId> {
        self.state
            .read()
            .expect("session lock poisoned")
            .user
            .clone()
    }
}
