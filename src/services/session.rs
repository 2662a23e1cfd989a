// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state notifications and the session-expiry reaction.
//!
//! UI components that reflect the logged-in state (nav bar, sidebar) hold a
//! [`Subscription`] for as long as they are mounted; dropping it unsubscribes.

use crate::config::Config;
use crate::error::SESSION_EXPIRED_MESSAGE;
use crate::store::CredentialStore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 32;

/// Authentication state as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Anonymous,
}

/// Process-wide session notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A fresh login succeeded.
    LoggedIn,
    /// The user logged out explicitly.
    LoggedOut,
    /// The session could not be salvaged; `message` is for the user.
    Expired { message: String },
    /// Time to navigate to the login entry point.
    RedirectToLogin { path: String },
}

/// Publish/subscribe hub for [`SessionEvent`]s.
#[derive(Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Broadcast an event. Having no subscribers is fine.
    pub fn publish(&self, event: SessionEvent) {
        tracing::debug!(event = ?event, "Session event");
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live subscription. Drop it to unsubscribe.
pub struct Subscription {
    rx: broadcast::Receiver<SessionEvent>,
}

impl Subscription {
    /// Wait for the next event. `None` once every publisher is gone.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

/// Moves the session from authenticated to anonymous.
///
/// Every operation is idempotent: several in-flight requests may detect
/// expiry at about the same time and each call [`expire`](Self::expire).
#[derive(Clone)]
pub struct SessionExpiryReaction {
    inner: Arc<ReactionInner>,
}

struct ReactionInner {
    store: Arc<dyn CredentialStore>,
    events: SessionEvents,
    login_path: String,
    redirect_delay: Duration,
    /// Set while an expiry message is showing and its redirect is pending.
    redirect_pending: AtomicBool,
    /// Bumped on every login; a redirect scheduled under an older value is dropped.
    generation: AtomicU64,
}

impl SessionExpiryReaction {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        events: SessionEvents,
        login_path: impl Into<String>,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(ReactionInner {
                store,
                events,
                login_path: login_path.into(),
                redirect_delay,
                redirect_pending: AtomicBool::new(false),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn from_config(
        store: Arc<dyn CredentialStore>,
        events: SessionEvents,
        config: &Config,
    ) -> Self {
        Self::new(
            store,
            events,
            config.login_path.clone(),
            config.expiry_redirect_delay,
        )
    }

    pub fn events(&self) -> &SessionEvents {
        &self.inner.events
    }

    pub fn state(&self) -> AuthState {
        if self.inner.store.credential().is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    /// React to an unrecoverable session: clear credentials, tell the user,
    /// and redirect to login after the configured delay.
    ///
    /// While a redirect is already pending, repeat calls only re-clear the store.
    pub fn expire(&self) {
        self.clear_store();

        if self.inner.redirect_pending.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::warn!("Session expired, redirecting to login");
        self.inner.events.publish(SessionEvent::Expired {
            message: SESSION_EXPIRED_MESSAGE.to_string(),
        });
        self.schedule_redirect();
    }

    /// Reject a call made while no access token is stored.
    ///
    /// Leftovers of a broken session (a refresh token without an access
    /// token) expire as usual. A store that never held a session is only
    /// re-cleared: there is nothing to tell the user.
    pub fn reject_anonymous(&self) {
        if self.inner.store.get_refresh_token().is_some() {
            self.expire();
            return;
        }
        tracing::debug!("Request rejected, no session");
        self.clear_store();
    }

    /// Start a new session after a fresh login. Cancels any redirect still
    /// pending from the previous session.
    pub fn begin_session(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.redirect_pending.store(false, Ordering::SeqCst);
    }

    /// Explicit logout. No message and no delayed redirect.
    pub fn logout(&self) {
        self.clear_store();
        tracing::info!("User logged out");
        self.inner.events.publish(SessionEvent::LoggedOut);
    }

    fn clear_store(&self) {
        if let Err(e) = self.inner.store.clear() {
            tracing::error!(error = %e, "Failed to clear credential store");
        }
    }

    fn schedule_redirect(&self) {
        let inner = self.inner.clone();
        let generation = inner.generation.load(Ordering::SeqCst);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(inner.redirect_delay).await;
                    inner.redirect(generation);
                });
            }
            Err(_) => inner.redirect(generation),
        }
    }
}

impl ReactionInner {
    fn redirect(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("New session started, dropping stale redirect");
            return;
        }
        self.redirect_pending.store(false, Ordering::SeqCst);
        self.events.publish(SessionEvent::RedirectToLogin {
            path: self.login_path.clone(),
        });
    }
}
