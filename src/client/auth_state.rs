// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed-in user state for the device.
//!
//! Screens get an `AuthSession` handed to them and watch it, rather than
//! reading the identity provider's current user directly.

use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub uid: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

/// Current user behind a single observable stream.
#[derive(Debug, Clone)]
pub struct AuthSession {
    tx: watch::Sender<Option<CurrentUser>>,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthSession {
    /// A signed-out session.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn current(&self) -> Option<CurrentUser> {
        self.tx.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Observe sign-in/sign-out. Receivers see the latest value first.
    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.tx.subscribe()
    }

    pub fn sign_in(&self, user: CurrentUser) {
        tracing::info!(uid = %user.uid, "User signed in");
        self.tx.send_replace(Some(user));
    }

    pub fn sign_out(&self) {
        // Only notify watchers if someone was signed in.
        let was_signed_in = self.tx.send_if_modified(|current| current.take().is_some());
        if was_signed_in {
            tracing::info!("User signed out");
        }
    }
}
