//! SessionStore and the Session record

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use super::{AuthError, SessionBackend};

const KEY_LOGGED_IN: &str = "logged_in";
const KEY_DRIVER_ID: &str = "driver_id";
const KEY_DRIVER_NAME: &str = "driver_name";
const KEY_REMEMBER_ME: &str = "remember_me";

/// A logged-in driver's identity and preferences
///
/// Presence of a `Session` means logged in; both identity fields are always
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Fleet-assigned driver ID, e.g. `DRV-245`
    pub driver_id: String,
    /// Display name shown in the sidebar and avatar
    pub driver_name: String,
    /// Whether the session is persisted across restarts
    pub remember_me: bool,
}

impl Session {
    /// Uppercase initials for the avatar, e.g. "Ahmed Hassan" → "AH"
    pub fn initials(&self) -> String {
        self.driver_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(|c| c.to_uppercase())
            .collect()
    }
}

/// Shared handle to a [`SessionStore`]
///
/// Controllers read the session concurrently; the store stays single-writer
/// behind the mutex.
pub type SharedSessionStore = Arc<Mutex<SessionStore>>;

/// Single-writer store for the driver session
///
/// Demo surface: any non-empty credentials are accepted. The password is
/// checked for presence only.
pub struct SessionStore {
    backend: Box<dyn SessionBackend>,
    current: Option<Session>,
}

impl SessionStore {
    /// Create a store over `backend`, restoring a remembered session if the
    /// backend holds one
    pub fn new(backend: Box<dyn SessionBackend>) -> Self {
        let current = restore(backend.as_ref());
        if let Some(session) = &current {
            tracing::info!(driver_id = %session.driver_id, "restored remembered session");
        }
        Self { backend, current }
    }

    /// Wrap the store for shared read access across controllers
    pub fn into_shared(self) -> SharedSessionStore {
        Arc::new(Mutex::new(self))
    }

    /// Sign a driver in
    ///
    /// Fails with [`AuthError::MissingCredentials`] when either field is
    /// empty; otherwise succeeds unconditionally. With `remember_me`, the
    /// session is written through the backend and will be restored by a
    /// fresh store over the same backend.
    pub fn login(
        &mut self,
        driver_id: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<Session, AuthError> {
        if driver_id.trim().is_empty() || password.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let session = Session {
            driver_id: driver_id.trim().to_string(),
            driver_name: display_name(driver_id.trim()).to_string(),
            remember_me,
        };

        if remember_me {
            self.backend.set(KEY_LOGGED_IN, "true")?;
            self.backend.set(KEY_DRIVER_ID, &session.driver_id)?;
            self.backend.set(KEY_DRIVER_NAME, &session.driver_name)?;
            self.backend.set(KEY_REMEMBER_ME, "true")?;
        }

        tracing::info!(driver_id = %session.driver_id, remember_me, "driver signed in");
        self.current = Some(session.clone());
        Ok(session)
    }

    /// Sign the driver out, clearing every persisted session key
    ///
    /// Idempotent: calling it on a logged-out store is a no-op.
    pub fn logout(&mut self) {
        if self.current.take().is_none() {
            return;
        }
        if let Err(e) = self.backend.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
        tracing::info!("driver signed out");
    }

    /// Whether a driver is currently logged in
    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// The current session, if any
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }
}

/// Resolve a display name from the demo roster
fn display_name(driver_id: &str) -> &'static str {
    match driver_id {
        "DRV-245" => "Ahmed Hassan",
        "DRV-108" => "Karim Benali",
        _ => "Driver",
    }
}

fn restore(backend: &dyn SessionBackend) -> Option<Session> {
    if backend.get(KEY_LOGGED_IN).as_deref() != Some("true") {
        return None;
    }
    let driver_id = backend.get(KEY_DRIVER_ID).filter(|id| !id.is_empty())?;
    let driver_name = backend
        .get(KEY_DRIVER_NAME)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| display_name(&driver_id).to_string());
    Some(Session {
        driver_id,
        driver_name,
        remember_me: true,
    })
}
