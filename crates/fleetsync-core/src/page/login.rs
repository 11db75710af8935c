//! Login page controller

use std::sync::Arc;
use std::time::Duration;

use crate::config::SessionSettings;
use crate::notify::{NotificationCenter, NotificationKind};
use crate::session::{AuthError, Session, SharedSessionStore, StoreError};

use super::{Navigator, PageKind, TaskSet};

/// Demo autofill driver ID
pub const DEMO_DRIVER_ID: &str = "DRV-245";
/// Demo autofill password
pub const DEMO_PASSWORD: &str = "demo123";

/// Drives the sign-in flow
///
/// Validates the form, waits out the simulated authentication round-trip,
/// signs the driver in, and schedules the dashboard redirect. The caller
/// re-enables the form whenever `submit` returns an error.
pub struct LoginController {
    session: SharedSessionStore,
    notifications: NotificationCenter,
    navigator: Arc<dyn Navigator>,
    settings: SessionSettings,
    tasks: TaskSet,
}

impl LoginController {
    /// Create a login controller
    pub fn new(
        session: SharedSessionStore,
        notifications: NotificationCenter,
        navigator: Arc<dyn Navigator>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            session,
            notifications,
            navigator,
            settings,
            tasks: TaskSet::new(),
        }
    }

    /// Submit the login form
    ///
    /// On success a redirect to the dashboard is scheduled after the
    /// configured delay; the redirect is cancelled if the controller stops
    /// first.
    pub async fn submit(
        &mut self,
        driver_id: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<Session, AuthError> {
        if driver_id.trim().is_empty() || password.trim().is_empty() {
            self.notifications.notify(
                "Please enter driver ID and password",
                NotificationKind::Error,
            );
            return Err(AuthError::MissingCredentials);
        }

        // simulated authentication round-trip
        tokio::time::sleep(Duration::from_millis(self.settings.auth_delay_ms)).await;

        let session = self
            .session
            .lock()
            .map_err(|_| AuthError::Store(StoreError::Poisoned))?
            .login(driver_id, password, remember_me)?;

        self.notifications.notify(
            "Login successful! Redirecting to dashboard...",
            NotificationKind::Success,
        );

        let navigator = Arc::clone(&self.navigator);
        let delay = Duration::from_millis(self.settings.redirect_delay_ms);
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(PageKind::Dashboard);
        });

        Ok(session)
    }

    /// Tear the controller down, cancelling any pending redirect
    pub fn stop(&mut self) {
        self.tasks.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::test_support::RecordingNavigator;
    use crate::session::{MemoryBackend, SessionStore};
    use pretty_assertions::assert_eq;

    fn controller(navigator: Arc<RecordingNavigator>) -> LoginController {
        let session = SessionStore::new(Box::new(MemoryBackend::new())).into_shared();
        LoginController::new(
            session,
            NotificationCenter::default(),
            navigator,
            SessionSettings::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn missing_credentials_fail_without_latency() {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut login = controller(Arc::clone(&navigator));

        let result = login.submit("", "demo123", false).await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(navigator.last(), None, "failed login must not redirect");
    }

    #[tokio::test(start_paused = true)]
    async fn successful_login_redirects_after_delay() {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut login = controller(Arc::clone(&navigator));

        let session = login
            .submit(DEMO_DRIVER_ID, DEMO_PASSWORD, true)
            .await
            .expect("login");
        assert_eq!(session.driver_id, "DRV-245");

        // redirect has not fired yet
        assert_eq!(navigator.last(), None);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(navigator.last(), Some(PageKind::Dashboard));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_redirect() {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut login = controller(Arc::clone(&navigator));

        login
            .submit(DEMO_DRIVER_ID, DEMO_PASSWORD, false)
            .await
            .expect("login");
        login.stop();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(navigator.last(), None, "stopped controller must not navigate");
    }
}
