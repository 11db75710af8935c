//! Profile page controller

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::AppConfig;
use crate::notify::{NotificationCenter, NotificationKind};
use crate::session::{Session, SharedSessionStore};

use super::{Navigator, PageKind, TaskSet};

/// Account-level actions on the profile page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountAction {
    /// Open the password change form
    ChangePassword,
    /// Show recent login activity
    LoginActivity,
    /// Transfer the driver to another company
    SwitchCompany,
    /// Sign out and return to the login screen
    SignOut,
}

/// Drives the profile page: preference toggles, account actions, and the
/// performance report
pub struct ProfileController {
    session: SharedSessionStore,
    notifications: NotificationCenter,
    navigator: Arc<dyn Navigator>,
    preferences: Arc<Mutex<HashMap<String, bool>>>,
    signout_delay: Duration,
    report_delay: Duration,
    tasks: TaskSet,
}

impl ProfileController {
    /// Create the profile page controller
    pub fn new(
        session: SharedSessionStore,
        notifications: NotificationCenter,
        navigator: Arc<dyn Navigator>,
        config: &AppConfig,
    ) -> Self {
        Self {
            session,
            notifications,
            navigator,
            preferences: Arc::new(Mutex::new(HashMap::new())),
            signout_delay: Duration::from_millis(config.actions.transition_delay_ms),
            report_delay: Duration::from_millis(config.actions.prepare_delay_ms),
            tasks: TaskSet::new(),
        }
    }

    /// The driver whose profile is shown
    pub fn driver(&self) -> Option<Session> {
        self.session
            .lock()
            .ok()
            .and_then(|store| store.current().cloned())
    }

    /// Flip a settings toggle
    pub fn set_preference(&mut self, name: &str, enabled: bool) {
        if let Ok(mut prefs) = self.preferences.lock() {
            prefs.insert(name.to_string(), enabled);
        }
        self.notifications.notify(
            format!("{} {}", name, if enabled { "enabled" } else { "disabled" }),
            NotificationKind::Info,
        );
        if name == "Dark Mode" && enabled {
            self.notifications.notify(
                "Dark mode will be applied after app restart",
                NotificationKind::Info,
            );
        }
    }

    /// Current value of a settings toggle
    pub fn preference(&self, name: &str) -> Option<bool> {
        self.preferences
            .lock()
            .ok()
            .and_then(|prefs| prefs.get(name).copied())
    }

    /// Handle an account action
    ///
    /// Sign-out clears the session immediately and schedules the login
    /// redirect; the other actions only open host-side forms.
    pub fn account_action(&mut self, action: AccountAction) {
        match action {
            AccountAction::ChangePassword => {
                self.notifications
                    .notify("Opening password change form...", NotificationKind::Info);
            }
            AccountAction::LoginActivity => {
                self.notifications
                    .notify("Loading login history...", NotificationKind::Info);
            }
            AccountAction::SwitchCompany => {
                self.notifications
                    .notify("Initiating company transfer...", NotificationKind::Info);
            }
            AccountAction::SignOut => {
                if let Ok(mut store) = self.session.lock() {
                    store.logout();
                }
                self.notifications
                    .notify("Signing out...", NotificationKind::Info);

                let navigator = Arc::clone(&self.navigator);
                let delay = self.signout_delay;
                self.tasks.spawn(async move {
                    tokio::time::sleep(delay).await;
                    navigator.navigate(PageKind::Login);
                });
            }
        }
    }

    /// Generate the driver performance report
    pub fn generate_report(&mut self) {
        self.notifications.notify(
            "Generating performance report...",
            NotificationKind::Info,
        );

        let notifications = self.notifications.clone();
        let delay = self.report_delay;
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            notifications.notify(
                "Performance report ready! Opening PDF...",
                NotificationKind::Success,
            );
        });
    }

    /// Tear the page down, cancelling any pending redirect or report
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

    fn profile(navigator: Arc<RecordingNavigator>) -> ProfileController {
        let mut store = SessionStore::new(Box::new(MemoryBackend::new()));
        store.login("DRV-245", "demo123", false).expect("login");
        ProfileController::new(
            store.into_shared(),
            NotificationCenter::default(),
            navigator,
            &AppConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn preference_toggles_stick_and_toast() {
        let mut page = profile(Arc::new(RecordingNavigator::default()));

        page.set_preference("Trip Reminders", true);
        assert_eq!(page.preference("Trip Reminders"), Some(true));
        assert_eq!(page.notifications.active_count(), 1);

        page.set_preference("Trip Reminders", false);
        assert_eq!(page.preference("Trip Reminders"), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn dark_mode_adds_restart_note() {
        let mut page = profile(Arc::new(RecordingNavigator::default()));
        page.set_preference("Dark Mode", true);
        assert_eq!(page.notifications.active_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn sign_out_clears_session_then_redirects() {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut page = profile(Arc::clone(&navigator));
        assert!(page.driver().is_some());

        page.account_action(AccountAction::SignOut);
        assert!(page.driver().is_none(), "session cleared immediately");
        assert_eq!(navigator.last(), None, "redirect waits out the delay");

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(navigator.last(), Some(PageKind::Login));
    }

    #[tokio::test(start_paused = true)]
    async fn report_becomes_ready_after_delay() {
        let mut page = profile(Arc::new(RecordingNavigator::default()));
        page.generate_report();
        assert_eq!(page.notifications.active_count(), 1);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(page.notifications.active_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_signout_redirect() {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut page = profile(Arc::clone(&navigator));

        page.account_action(AccountAction::SignOut);
        page.stop();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(navigator.last(), None);
    }
}
