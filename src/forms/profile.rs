//! Account settings: profile details and notification switches

use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};

use super::{Checker, FormError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), FormError> {
        let mut checker = Checker::default();
        checker.check(
            self.name.trim().chars().count() >= 2,
            "name",
            "Name must be at least 2 characters.",
        );
        checker.check(is_email(self.email.trim()), "email", "Please enter a valid email address.");
        checker.finish()
    }
}

fn is_email(s: &str) -> bool {
    regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", s)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub marketing_emails: bool,
    pub new_feature_updates: bool,
    pub agent_suggestions: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            marketing_emails: false,
            new_feature_updates: true,
            agent_suggestions: true,
        }
    }
}

impl NotificationSettings {
    /// (label, enabled) pairs for display
    pub fn entries(&self) -> [(&'static str, bool); 4] {
        [
            ("Email notifications", self.email_notifications),
            ("Marketing emails", self.marketing_emails),
            ("New feature updates", self.new_feature_updates),
            ("Agent suggestions", self.agent_suggestions),
        ]
    }
}
