//! Account settings; changes are validated and echoed, not stored

use colored::*;
use eyre::Result;

use crate::cli::ProfileAction;
use crate::forms::profile::{NotificationSettings, ProfileForm};

pub fn run(action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Update { name, email } => update(ProfileForm { name, email }),
        ProfileAction::Notifications {
            email_notifications,
            marketing_emails,
            new_feature_updates,
            agent_suggestions,
        } => {
            let defaults = NotificationSettings::default();
            let settings = NotificationSettings {
                email_notifications: email_notifications.unwrap_or(defaults.email_notifications),
                marketing_emails: marketing_emails.unwrap_or(defaults.marketing_emails),
                new_feature_updates: new_feature_updates.unwrap_or(defaults.new_feature_updates),
                agent_suggestions: agent_suggestions.unwrap_or(defaults.agent_suggestions),
            };
            notifications(settings);
            Ok(())
        }
    }
}

fn update(form: ProfileForm) -> Result<()> {
    if let Err(errors) = form.validate() {
        eprintln!("{} Please fix the following:", "✗".red());
        for error in errors.fields() {
            eprintln!("  {} {}", format!("{}:", error.field).bold(), error.message);
        }
        eyre::bail!("Invalid profile");
    }

    log::info!("Profile updated for {}", form.email.trim());
    println!("{} Profile updated", "✓".green());
    println!("  {} <{}>", form.name.trim().bold(), form.email.trim());
    Ok(())
}

fn notifications(settings: NotificationSettings) {
    println!("{} Notification settings updated", "✓".green());
    for (label, enabled) in settings.entries() {
        let state = if enabled { "on".green() } else { "off".dimmed() };
        println!("  {:<22} {}", label, state);
    }
}
