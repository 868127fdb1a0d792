use colored::*;
use eyre::Result;

use crate::cli::ThemeAction;
use crate::config::Config;
use crate::preferences::{PreferenceStore, Theme, ThemeChoice};

pub fn run(action: ThemeAction, config: &Config) -> Result<()> {
    let mut store = PreferenceStore::load(&config.preferences_path());

    match action {
        ThemeAction::Show => {
            let stored = match store.preferences().theme {
                Some(theme) => theme.to_string(),
                None => "system".to_string(),
            };
            let system = Theme::from_system();
            println!("{} {}", "Preference:".bold(), stored.cyan());
            println!("{} {}", "System:".bold(), system);
            println!("{} {}", "Effective:".bold(), store.theme().to_string().color(store.theme().accent()));
        }
        ThemeAction::Set { theme } => {
            store.set_theme(theme.into())?;
            let label = match theme {
                ThemeChoice::Light => "light",
                ThemeChoice::Dark => "dark",
                ThemeChoice::System => "system",
            };
            println!("{} Theme set to {}", "✓".green(), label.cyan());
            println!("  Saved to {}", store.path().display().to_string().dimmed());
        }
    }

    Ok(())
}
