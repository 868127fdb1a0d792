//! Persisted user preferences
//!
//! Only the theme lives here. The file is read once at startup and rewritten
//! whenever the user changes the theme. A missing or unreadable file means
//! "follow the system".

use colored::Color;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Accent used for agent names and highlights
    pub fn accent(&self) -> Color {
        match self {
            Theme::Light => Color::Blue,
            Theme::Dark => Color::BrightCyan,
        }
    }

    /// Guess the terminal background from `COLORFGBG` ("fg;bg")
    pub fn from_system() -> Theme {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| v.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
            .map(|bg| if bg < 7 || bg == 8 { Theme::Dark } else { Theme::Light })
            .unwrap_or(Theme::Light)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Value accepted by `theme set`; `system` clears the stored choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    System,
}

impl From<ThemeChoice> for Option<Theme> {
    fn from(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Light => Some(Theme::Light),
            ThemeChoice::Dark => Some(Theme::Dark),
            ThemeChoice::System => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl Preferences {
    /// Stored theme, or what the system suggests
    pub fn effective_theme(&self, system: Theme) -> Theme {
        self.theme.unwrap_or(system)
    }
}

/// Preferences bound to the file they came from
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    prefs: Preferences,
}

impl PreferenceStore {
    /// Read preferences; any failure degrades to defaults
    pub fn load(path: &Path) -> Self {
        let prefs = match Self::read(path) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => Preferences::default(),
            Err(e) => {
                log::warn!("Ignoring unreadable preferences at {}: {:#}", path.display(), e);
                Preferences::default()
            }
        };
        log::debug!("Theme preference: {:?}", prefs.theme);

        Self {
            path: path.to_path_buf(),
            prefs,
        }
    }

    fn read(path: &Path) -> Result<Option<Preferences>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).context("Failed to read preferences")?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let prefs = serde_yaml::from_str(&content).context("Failed to parse preferences")?;
        Ok(Some(prefs))
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn theme(&self) -> Theme {
        self.prefs.effective_theme(Theme::from_system())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Change the theme and persist immediately
    pub fn set_theme(&mut self, theme: Option<Theme>) -> Result<()> {
        self.prefs.theme = theme;
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create preferences directory: {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(&self.prefs).context("Failed to serialize preferences")?;
        fs::write(&self.path, yaml)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))?;
        log::info!("Saved theme preference {:?} to {}", self.prefs.theme, self.path.display());
        Ok(())
    }
}
