//! Custom agent discovery and persistence

use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::AgentDescriptor;

/// Loads and stores user-defined agents as one YAML file per agent
pub struct AgentLoader {
    agents_dir: PathBuf,
}

impl AgentLoader {
    pub fn new(agents_dir: PathBuf) -> Self {
        Self { agents_dir }
    }

    /// Load every agent in the directory; unreadable files are skipped with a warning
    pub fn load_all(&self) -> Result<Vec<AgentDescriptor>> {
        let mut agents = Vec::new();

        if !self.agents_dir.exists() {
            return Ok(agents);
        }

        let entries = fs::read_dir(&self.agents_dir)
            .with_context(|| format!("Failed to read agents directory: {}", self.agents_dir.display()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "yaml" || e == "yml").unwrap_or(false) {
                match self.load_agent(&path) {
                    Ok(agent) => agents.push(agent),
                    Err(e) => {
                        log::warn!("Failed to load agent from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // read_dir order is platform dependent
        agents.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(agents)
    }

    pub fn load_agent(&self, path: &Path) -> Result<AgentDescriptor> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read agent file: {}", path.display()))?;

        let mut agent: AgentDescriptor = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse agent file: {}", path.display()))?;

        agent.name = agent.name.trim().to_string();
        if agent.name.is_empty() {
            eyre::bail!("Agent file {} has an empty name", path.display());
        }

        Ok(agent)
    }

    /// Write `agent` to `<agents_dir>/<slug>.yaml`, returning the path
    pub fn save(&self, agent: &AgentDescriptor, overwrite: bool) -> Result<PathBuf> {
        fs::create_dir_all(&self.agents_dir)
            .with_context(|| format!("Failed to create agents directory: {}", self.agents_dir.display()))?;

        let path = self.path_for(&agent.name);
        if path.exists() {
            // Distinct names can share a slug; never clobber another agent's file
            if let Ok(existing) = self.load_agent(&path) {
                if !existing.name.eq_ignore_ascii_case(agent.name.trim()) {
                    eyre::bail!(
                        "Cannot save '{}': {} already holds agent '{}'",
                        agent.name,
                        path.display(),
                        existing.name
                    );
                }
            }
            if !overwrite {
                eyre::bail!("Agent '{}' already exists at {}", agent.name, path.display());
            }
        }

        let yaml = serde_yaml::to_string(agent).context("Failed to serialize agent")?;
        fs::write(&path, yaml).with_context(|| format!("Failed to write agent file: {}", path.display()))?;

        log::info!("Saved custom agent '{}' to {}", agent.name, path.display());
        Ok(path)
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.agents_dir.join(format!("{}.yaml", slug(name)))
    }

    pub fn agents_dir(&self) -> &Path {
        &self.agents_dir
    }
}

/// File-name-safe form of an agent name: "Chess Mentor!" -> "chess-mentor"
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() { "agent".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Chess Mentor!"), "chess-mentor");
        assert_eq!(slug("  A  B  "), "a-b");
        assert_eq!(slug("???"), "agent");
    }

    #[test]
    fn test_slug_keeps_unicode_letters() {
        assert_eq!(slug("日本語 Tutor"), "日本語-tutor");
        assert_ne!(slug("日本語 Tutor"), slug("中文 Tutor"));
        assert_eq!(slug("Éclair Chef"), "éclair-chef");
    }

    #[test]
    fn test_save_never_overwrites_a_different_agent() {
        let temp = TempDir::new().unwrap();
        let loader = AgentLoader::new(temp.path().to_path_buf());
        let first = AgentDescriptor::new("Chess-Mentor", "Learn openings", &[]);
        let second = AgentDescriptor::new("Chess Mentor", "Learn endgames", &[]);
        assert_eq!(loader.path_for(&first.name), loader.path_for(&second.name));

        loader.save(&first, false).unwrap();
        assert!(loader.save(&second, false).is_err());
        assert!(loader.save(&second, true).is_err());

        let loaded = loader.load_all().unwrap();
        assert_eq!(loaded, vec![first]);
    }

    #[test]
    fn test_load_trims_name() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("padded.yaml"), "name: \"  Study Planner \"\ndescription: Mine\n").unwrap();

        let loader = AgentLoader::new(temp.path().to_path_buf());
        let agents = loader.load_all().unwrap();
        assert_eq!(agents[0].name, "Study Planner");
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let loader = AgentLoader::new(PathBuf::from("/nonexistent/agentdeck/agents"));
        assert!(loader.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_all() {
        let temp = TempDir::new().unwrap();
        let loader = AgentLoader::new(temp.path().join("agents"));

        let mut agent = AgentDescriptor::new("Chess Mentor", "Learn openings and endgames", &["Games", "Learning"]);
        agent.prompt = Some("You teach chess.".to_string());
        let path = loader.save(&agent, false).unwrap();
        assert!(path.ends_with("chess-mentor.yaml"));

        let loaded = loader.load_all().unwrap();
        assert_eq!(loaded, vec![agent]);
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let loader = AgentLoader::new(temp.path().to_path_buf());
        let agent = AgentDescriptor::new("Chess Mentor", "Learn openings", &[]);

        loader.save(&agent, false).unwrap();
        assert!(loader.save(&agent, false).is_err());
        assert!(loader.save(&agent, true).is_ok());
    }

    #[test]
    fn test_load_all_skips_bad_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("broken.yaml"), "name: [unclosed").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();
        fs::write(
            temp.path().join("ok.yml"),
            "name: Poet\ndescription: Writes verse\ntags:\n  - Writing\n",
        )
        .unwrap();

        let loader = AgentLoader::new(temp.path().to_path_buf());
        let agents = loader.load_all().unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].name, "Poet");
        assert!(agents[0].tags.contains("Writing"));
    }
}
