//! Agent catalog: persona descriptors, search and tag filtering
//!
//! The catalog is an immutable, ordered list of [`AgentDescriptor`]s built once
//! at startup (built-ins plus any custom agents on disk) and handed to whoever
//! needs it. Filtering never reorders or mutates it.

pub mod builtin;
pub mod loader;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A named persona the user can chat with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Display name, also the lookup key
    pub name: String,

    /// One-line summary shown on the card
    pub description: String,

    /// Topical tags used by the tag filter
    #[serde(default)]
    pub tags: IndexSet<String>,

    /// System prompt override (custom agents carry one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl AgentDescriptor {
    pub fn new(name: &str, description: &str, tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            prompt: None,
        }
    }

    /// Case-insensitive substring match against name or description
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.description.to_lowercase().contains(&needle)
    }

    /// True when no tags are selected or any selected tag is present
    pub fn matches_tags(&self, selected: &IndexSet<String>) -> bool {
        selected.is_empty() || selected.iter().any(|tag| self.tags.contains(tag))
    }
}

/// Ordered, read-only collection of agents
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    agents: Vec<AgentDescriptor>,
}

impl Catalog {
    pub fn new(agents: Vec<AgentDescriptor>) -> Self {
        Self { agents }
    }

    /// Built-in agents followed by `extra`, skipping names already taken
    pub fn with_extra(extra: Vec<AgentDescriptor>) -> Self {
        let mut agents = builtin::agents();
        for mut agent in extra {
            agent.name = agent.name.trim().to_string();
            if agents.iter().any(|a| a.name.eq_ignore_ascii_case(&agent.name)) {
                log::warn!("Ignoring custom agent '{}': name already in catalog", agent.name);
                continue;
            }
            agents.push(agent);
        }
        Self { agents }
    }

    pub fn agents(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Look up an agent by name, ignoring case
    pub fn find(&self, name: &str) -> Option<&AgentDescriptor> {
        let name = name.trim();
        self.agents.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn filter(&self, state: &FilterState) -> Vec<AgentDescriptor> {
        filter(&self.agents, &state.query, &state.selected_tags)
    }

    pub fn tag_vocabulary(&self) -> IndexSet<String> {
        tag_vocabulary(&self.agents)
    }
}

/// Stable filter over `catalog` by query text and selected tags.
///
/// An entry is kept when it matches the query AND the tag selection; the
/// tag selection is an OR across tags.
pub fn filter(catalog: &[AgentDescriptor], query: &str, selected_tags: &IndexSet<String>) -> Vec<AgentDescriptor> {
    catalog
        .iter()
        .filter(|agent| agent.matches_query(query) && agent.matches_tags(selected_tags))
        .cloned()
        .collect()
}

/// Every tag used anywhere in the catalog, in first-seen order
pub fn tag_vocabulary(catalog: &[AgentDescriptor]) -> IndexSet<String> {
    catalog.iter().flat_map(|a| a.tags.iter().cloned()).collect()
}

/// Search box text plus the set of toggled tag badges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub selected_tags: IndexSet<String>,
}

impl FilterState {
    /// Start from `query` and toggle each tag in turn, like clicking badges
    pub fn new(query: impl Into<String>, tags: impl IntoIterator<Item = String>) -> Self {
        let mut state = Self {
            query: query.into(),
            selected_tags: IndexSet::new(),
        };
        for tag in tags {
            state.toggle_tag(&tag);
        }
        state
    }

    /// Select the tag if absent, deselect it if present
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.selected_tags.shift_remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || !self.selected_tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> IndexSet<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn sample() -> Vec<AgentDescriptor> {
        vec![
            AgentDescriptor::new(
                "Study Planner",
                "Create personalized study schedules and learning plans",
                &["Education", "Planning"],
            ),
            AgentDescriptor::new(
                "Fitness Coach",
                "Personalized workout routines and nutrition advice",
                &["Fitness", "Health"],
            ),
            AgentDescriptor::new(
                "Travel Planner",
                "Plan trips, itineraries and travel recommendations",
                &["Travel", "Planning"],
            ),
        ]
    }

    fn names(agents: &[AgentDescriptor]) -> Vec<&str> {
        agents.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_query_matches_name_case_insensitive() {
        let result = filter(&sample(), "fit", &IndexSet::new());
        assert_eq!(names(&result), vec!["Fitness Coach"]);
    }

    #[test]
    fn test_query_matches_description() {
        let result = filter(&sample(), "ITINERARIES", &IndexSet::new());
        assert_eq!(names(&result), vec!["Travel Planner"]);
    }

    #[test]
    fn test_single_tag() {
        let result = filter(&sample(), "", &tags(&["Education"]));
        assert_eq!(names(&result), vec!["Study Planner"]);
    }

    #[test]
    fn test_tags_are_or_not_and() {
        let result = filter(&sample(), "", &tags(&["Health", "Travel"]));
        assert_eq!(names(&result), vec!["Fitness Coach", "Travel Planner"]);
    }

    #[test]
    fn test_query_and_tags_combine() {
        let result = filter(&sample(), "plan", &tags(&["Travel"]));
        assert_eq!(names(&result), vec!["Travel Planner"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(filter(&sample(), "zzz", &IndexSet::new()).is_empty());
    }

    #[test]
    fn test_empty_filters_are_identity() {
        let catalog = sample();
        assert_eq!(filter(&catalog, "", &IndexSet::new()), catalog);
    }

    #[test]
    fn test_result_preserves_catalog_order() {
        let catalog = sample();
        let result = filter(&catalog, "an", &IndexSet::new());
        let positions: Vec<usize> = result
            .iter()
            .map(|r| catalog.iter().position(|a| a.name == r.name).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = builtin::agents();
        let selected = tags(&["Learning", "Creativity"]);
        let first = filter(&catalog, "e", &selected);
        let second = filter(&catalog, "e", &selected);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_tag_matches_nothing() {
        assert!(filter(&sample(), "", &tags(&["education"])).is_empty());
    }

    #[test]
    fn test_tag_vocabulary_is_union_in_first_seen_order() {
        let vocab = tag_vocabulary(&sample());
        let vocab: Vec<&str> = vocab.iter().map(|s| s.as_str()).collect();
        assert_eq!(vocab, vec!["Education", "Planning", "Fitness", "Health", "Travel"]);
    }

    #[test]
    fn test_tag_vocabulary_ignores_filter_state() {
        let catalog = Catalog::new(sample());
        let before = catalog.tag_vocabulary();
        let _ = catalog.filter(&FilterState::new("fit", vec!["Health".to_string()]));
        assert_eq!(catalog.tag_vocabulary(), before);
    }

    #[test]
    fn test_toggle_tag() {
        let mut state = FilterState::default();
        state.toggle_tag("Health");
        assert!(state.selected_tags.contains("Health"));
        assert!(state.is_active());
        state.toggle_tag("Health");
        assert!(state.selected_tags.is_empty());
        assert!(!state.is_active());
    }

    #[test]
    fn test_repeated_tag_toggles_off() {
        let tags = vec!["Health".to_string(), "Travel".to_string(), "Health".to_string()];
        let state = FilterState::new("", tags);
        assert_eq!(state.selected_tags.len(), 1);
        assert!(state.selected_tags.contains("Travel"));
    }

    #[test]
    fn test_find_ignores_case_and_whitespace() {
        let catalog = Catalog::new(sample());
        assert_eq!(catalog.find("  fitness coach ").map(|a| a.name.as_str()), Some("Fitness Coach"));
        assert!(catalog.find("Fitness").is_none());
    }

    #[test]
    fn test_with_extra_skips_duplicate_names() {
        let extra = vec![
            AgentDescriptor::new("study planner", "dup", &[]),
            AgentDescriptor::new("Chess Mentor", "Learn openings", &["Games"]),
        ];
        let catalog = Catalog::with_extra(extra);
        assert_eq!(catalog.len(), builtin::agents().len() + 1);
        assert_eq!(catalog.agents().last().map(|a| a.name.as_str()), Some("Chess Mentor"));
    }

    #[test]
    fn test_with_extra_skips_padded_duplicate_names() {
        let extra = vec![
            AgentDescriptor::new(" Study Planner ", "dup", &[]),
            AgentDescriptor::new("  Chess Mentor\t", "Learn openings", &["Games"]),
        ];
        let catalog = Catalog::with_extra(extra);

        let planners = catalog.agents().iter().filter(|a| a.name.trim() == "Study Planner").count();
        assert_eq!(planners, 1);
        assert_eq!(catalog.find("chess mentor").map(|a| a.name.as_str()), Some("Chess Mentor"));
    }
}
