//! Carrying the chosen persona from the catalog into a chat
//!
//! The chat command receives either a catalog name or a serialized
//! descriptor. Anything that does not resolve to a usable agent becomes
//! `None`, which the session turns into `MissingAgent`.

use crate::catalog::{AgentDescriptor, Catalog};

/// What the user pointed the chat at
#[derive(Debug, Clone, Default)]
pub struct Handoff {
    pub name: Option<String>,
    pub payload: Option<String>,
}

impl Handoff {
    /// Resolve to an agent, preferring an explicit payload over a name
    pub fn resolve(&self, catalog: &Catalog) -> Option<AgentDescriptor> {
        if let Some(ref payload) = self.payload {
            return from_payload(payload);
        }

        let name = self.name.as_deref()?;
        let agent = catalog.find(name).cloned();
        if agent.is_none() {
            log::warn!("Hand-off named unknown agent '{}'", name);
        }
        agent
    }
}

/// Parse a JSON descriptor; malformed or nameless payloads yield `None`
pub fn from_payload(payload: &str) -> Option<AgentDescriptor> {
    match serde_json::from_str::<AgentDescriptor>(payload) {
        Ok(agent) if !agent.name.trim().is_empty() => Some(agent),
        Ok(_) => {
            log::warn!("Hand-off payload has an empty agent name");
            None
        }
        Err(e) => {
            log::warn!("Malformed hand-off payload: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_name() {
        let handoff = Handoff {
            name: Some("career advisor".to_string()),
            payload: None,
        };
        let agent = handoff.resolve(&Catalog::with_extra(Vec::new())).unwrap();
        assert_eq!(agent.name, "Career Advisor");
    }

    #[test]
    fn test_absent_and_unknown_are_none() {
        let catalog = Catalog::with_extra(Vec::new());
        assert!(Handoff::default().resolve(&catalog).is_none());

        let unknown = Handoff {
            name: Some("Nobody".to_string()),
            payload: None,
        };
        assert!(unknown.resolve(&catalog).is_none());
    }

    #[test]
    fn test_payload_roundtrip() {
        let payload = r#"{"name":"Fitness Coach","description":"Workouts","tags":["Fitness","Health"]}"#;
        let agent = from_payload(payload).unwrap();
        assert_eq!(agent.name, "Fitness Coach");
        assert_eq!(agent.tags.len(), 2);
    }

    #[test]
    fn test_payload_wins_over_name() {
        let handoff = Handoff {
            name: Some("Study Planner".to_string()),
            payload: Some(r#"{"name":"Ad Hoc","description":"x"}"#.to_string()),
        };
        let agent = handoff.resolve(&Catalog::default()).unwrap();
        assert_eq!(agent.name, "Ad Hoc");
    }

    #[test]
    fn test_malformed_payloads_are_none() {
        for payload in ["", "{", "[]", r#"{"description":"no name"}"#, r#"{"name":"  ","description":"x"}"#] {
            assert!(from_payload(payload).is_none(), "accepted {:?}", payload);
        }
    }
}
