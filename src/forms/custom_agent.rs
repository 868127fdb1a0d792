//! The "create your own agent" form

use serde::{Deserialize, Serialize};

use super::{Checker, FormError};
use crate::catalog::AgentDescriptor;

/// The main way the agent assists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryFunction {
    Teacher,
    Coach,
    Analyst,
    Creative,
    Planner,
}

impl PrimaryFunction {
    pub fn label(&self) -> &'static str {
        match self {
            PrimaryFunction::Teacher => "Teaching & Education",
            PrimaryFunction::Coach => "Coaching & Motivation",
            PrimaryFunction::Analyst => "Analysis & Research",
            PrimaryFunction::Creative => "Creative & Generative",
            PrimaryFunction::Planner => "Planning & Organization",
        }
    }

    /// Catalog tag the agent is filed under
    pub fn tag(&self) -> &'static str {
        match self {
            PrimaryFunction::Teacher => "Education",
            PrimaryFunction::Coach => "Coaching",
            PrimaryFunction::Analyst => "Research",
            PrimaryFunction::Creative => "Creativity",
            PrimaryFunction::Planner => "Planning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStyle {
    Formal,
    Casual,
    Direct,
    Supportive,
    Socratic,
}

impl CommunicationStyle {
    pub fn label(&self) -> &'static str {
        match self {
            CommunicationStyle::Formal => "Formal & Professional",
            CommunicationStyle::Casual => "Casual & Conversational",
            CommunicationStyle::Direct => "Direct & Concise",
            CommunicationStyle::Supportive => "Supportive & Encouraging",
            CommunicationStyle::Socratic => "Socratic & Questioning",
        }
    }
}

pub const DEFAULT_LEVEL: u8 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAgentForm {
    pub name: String,
    pub purpose: String,
    pub primary_function: Option<PrimaryFunction>,
    pub knowledge: Vec<String>,
    pub communication_style: Option<CommunicationStyle>,
    /// 0 = strictly factual, 100 = highly inventive
    pub creativity_level: u8,
    /// 0 = terse, 100 = exhaustive
    pub detail_level: u8,
}

impl Default for CustomAgentForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            purpose: String::new(),
            primary_function: None,
            knowledge: Vec::new(),
            communication_style: None,
            creativity_level: DEFAULT_LEVEL,
            detail_level: DEFAULT_LEVEL,
        }
    }
}

impl CustomAgentForm {
    pub fn validate(&self) -> Result<(), FormError> {
        let name_len = self.name.trim().chars().count();
        let mut checker = Checker::default();

        checker.check(name_len >= 2, "name", "Agent name must be at least 2 characters.");
        checker.check(name_len <= 50, "name", "Agent name must be at most 50 characters.");
        checker.check(
            self.purpose.trim().chars().count() >= 20,
            "purpose",
            "Please provide a more detailed purpose (at least 20 characters).",
        );
        checker.check(
            self.primary_function.is_some(),
            "primary_function",
            "Please select a primary function.",
        );
        checker.check(
            self.knowledge.iter().any(|k| !k.trim().is_empty()),
            "knowledge",
            "Please select at least one knowledge area.",
        );
        checker.check(
            self.communication_style.is_some(),
            "communication_style",
            "Please select a communication style.",
        );
        checker.check(self.creativity_level <= 100, "creativity_level", "Must be between 0 and 100.");
        checker.check(self.detail_level <= 100, "detail_level", "Must be between 0 and 100.");

        checker.finish()
    }

    /// Validate and turn the form into a catalog entry
    pub fn into_descriptor(self) -> Result<AgentDescriptor, FormError> {
        self.validate()?;

        let prompt = self.prompt();
        let mut agent = AgentDescriptor::new(self.name.trim(), self.purpose.trim(), &[]);
        if let Some(function) = self.primary_function {
            agent.tags.insert(function.tag().to_string());
        }
        for area in &self.knowledge {
            let area = area.trim();
            if !area.is_empty() {
                agent.tags.insert(area.to_string());
            }
        }
        agent.prompt = Some(prompt);
        Ok(agent)
    }

    fn prompt(&self) -> String {
        let mut parts = vec![format!(
            "You are {}, a custom AI assistant. Your purpose: {}",
            self.name.trim(),
            self.purpose.trim()
        )];

        if let Some(function) = self.primary_function {
            parts.push(format!("Primary function: {}.", function.label()));
        }

        let knowledge: Vec<&str> = self.knowledge.iter().map(|k| k.trim()).filter(|k| !k.is_empty()).collect();
        if !knowledge.is_empty() {
            parts.push(format!("Knowledge areas: {}.", knowledge.join(", ")));
        }

        if let Some(style) = self.communication_style {
            parts.push(format!("Communication style: {}.", style.label()));
        }

        parts.push(
            match self.creativity_level {
                0..=33 => "Stay factual and grounded; avoid speculation.",
                34..=66 => "Balance creativity with accuracy.",
                _ => "Be imaginative and inventive; offer unexpected ideas.",
            }
            .to_string(),
        );
        parts.push(
            match self.detail_level {
                0..=33 => "Keep answers short and to the point.",
                34..=66 => "Give moderately detailed answers.",
                _ => "Be thorough and explain in depth.",
            }
            .to_string(),
        );

        parts.join("\n\n")
    }
}
