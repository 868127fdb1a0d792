//! Catalog browsing commands

use colored::*;
use eyre::Result;
use serde::Serialize;

use super::{current_theme, load_catalog};
use crate::catalog::{AgentDescriptor, Catalog, FilterState};
use crate::cli::{AgentsAction, OutputFormat};
use crate::config::Config;
use crate::preferences::Theme;

pub fn run(action: AgentsAction, config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let theme = current_theme(config);

    match action {
        AgentsAction::List { query, tags, format } => {
            let state = FilterState::new(query.unwrap_or_default(), tags);
            list_agents(&catalog, &state, OutputFormat::resolve(format), theme)
        }
        AgentsAction::Tags { format } => list_tags(&catalog, OutputFormat::resolve(format), theme),
        AgentsAction::Show { name, format } => show_agent(&catalog, &name, OutputFormat::resolve(format), theme),
    }
}

#[derive(Serialize)]
struct AgentSummary<'a> {
    name: &'a str,
    description: &'a str,
    tags: Vec<&'a str>,
    custom: bool,
}

impl<'a> From<&'a AgentDescriptor> for AgentSummary<'a> {
    fn from(agent: &'a AgentDescriptor) -> Self {
        Self {
            name: &agent.name,
            description: &agent.description,
            tags: agent.tags.iter().map(|t| t.as_str()).collect(),
            custom: agent.prompt.is_some(),
        }
    }
}

fn list_agents(catalog: &Catalog, state: &FilterState, format: OutputFormat, theme: Theme) -> Result<()> {
    let agents = catalog.filter(state);
    log::debug!("Filter {:?} kept {} of {} agents", state, agents.len(), catalog.len());

    let summaries: Vec<AgentSummary> = agents.iter().map(AgentSummary::from).collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries)?),
        OutputFormat::Text => print_catalog(catalog, state, theme),
    }

    Ok(())
}

/// Render the catalog view: tag badges, then one card per matching agent
pub fn print_catalog(catalog: &Catalog, state: &FilterState, theme: Theme) {
    println!("{}", "AI Agents".bold());
    println!("{}", "Discover and use specialized AI agents for various tasks".dimmed());
    println!();

    let badges: Vec<String> = catalog
        .tag_vocabulary()
        .iter()
        .map(|tag| {
            if state.selected_tags.contains(tag) {
                format!("[{}]", tag).color(theme.accent()).bold().to_string()
            } else {
                tag.dimmed().to_string()
            }
        })
        .collect();
    println!("  {}", badges.join("  "));
    println!();

    let agents = catalog.filter(state);
    if agents.is_empty() {
        println!("  {}", "No agents found matching your criteria".dimmed());
        return;
    }

    if state.is_active() {
        println!("  {}", format!("Showing {} of {} agents", agents.len(), catalog.len()).dimmed());
        println!();
    }
    for agent in &agents {
        print_card(agent, theme);
    }
    println!("Start a conversation with: {}", "agentdeck chat \"<name>\"".cyan());
}

fn print_card(agent: &AgentDescriptor, theme: Theme) {
    println!("  {} {}", "●".green(), agent.name.color(theme.accent()).bold());
    println!("    {}", agent.description.dimmed());
    if !agent.tags.is_empty() {
        let tags: Vec<&str> = agent.tags.iter().map(|t| t.as_str()).collect();
        println!("    Tags: {}", tags.join(", ").cyan());
    }
    println!();
}

fn list_tags(catalog: &Catalog, format: OutputFormat, theme: Theme) -> Result<()> {
    let vocab = catalog.tag_vocabulary();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&vocab)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&vocab)?),
        OutputFormat::Text => {
            println!("{}", "Tags:".bold());
            for tag in &vocab {
                let count = catalog.agents().iter().filter(|a| a.tags.contains(tag)).count();
                println!("  {} {}", tag.color(theme.accent()), format!("({})", count).dimmed());
            }
        }
    }

    Ok(())
}

fn show_agent(catalog: &Catalog, name: &str, format: OutputFormat, theme: Theme) -> Result<()> {
    let Some(agent) = catalog.find(name) else {
        eprintln!("{} Agent '{}' not found", "✗".red(), name);
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(agent)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(agent)?),
        OutputFormat::Text => {
            println!("{} {}", "Agent:".bold(), agent.name.color(theme.accent()).bold());
            println!();
            println!("{} {}", "Description:".bold(), agent.description);

            if !agent.tags.is_empty() {
                println!();
                println!("{}", "Tags:".bold());
                for tag in &agent.tags {
                    println!("  {} {}", "•".cyan(), tag);
                }
            }

            if let Some(ref prompt) = agent.prompt {
                println!();
                println!("{}", "Prompt:".bold());
                for line in prompt.lines() {
                    println!("  {}", line.italic());
                }
            }
        }
    }

    Ok(())
}
