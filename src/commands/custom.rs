use colored::*;
use eyre::Result;

use crate::catalog::loader::AgentLoader;
use crate::catalog::{Catalog, builtin};
use crate::cli::CustomAction;
use crate::config::Config;
use crate::forms::custom_agent::CustomAgentForm;

pub fn run(action: CustomAction, config: &Config) -> Result<()> {
    match action {
        CustomAction::Create {
            name,
            purpose,
            primary_function,
            knowledge,
            communication_style,
            creativity,
            detail,
            force,
        } => {
            let form = CustomAgentForm {
                name,
                purpose,
                primary_function,
                knowledge,
                communication_style,
                creativity_level: creativity,
                detail_level: detail,
            };
            create(form, force, config)
        }
    }
}

fn create(form: CustomAgentForm, force: bool, config: &Config) -> Result<()> {
    let agent = match form.into_descriptor() {
        Ok(agent) => agent,
        Err(errors) => {
            eprintln!("{} Please fix the following:", "✗".red());
            for error in errors.fields() {
                eprintln!("  {} {}", format!("{}:", error.field).bold(), error.message);
            }
            eyre::bail!("Invalid custom agent");
        }
    };

    let reserved = Catalog::new(builtin::agents());
    if reserved.find(&agent.name).is_some() {
        eyre::bail!("'{}' is a built-in agent; pick another name", agent.name);
    }

    let loader = AgentLoader::new(config.agents_dir());
    let path = loader.save(&agent, force)?;

    println!("{} Custom agent created successfully!", "✓".green());
    println!("  {} is ready to assist you.", agent.name.bold());
    println!("  Saved to {}", path.display().to_string().dimmed());
    println!();
    println!("Start chatting: {}", format!("agentdeck chat \"{}\"", agent.name).cyan());

    Ok(())
}
