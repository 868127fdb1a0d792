use colored::*;
use eyre::{Context, Result};

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::{Config, ReplyBackend};

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
        ConfigAction::Set { key, value } => set(&key, &value, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "agentdeck Configuration".bold());
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
            println!();

            println!("{}:", "paths".cyan());
            println!("  agents: {}", config.paths.agents.display());
            println!("  preferences: {}", config.paths.preferences.display());
            println!();

            println!("{}:", "reply".cyan());
            println!("  backend: {}", backend_name(config.reply.backend));
            println!("  delay_ms: {}", config.reply.delay_ms);
            println!("  endpoint: {}", config.reply.endpoint.as_deref().unwrap_or("-"));
            println!("  model: {}", config.reply.model);
            println!("  api_key_env: {}", config.reply.api_key_env.as_deref().unwrap_or("-"));
            println!("  timeout_secs: {}", config.reply.timeout_secs);
        }
    }

    Ok(())
}

fn backend_name(backend: ReplyBackend) -> &'static str {
    match backend {
        ReplyBackend::Placeholder => "placeholder",
        ReplyBackend::Http => "http",
    }
}

fn get(key: &str, config: &Config) -> Result<()> {
    let value = match key {
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        "paths.agents" => Some(config.paths.agents.display().to_string()),
        "paths.preferences" => Some(config.paths.preferences.display().to_string()),
        "reply.backend" => Some(backend_name(config.reply.backend).to_string()),
        "reply.delay_ms" => Some(config.reply.delay_ms.to_string()),
        "reply.endpoint" => Some(config.reply.endpoint.clone().unwrap_or_default()),
        "reply.model" => Some(config.reply.model.clone()),
        "reply.api_key_env" => Some(config.reply.api_key_env.clone().unwrap_or_default()),
        "reply.timeout_secs" => Some(config.reply.timeout_secs.to_string()),
        _ => None,
    };

    match value {
        Some(v) => println!("{}", v),
        None => eyre::bail!("Unknown config key: {}", key),
    }

    Ok(())
}

fn set(key: &str, value: &str, config: &Config) -> Result<()> {
    println!("{} Setting {} = {}", "→".blue(), key.cyan(), value.green());

    let mut new_config = config.clone();

    match key {
        "log_level" | "log-level" => new_config.log_level = value.parse().map_err(|e: String| eyre::eyre!(e))?,
        "paths.agents" => new_config.paths.agents = value.into(),
        "paths.preferences" => new_config.paths.preferences = value.into(),
        "reply.backend" => {
            new_config.reply.backend = match value {
                "placeholder" => ReplyBackend::Placeholder,
                "http" => ReplyBackend::Http,
                _ => eyre::bail!("Invalid backend '{}' (use 'placeholder' or 'http')", value),
            }
        }
        "reply.delay_ms" => new_config.reply.delay_ms = value.parse().context("Invalid number of milliseconds")?,
        "reply.endpoint" => new_config.reply.endpoint = optional(value),
        "reply.model" => new_config.reply.model = value.to_string(),
        "reply.api_key_env" => new_config.reply.api_key_env = optional(value),
        "reply.timeout_secs" => new_config.reply.timeout_secs = value.parse().context("Invalid number of seconds")?,
        _ => {
            eyre::bail!("Unknown config key: {}", key);
        }
    }

    let config_path = new_config.save()?;
    println!("  {} Saved to {}", "✓".green(), config_path.display());

    Ok(())
}

/// Empty string clears an optional setting
fn optional(value: &str) -> Option<String> {
    if value.is_empty() { None } else { Some(value.to_string()) }
}
