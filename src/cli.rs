use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::forms::custom_agent::{CommunicationStyle, DEFAULT_LEVEL, PrimaryFunction};
use crate::preferences::ThemeChoice;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "agentdeck",
    about = "Browse AI agent personas, chat with them, and design your own",
    version,
    after_help = "Logs are written to: ~/.local/share/agentdeck/logs/agentdeck.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to agentdeck.yaml config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the agent catalog
    Agents {
        #[command(subcommand)]
        action: AgentsAction,
    },

    /// Chat with an agent
    Chat {
        /// Agent name from the catalog
        name: Option<String>,

        /// Agent descriptor as JSON instead of a catalog name
        #[arg(long)]
        payload: Option<String>,

        /// Send one message, print the reply and exit
        #[arg(long, short)]
        message: Option<String>,
    },

    /// Design your own agent
    Custom {
        #[command(subcommand)]
        action: CustomAction,
    },

    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Account settings
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum AgentsAction {
    /// List agents, optionally filtered
    List {
        /// Match against name or description (case-insensitive)
        #[arg(long, short)]
        query: Option<String>,

        /// Toggle a tag filter; agents with any selected tag are shown (repeatable)
        #[arg(long = "tag", short)]
        tags: Vec<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// List every tag in the catalog
    Tags {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show one agent
    Show {
        /// Agent name
        name: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Subcommand)]
pub enum CustomAction {
    /// Create a custom agent
    Create {
        /// Agent name (2-50 characters)
        #[arg(long)]
        name: String,

        /// What the agent is for (at least 20 characters)
        #[arg(long)]
        purpose: String,

        /// Main way the agent assists
        #[arg(long = "function", value_enum)]
        primary_function: Option<PrimaryFunction>,

        /// Knowledge areas (comma separated or repeated)
        #[arg(long, value_delimiter = ',')]
        knowledge: Vec<String>,

        /// How the agent talks
        #[arg(long = "style", value_enum)]
        communication_style: Option<CommunicationStyle>,

        /// 0 = factual, 100 = inventive
        #[arg(long, default_value_t = DEFAULT_LEVEL)]
        creativity: u8,

        /// 0 = concise, 100 = detailed
        #[arg(long, default_value_t = DEFAULT_LEVEL)]
        detail: u8,

        /// Overwrite an existing custom agent with the same name
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Show the stored and effective theme
    Show,

    /// Set the theme (`system` follows the terminal)
    Set {
        #[arg(value_enum)]
        theme: ThemeChoice,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Update profile details
    Update {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,
    },

    /// Update notification switches
    Notifications {
        #[arg(long)]
        email_notifications: Option<bool>,

        #[arg(long)]
        marketing_emails: Option<bool>,

        #[arg(long)]
        new_feature_updates: Option<bool>,

        #[arg(long)]
        agent_suggestions: Option<bool>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// New value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_agents_list_filters() {
        let cli = Cli::try_parse_from(["agentdeck", "agents", "list", "-q", "fit", "-t", "Health", "-t", "Travel"])
            .unwrap();
        match cli.command {
            Commands::Agents {
                action: AgentsAction::List { query, tags, .. },
            } => {
                assert_eq!(query.as_deref(), Some("fit"));
                assert_eq!(tags, vec!["Health", "Travel"]);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_parse_custom_create() {
        let cli = Cli::try_parse_from([
            "agentdeck",
            "custom",
            "create",
            "--name",
            "Chess Mentor",
            "--purpose",
            "Teach chess to beginners please",
            "--function",
            "teacher",
            "--knowledge",
            "Games,Strategy",
            "--style",
            "socratic",
        ])
        .unwrap();
        match cli.command {
            Commands::Custom {
                action:
                    CustomAction::Create {
                        knowledge,
                        primary_function,
                        creativity,
                        ..
                    },
            } => {
                assert_eq!(knowledge, vec!["Games", "Strategy"]);
                assert_eq!(primary_function, Some(PrimaryFunction::Teacher));
                assert_eq!(creativity, DEFAULT_LEVEL);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_parse_theme_set() {
        let cli = Cli::try_parse_from(["agentdeck", "theme", "set", "system"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Theme {
                action: ThemeAction::Set {
                    theme: ThemeChoice::System
                }
            }
        ));
    }
}
