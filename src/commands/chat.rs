//! Interactive conversation with one agent

use chrono::Local;
use colored::*;
use eyre::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::{current_theme, load_catalog};
use crate::catalog::FilterState;
use crate::config::Config;
use crate::handoff::Handoff;
use crate::preferences::Theme;
use crate::session::driver::{InFlight, exchange};
use crate::session::reply::{self, ReplyFailure, ReplyGenerator};
use crate::session::{ConversationSession, Message, ReplyTicket, Resolution, Role, SessionError, SubmitRejected};

pub fn run(name: Option<String>, payload: Option<String>, message: Option<String>, config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let theme = current_theme(config);

    let agent = Handoff { name, payload }.resolve(&catalog);
    let mut session = match ConversationSession::start(agent) {
        Ok(session) => session,
        Err(e @ SessionError::MissingAgent) => {
            // Back to the catalog
            eprintln!("{} {}", "✗".red(), e);
            eprintln!();
            super::agents::print_catalog(&catalog, &FilterState::default(), theme);
            if message.is_some() {
                eyre::bail!("Cannot send message: {}", e);
            }
            return Ok(());
        }
    };

    let generator: Arc<dyn ReplyGenerator> = Arc::from(reply::from_config(&config.reply)?);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    if let Some(text) = message {
        let result = rt.block_on(ask_once(&mut session, generator.as_ref(), &text, theme));
        rt.shutdown_background();
        return result;
    }

    let result = rt.block_on(async {
        let stdin = BufReader::new(tokio::io::stdin());
        tokio::select! {
            result = converse(&mut session, generator, stdin, theme) => result,
            _ = tokio::signal::ctrl_c() => {
                println!();
                Ok(())
            }
        }
    });

    log::info!(
        "Left conversation with '{}' after {} messages",
        session.agent().name,
        session.transcript().len()
    );

    // stdin may still be parked on a blocking read
    rt.shutdown_background();
    result
}

/// Send a single message, print the reply and leave
async fn ask_once(session: &mut ConversationSession, generator: &dyn ReplyGenerator, text: &str, theme: Theme) -> Result<()> {
    print_header(session, theme);
    for message in session.transcript() {
        print_message(message, &session.agent().name, theme);
    }

    match exchange(session, generator, text).await {
        Ok(resolution) => {
            if let Some(user) = session.transcript().iter().rev().find(|m| m.role == Role::User) {
                print_message(user, &session.agent().name, theme);
            }
            show(session, resolution, theme);
            match session.last_failure() {
                Some(failure) => eyre::bail!("No reply from {}: {}", session.agent().name, failure),
                None => Ok(()),
            }
        }
        Err(e) => eyre::bail!("Cannot send message: {}", e),
    }
}

/// What a line of input asks for
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Leave,
    Help,
    Say(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "/back" | "/quit" | "/exit" => Input::Leave,
            "/help" => Input::Help,
            _ => Input::Say(line),
        }
    }
}

async fn next_reply(in_flight: &mut Option<InFlight>) -> (ReplyTicket, Result<String, ReplyFailure>) {
    match in_flight {
        Some(reply) => reply.join().await,
        None => std::future::pending().await,
    }
}

/// Drive the session from `input` until the user leaves or input ends.
///
/// Leaving with a reply outstanding discards it. End of input waits for the
/// outstanding reply first so piped conversations get their last answer.
pub async fn converse<R>(
    session: &mut ConversationSession,
    generator: Arc<dyn ReplyGenerator>,
    input: R,
    theme: Theme,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut in_flight: Option<InFlight> = None;

    print_header(session, theme);
    for message in session.transcript() {
        print_message(message, &session.agent().name, theme);
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    if let Some(mut reply) = in_flight.take() {
                        let (ticket, result) = reply.join().await;
                        deliver(session, ticket, result, theme);
                    }
                    break;
                };

                match Input::parse(&line) {
                    Input::Leave => break,
                    Input::Help => print_help(),
                    Input::Say(text) => match session.submit(text) {
                        Ok(request) => {
                            println!("{}", format!("{} is typing...", session.agent().name).dimmed());
                            in_flight = Some(InFlight::spawn(generator.clone(), request));
                        }
                        Err(SubmitRejected::EmptyInput) => {}
                        Err(e @ SubmitRejected::ReplyPending) => {
                            println!("{} {}", "…".yellow(), e.to_string().dimmed());
                        }
                    },
                }
            }
            (ticket, result) = next_reply(&mut in_flight) => {
                in_flight = None;
                deliver(session, ticket, result, theme);
            }
        }
    }

    if let Some(reply) = in_flight.take() {
        reply.abort();
    }
    Ok(())
}

fn deliver(session: &mut ConversationSession, ticket: ReplyTicket, result: Result<String, ReplyFailure>, theme: Theme) {
    let resolution = session.resolve(ticket, result);
    show(session, resolution, theme);
    log::debug!("Session is now {:?}", session.state());
}

fn show(session: &ConversationSession, resolution: Resolution, theme: Theme) {
    match resolution {
        Resolution::Replied(message) => print_message(&message, &session.agent().name, theme),
        Resolution::Failed(failure) => {
            eprintln!("{} Failed to get a response. Please try again.", "✗".red());
            eprintln!("  {}", failure.to_string().dimmed());
        }
        Resolution::Stale => {}
    }
}

fn print_header(session: &ConversationSession, theme: Theme) {
    let agent = session.agent();
    println!("{}", agent.name.color(theme.accent()).bold());
    println!("{}", agent.description.dimmed());
    println!("{}", "Type a message and press Enter. /back to return, /help for commands.".dimmed());
    println!();
}

fn print_help() {
    println!("  {}  leave the conversation", "/back".cyan());
    println!("  {}  leave the conversation", "/quit".cyan());
    println!("  {}  show this help", "/help".cyan());
}

fn print_message(message: &Message, agent_name: &str, theme: Theme) {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    let author = match message.role {
        Role::User => "You".green().bold(),
        Role::Assistant => agent_name.color(theme.accent()).bold(),
    };
    println!("{} {}", format!("[{}]", time).dimmed(), author);
    for line in message.content.lines() {
        println!("  {}", line);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AgentDescriptor;
    use crate::session::reply::PlaceholderReplies;
    use std::time::Duration;

    fn session() -> ConversationSession {
        ConversationSession::start(Some(AgentDescriptor::new("Fitness Coach", "Workouts", &["Fitness"]))).unwrap()
    }

    fn placeholder(ms: u64) -> Arc<dyn ReplyGenerator> {
        Arc::new(PlaceholderReplies::new(Duration::from_millis(ms)))
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(Input::parse(" /back "), Input::Leave);
        assert_eq!(Input::parse("/quit"), Input::Leave);
        assert_eq!(Input::parse("/help"), Input::Help);
        assert_eq!(Input::parse("/backflip"), Input::Say("/backflip"));
    }

    #[tokio::test]
    async fn test_piped_input_waits_for_last_reply() {
        let mut session = session();
        converse(&mut session, placeholder(0), &b"squats or lunges?\n"[..], Theme::Dark)
            .await
            .unwrap();

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].content, "squats or lunges?");
        assert_eq!(transcript[2].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_blank_lines_are_ignored() {
        let mut session = session();
        converse(&mut session, placeholder(0), &b"\n   \n"[..], Theme::Light)
            .await
            .unwrap();
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_input_while_pending_is_rejected() {
        let mut session = session();
        converse(&mut session, placeholder(200), &b"first\nsecond\n"[..], Theme::Light)
            .await
            .unwrap();

        let contents: Vec<&str> = session.transcript().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1], "first");
        assert!(contents[2].contains("first"));
    }

    #[tokio::test]
    async fn test_ask_once_records_exchange() {
        let mut session = session();
        let generator = PlaceholderReplies::new(Duration::ZERO);
        ask_once(&mut session, &generator, "leg day plan?", Theme::Dark).await.unwrap();

        assert_eq!(session.transcript().len(), 3);
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_ask_once_rejects_blank_message() {
        let mut session = session();
        let generator = PlaceholderReplies::new(Duration::ZERO);
        assert!(ask_once(&mut session, &generator, "   ", Theme::Dark).await.is_err());
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_leaving_discards_pending_reply() {
        let mut session = session();
        converse(&mut session, placeholder(200), &b"hello\n/back\n"[..], Theme::Light)
            .await
            .unwrap();

        assert_eq!(session.transcript().len(), 2);
        assert!(session.is_pending());
    }
}
