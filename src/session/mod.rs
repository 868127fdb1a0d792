//! Conversation session: the chat transcript and its single in-flight reply
//!
//! A session starts in `Greeting` with one assistant message, accepts user
//! input, and moves to `Pending` while exactly one reply is outstanding. The
//! reply is computed elsewhere (see [`reply::ReplyGenerator`]); the caller
//! hands the result back through [`ConversationSession::resolve`] together
//! with the ticket it was issued, so late or duplicate deliveries are ignored.
//!
//! Transitions:
//! - start(agent)                   -> Greeting, or MissingAgent with no agent
//! - submit(text) in Greeting/Await -> Pending, user message appended
//! - resolve(ok)                    -> AwaitingInput, assistant message appended
//! - resolve(err)                   -> AwaitingInput, failure recorded, nothing appended

pub mod driver;
pub mod message;
pub mod reply;

use thiserror::Error;

use crate::catalog::AgentDescriptor;
pub use message::{Message, Role};
pub use reply::ReplyFailure;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("No agent selected. Please select an agent from the agents list.")]
    MissingAgent,
}

/// Why a submission was refused; refusals never touch the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("message is empty")]
    EmptyInput,
    #[error("still waiting for the previous reply")]
    ReplyPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Only the greeting is in the transcript
    Greeting,
    AwaitingInput,
    Pending,
}

/// Identifies one submission's reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket(u64);

/// Everything a reply generator needs for one submission
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub ticket: ReplyTicket,
    pub agent: AgentDescriptor,
    /// Transcript as of the submission, ending with the user's message
    pub transcript: Vec<Message>,
}

impl ReplyRequest {
    pub fn prompt(&self) -> &str {
        self.transcript.last().map(|m| m.content.as_str()).unwrap_or_default()
    }
}

/// What happened when a reply came back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Replied(Message),
    Failed(ReplyFailure),
    /// Ticket did not match the outstanding request; dropped
    Stale,
}

pub fn greeting(agent: &AgentDescriptor) -> String {
    format!("Hi there! I'm your {} assistant. How can I help you today?", agent.name)
}

#[derive(Debug)]
pub struct ConversationSession {
    agent: AgentDescriptor,
    transcript: Vec<Message>,
    pending: Option<ReplyTicket>,
    next_ticket: u64,
    last_failure: Option<ReplyFailure>,
}

impl ConversationSession {
    /// Open a session for the handed-off agent, seeding the greeting
    pub fn start(agent: Option<AgentDescriptor>) -> Result<Self, SessionError> {
        let agent = agent.ok_or(SessionError::MissingAgent)?;
        log::info!("Starting conversation with '{}'", agent.name);

        let transcript = vec![Message::assistant(greeting(&agent))];
        Ok(Self {
            agent,
            transcript,
            pending: None,
            next_ticket: 0,
            last_failure: None,
        })
    }

    pub fn agent(&self) -> &AgentDescriptor {
        &self.agent
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_failure(&self) -> Option<&ReplyFailure> {
        self.last_failure.as_ref()
    }

    pub fn state(&self) -> SessionState {
        if self.pending.is_some() {
            SessionState::Pending
        } else if self.transcript.len() == 1 {
            SessionState::Greeting
        } else {
            SessionState::AwaitingInput
        }
    }

    /// Append the user's message and issue a reply request for it
    pub fn submit(&mut self, text: &str) -> Result<ReplyRequest, SubmitRejected> {
        if self.pending.is_some() {
            log::debug!("Rejected submission while a reply is pending");
            return Err(SubmitRejected::ReplyPending);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitRejected::EmptyInput);
        }

        self.transcript.push(Message::user(text));

        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.last_failure = None;
        log::debug!("Submitted message {} to '{}'", ticket.0, self.agent.name);

        Ok(ReplyRequest {
            ticket,
            agent: self.agent.clone(),
            transcript: self.transcript.clone(),
        })
    }

    /// Deliver the outcome of the request identified by `ticket`
    pub fn resolve(&mut self, ticket: ReplyTicket, result: Result<String, ReplyFailure>) -> Resolution {
        if self.pending != Some(ticket) {
            log::debug!("Ignoring stale reply for ticket {}", ticket.0);
            return Resolution::Stale;
        }
        self.pending = None;

        match result {
            Ok(content) => {
                let message = Message::assistant(content);
                self.transcript.push(message.clone());
                Resolution::Replied(message)
            }
            Err(failure) => {
                log::warn!("Reply from '{}' failed: {}", self.agent.name, failure);
                self.last_failure = Some(failure.clone());
                Resolution::Failed(failure)
            }
        }
    }
}
