//! Glue between a session and its reply generator

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::reply::{ReplyFailure, ReplyGenerator};
use super::{ConversationSession, ReplyRequest, ReplyTicket, Resolution, SubmitRejected};

/// An outstanding reply running in the background
pub struct InFlight {
    ticket: ReplyTicket,
    handle: JoinHandle<Result<String, ReplyFailure>>,
}

impl InFlight {
    /// Run the generator for `request` on its own task
    pub fn spawn(generator: Arc<dyn ReplyGenerator>, request: ReplyRequest) -> Self {
        let ticket = request.ticket;
        log::debug!("Generating reply from '{}' to {:?}", request.agent.name, request.prompt());
        let handle =
            tokio::spawn(async move { generator.generate_reply(&request.transcript, &request.agent).await });
        Self { ticket, handle }
    }

    /// Wait for the reply; a panicked or aborted task counts as a failure
    pub async fn join(&mut self) -> (ReplyTicket, Result<String, ReplyFailure>) {
        let result = match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ReplyFailure::Cancelled),
            Err(e) => Err(ReplyFailure::Unavailable(e.to_string())),
        };
        (self.ticket, result)
    }

    /// Drop the reply; nothing will ever be delivered for this ticket
    pub fn abort(self) {
        log::debug!("Aborting in-flight reply");
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Submit `text` and wait for its reply in one step
pub async fn exchange(
    session: &mut ConversationSession,
    generator: &dyn ReplyGenerator,
    text: &str,
) -> Result<Resolution, SubmitRejected> {
    let request = session.submit(text)?;
    let result = generator.generate_reply(&request.transcript, &request.agent).await;
    Ok(session.resolve(request.ticket, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AgentDescriptor;
    use crate::session::message::Message;
    use crate::session::reply::PlaceholderReplies;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fails every call and counts them
    #[derive(Default)]
    struct Broken {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReplyGenerator for Broken {
        async fn generate_reply(&self, _: &[Message], _: &AgentDescriptor) -> Result<String, ReplyFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ReplyFailure::Unavailable("down".to_string()))
        }
    }

    fn session() -> ConversationSession {
        ConversationSession::start(Some(AgentDescriptor::new("Study Tutor", "Tutoring", &["Education"]))).unwrap()
    }

    #[tokio::test]
    async fn test_exchange_success() {
        let mut session = session();
        let replies = PlaceholderReplies::new(Duration::ZERO);

        let resolution = exchange(&mut session, &replies, "explain fractions").await.unwrap();

        assert!(matches!(resolution, Resolution::Replied(_)));
        assert_eq!(session.transcript().len(), 3);
        assert!(session.transcript()[2].content.contains("explain fractions"));
    }

    #[tokio::test]
    async fn test_exchange_failure_calls_generator_once() {
        let mut session = session();
        let broken = Broken::default();

        let resolution = exchange(&mut session, &broken, "hello").await.unwrap();

        assert!(matches!(resolution, Resolution::Failed(_)));
        assert_eq!(broken.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.transcript().len(), 2);
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_exchange_blank_never_calls_generator() {
        let mut session = session();
        let broken = Broken::default();

        assert_eq!(exchange(&mut session, &broken, "  ").await.unwrap_err(), SubmitRejected::EmptyInput);
        assert_eq!(broken.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_in_flight_join_resolves_session() {
        let mut session = session();
        let generator: Arc<dyn ReplyGenerator> = Arc::new(PlaceholderReplies::new(Duration::from_millis(5)));

        let request = session.submit("quiz me").unwrap();
        let mut in_flight = InFlight::spawn(generator, request);
        assert_eq!(session.submit("again").unwrap_err(), SubmitRejected::ReplyPending);

        let (ticket, result) = in_flight.join().await;
        assert!(matches!(session.resolve(ticket, result), Resolution::Replied(_)));
        assert_eq!(session.transcript().len(), 3);
    }

    #[tokio::test]
    async fn test_join_after_abort_is_cancelled() {
        let generator: Arc<dyn ReplyGenerator> = Arc::new(PlaceholderReplies::new(Duration::from_secs(60)));
        let mut session = session();
        let request = session.submit("slow one").unwrap();

        let mut in_flight = InFlight::spawn(generator, request);
        in_flight.handle.abort();
        let (_, result) = in_flight.join().await;
        assert_eq!(result, Err(ReplyFailure::Cancelled));
    }
}
