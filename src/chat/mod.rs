//! Conversation management for the Gemini chat client.

mod draft;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use tracing::{info, warn};

use crate::{
    client::ContentGenerator,
    compose::{ChatMode, RequestComposer},
    error::ChatError,
    file::AttachedFile,
    mapper::{map_chat_response, map_image_response},
    message::Message,
};

pub use draft::{AttachTicket, Draft, Submission};

/// The message every conversation starts with.
pub const GREETING: &str = "Hello! I'm Gemini. You can ask me questions, attach images or files, or ask me to generate an image. How can I help you today?";

/// Whether a send is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    /// Ready to accept a send
    Idle,
    /// Waiting for the provider
    Sending,
}

/// Why a send did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Neither a prompt nor an attachment was given
    EmptyInput,
    /// Another send is still in flight
    Busy,
}

/// What happened to a send.
#[derive(Debug)]
pub enum SendOutcome {
    /// Nothing was appended to the log
    Ignored(IgnoreReason),
    /// The model's reply was appended
    Replied,
    /// An error message was appended and surfaced
    Failed(ChatError),
}

#[derive(Debug)]
struct Session {
    log: Vec<Message>,
    error: Option<String>,
}

/// Resets the sending flag on every exit path of a send.
struct SendingGuard<'a>(&'a AtomicBool);

impl<'a> SendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the conversation log and sequences sends, one at a time.
///
/// The log only ever grows. Every send appends the user's message right away
/// and then exactly one model message, either the reply or an `Error: ...` text.
#[derive(Debug)]
pub struct ChatController<G> {
    generator: G,
    composer: RequestComposer,
    session: Mutex<Session>,
    sending: AtomicBool,
}

impl<G: ContentGenerator> ChatController<G> {
    /// Creates a controller whose log holds only the greeting.
    pub fn new(generator: G, composer: RequestComposer) -> Self {
        Self {
            generator,
            composer,
            session: Mutex::new(Session {
                log: vec![Message::model_text(GREETING)],
                error: None,
            }),
            sending: AtomicBool::new(false),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A snapshot of the conversation log.
    pub fn messages(&self) -> Vec<Message> {
        self.session().log.clone()
    }

    /// Number of messages in the log.
    pub fn message_count(&self) -> usize {
        self.session().log.len()
    }

    /// Messages appended after the first `from` entries.
    pub fn messages_since(&self, from: usize) -> Vec<Message> {
        self.session().log.iter().skip(from).cloned().collect()
    }

    /// The error surfaced by the last failed send, cleared when the next send starts.
    pub fn error(&self) -> Option<String> {
        self.session().error.clone()
    }

    /// Whether a send is in flight.
    pub fn state(&self) -> SendState {
        if self.sending.load(Ordering::Acquire) {
            SendState::Sending
        } else {
            SendState::Idle
        }
    }

    /// Sends a prompt and/or attachment and appends the exchange to the log.
    ///
    /// A send issued while another is in flight is ignored, as is one with
    /// a blank prompt and no attachment. Failures never escape: they end up
    /// in the log and in [`ChatController::error`], and are also returned
    /// in [`SendOutcome::Failed`].
    pub async fn send(
        &self,
        prompt: &str,
        attachment: Option<AttachedFile>,
        mode: ChatMode,
    ) -> SendOutcome {
        if prompt.trim().is_empty() && attachment.is_none() {
            return SendOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        let Some(user_message) = Message::from_user_input(prompt, attachment.as_ref()) else {
            return SendOutcome::Ignored(IgnoreReason::EmptyInput);
        };
        let Some(_guard) = SendingGuard::acquire(&self.sending) else {
            warn!("send ignored: another request is in flight");
            return SendOutcome::Ignored(IgnoreReason::Busy);
        };

        {
            let mut session = self.session();
            session.error = None;
            session.log.push(user_message);
        }
        info!(?mode, attachment = attachment.is_some(), "sending message");

        match self.exchange(prompt, attachment.as_ref(), mode).await {
            Ok(reply) => {
                self.session().log.push(reply);
                SendOutcome::Replied
            }
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, kind = ?err.provider_failure(), "send failed");
                let mut session = self.session();
                session
                    .log
                    .push(Message::model_text(format!("Error: {}", message)));
                session.error = Some(message);
                SendOutcome::Failed(err)
            }
        }
    }

    /// Sends whatever the draft holds, then clears it.
    ///
    /// The draft is left untouched when the send would be ignored.
    pub async fn submit(&self, draft: &mut Draft) -> SendOutcome {
        if !draft.can_send() {
            return SendOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        if self.state() == SendState::Sending {
            return SendOutcome::Ignored(IgnoreReason::Busy);
        }
        let Submission {
            prompt,
            attachment,
            mode,
        } = draft.take();
        self.send(&prompt, attachment, mode).await
    }

    async fn exchange(
        &self,
        prompt: &str,
        attachment: Option<&AttachedFile>,
        mode: ChatMode,
    ) -> Result<Message, ChatError> {
        let request = self.composer.compose(prompt, attachment, mode)?;
        let raw = self.generator.generate_content(&request).await;
        match mode {
            ChatMode::Chat => map_chat_response(raw),
            ChatMode::ImageGeneration => map_image_response(raw, prompt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::GoogleGenerativeAIError, models::Request, models::Response};
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl ContentGenerator for Unreachable {
        async fn generate_content(
            &self,
            _request: &Request,
        ) -> Result<Response, GoogleGenerativeAIError> {
            Err(GoogleGenerativeAIError::new("connection refused"))
        }
    }

    #[test]
    fn starts_with_a_single_greeting() {
        let controller = ChatController::new(Unreachable, RequestComposer::default());
        assert_eq!(controller.messages(), vec![Message::model_text(GREETING)]);
        assert_eq!(controller.state(), SendState::Idle);
        assert_eq!(controller.error(), None);
    }

    #[test]
    fn guard_releases_flag_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _guard = SendingGuard::acquire(&flag).unwrap();
            assert!(SendingGuard::acquire(&flag).is_none());
        }
        assert!(SendingGuard::acquire(&flag).is_some());
    }

    #[tokio::test]
    async fn whitespace_prompt_is_ignored() {
        let controller = ChatController::new(Unreachable, RequestComposer::default());
        let outcome = controller.send("   ", None, ChatMode::Chat).await;
        assert!(matches!(
            outcome,
            SendOutcome::Ignored(IgnoreReason::EmptyInput)
        ));
        assert_eq!(controller.message_count(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_logged_and_surfaced() {
        let controller = ChatController::new(Unreachable, RequestComposer::default());
        let outcome = controller.send("Hi", None, ChatMode::Chat).await;

        assert!(matches!(outcome, SendOutcome::Failed(_)));
        assert_eq!(
            controller.messages_since(1),
            vec![
                Message::from_user_input("Hi", None).unwrap(),
                Message::model_text("Error: Failed to get response from Gemini."),
            ]
        );
        assert_eq!(
            controller.error().as_deref(),
            Some("Failed to get response from Gemini.")
        );
        assert_eq!(controller.state(), SendState::Idle);
    }
}
