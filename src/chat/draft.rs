//! The input being composed before a send.

use std::path::Path;

use tracing::{debug, warn};

use crate::{compose::ChatMode, error::ChatError, file::AttachedFile};

/// Identifies one attach action; only the latest one may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachTicket(u64);

/// What a draft hands over to a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Prompt text, untrimmed
    pub prompt: String,
    /// The attachment, if any
    pub attachment: Option<AttachedFile>,
    /// Mode at the time of submission
    pub mode: ChatMode,
}

/// The input being composed: prompt, mode and at most one attachment.
#[derive(Debug, Default)]
pub struct Draft {
    prompt: String,
    mode: ChatMode,
    attachment: Option<AttachedFile>,
    latest_ticket: u64,
}

impl Draft {
    /// Creates an empty chat-mode draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current prompt.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replaces the prompt.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// The current mode.
    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    /// Switches mode. Image generation takes no attachment, so entering it
    /// drops the current one and any read still in flight.
    pub fn set_mode(&mut self, mode: ChatMode) {
        if mode == ChatMode::ImageGeneration {
            self.remove_attachment();
        }
        self.mode = mode;
    }

    /// Flips between chat and image generation, returning the new mode.
    pub fn toggle_mode(&mut self) -> ChatMode {
        let next = match self.mode {
            ChatMode::Chat => ChatMode::ImageGeneration,
            ChatMode::ImageGeneration => ChatMode::Chat,
        };
        self.set_mode(next);
        next
    }

    /// The current attachment.
    pub fn attachment(&self) -> Option<&AttachedFile> {
        self.attachment.as_ref()
    }

    /// Drops the attachment and invalidates any pending attach.
    pub fn remove_attachment(&mut self) {
        self.attachment = None;
        self.latest_ticket += 1;
    }

    /// Starts an attach action, superseding any earlier one still reading.
    pub fn begin_attach(&mut self) -> AttachTicket {
        self.latest_ticket += 1;
        AttachTicket(self.latest_ticket)
    }

    /// Completes an attach action with the outcome of its read.
    ///
    /// Returns `Ok(false)` when the ticket has been superseded; the result is
    /// then discarded and the draft left as is.
    ///
    /// # Errors
    ///
    /// Propagates a failed read, or returns [`ChatError::Validation`] when the
    /// draft is in image generation mode. The draft is unchanged in both cases.
    pub fn finish_attach(
        &mut self,
        ticket: AttachTicket,
        result: Result<AttachedFile, ChatError>,
    ) -> Result<bool, ChatError> {
        if ticket.0 != self.latest_ticket {
            warn!("discarding superseded attachment");
            return Ok(false);
        }
        let file = result?;
        if self.mode == ChatMode::ImageGeneration {
            return Err(ChatError::Validation(
                "Attachments cannot be used for image generation.".into(),
            ));
        }
        debug!(name = %file.name, "attachment ready");
        self.attachment = Some(file);
        Ok(true)
    }

    /// Reads a file from disk and attaches it.
    ///
    /// # Errors
    ///
    /// See [`Draft::finish_attach`].
    pub async fn attach<P: AsRef<Path>>(&mut self, path: P) -> Result<bool, ChatError> {
        let ticket = self.begin_attach();
        let result = crate::file::ingest(path).await;
        self.finish_attach(ticket, result)
    }

    /// Whether the draft holds something worth sending.
    pub fn can_send(&self) -> bool {
        !self.prompt.trim().is_empty() || self.attachment.is_some()
    }

    /// Hands the contents over to a send and resets prompt and attachment.
    /// The mode is kept.
    pub fn take(&mut self) -> Submission {
        let attachment = self.attachment.take();
        self.latest_ticket += 1;
        Submission {
            prompt: std::mem::take(&mut self.prompt),
            attachment,
            mode: self.mode,
        }
    }
}
