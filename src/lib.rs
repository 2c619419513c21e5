#![deny(missing_docs)]

//! A chat client core for the Google Gemini AI API.
//!
//! This library turns user input (a prompt, an optional attached file and a
//! chat or image generation mode) into Gemini requests and maps the replies
//! back into a typed, append-only conversation log.

pub mod chat;
pub mod client;
pub mod compose;
pub mod config;
pub mod error;
pub mod file;
pub mod mapper;
pub mod message;
pub mod models;

pub use chat::{ChatController, Draft, SendOutcome, SendState};
pub use client::{ContentGenerator, GeminiClient};
pub use compose::{ChatMode, RequestComposer};
pub use config::Config;
pub use error::{ChatError, GoogleGenerativeAIError, ProviderFailure};
pub use file::AttachedFile;
pub use message::{Message, MessagePart, Role};
