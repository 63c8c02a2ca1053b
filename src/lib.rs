//! Terminal client for the Log Search Assistant.
//!
//! [`session::ConversationSession`] holds the conversation state machine; the
//! REPL in [`repl`] is one view over it.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod error_ext;
pub mod repl;
pub mod session;
pub mod syntax;
pub mod ui;
