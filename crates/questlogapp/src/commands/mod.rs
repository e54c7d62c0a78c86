//! # Command Layer
//!
//! Each submodule implements one user-facing operation as a plain function over a
//! [`DocumentStore`](crate::store::DocumentStore). Commands take ordinary Rust
//! values and return a [`CmdResult`]; they never print, prompt or exit. That is the
//! job of whatever UI sits on top (the `questlog` binary is one such UI).
//!
//! ## Structure of a result
//!
//! - `affected`: records that were created, changed or removed.
//! - `listed`: records to display, already filtered and sorted.
//! - `stats` / `export`: payloads of the two commands that produce something other
//!   than records.
//! - `messages`: leveled, human-readable notes ("Quest added: ..."). UIs decide how
//!   to style them.
//!
//! ## Consent
//!
//! Destructive operations ([`import::apply`], [`clear::run`]) require a consent
//! value in their signature. The consent types can only be built from explicit
//! confirmations, so a caller cannot reach the destructive path without having
//! asked. How many prompts to show, and how, stays a UI decision.
//!
//! ## Testing
//!
//! This layer carries most of the behavioral tests. They run against
//! [`MemBackend`](crate::store::mem_backend::MemBackend), so they are fast and touch
//! no disk.

use crate::model::AnyRecord;
use serde::Serialize;

pub mod clear;
pub mod delete;
pub mod export;
pub mod helpers;
pub mod import;
pub mod list;
pub mod save;
pub mod stats;
pub mod toggle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<AnyRecord>,
    pub listed: Vec<AnyRecord>,
    pub stats: Option<stats::Stats>,
    pub export: Option<export::ExportArtifact>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, records: Vec<AnyRecord>) -> Self {
        self.affected = records;
        self
    }

    pub fn with_listed(mut self, records: Vec<AnyRecord>) -> Self {
        self.listed = records;
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }
}
