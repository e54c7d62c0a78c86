//! # Questlog Architecture
//!
//! Questlog is a **UI-agnostic game progress tracker library**. It records quests,
//! characters, inventory items, locations and notes for one player, keeps them in a
//! single JSON document on local storage, and exports/imports that document as a
//! backup file. The `questlog` binary is one client of this library; it is not
//! where the behavior lives.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (questlog crate)                                       │
//! │  - Parses arguments, asks for confirmations, prints         │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, import in-flight flag         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Operations returning CmdResult, consent-gated writes     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DocumentStore, Persistence, SlotBackend                  │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Under the storage layer sit the [`model`], the [`ids`] generator and
//! [`reconcile`], which turns untrusted JSON into a valid document.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes and returns plain Rust values. It never writes
//! to stdout/stderr, never prompts and never exits. Destructive operations take a
//! consent value instead of asking for one.
//!
//! ## All or nothing
//!
//! Every mutation is written to the slot before it becomes visible in memory. When
//! any step fails, both the in-memory document and the slot keep their previous
//! state.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade every UI talks to
//! - [`commands`]: one module per operation
//! - [`store`]: the live document and its durable slot
//! - [`reconcile`]: field-by-field loading of saved and imported data
//! - [`model`]: records, collections, settings
//! - [`ids`]: record identifiers
//! - [`config`], [`init`]: configuration and bootstrapping
//! - [`error`]: [`error::TrackerError`]

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod ids;
pub mod init;
pub mod model;
pub mod reconcile;
pub mod store;
