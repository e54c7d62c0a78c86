//! # Storage Layer
//!
//! The tracker persists exactly one thing: the whole [`crate::model::Document`],
//! serialized as pretty-printed JSON into a single named **slot**. There is no
//! schema version in the slot; older data keeps loading because every field is
//! default-filled on the way in (see [`crate::reconcile`]).
//!
//! ## Pieces
//!
//! - [`backend::SlotBackend`]: raw read/write/erase of the slot. The "where".
//! - [`fs_backend::FsBackend`]: production backend, `<data_dir>/<slot_key>.json`,
//!   written atomically (tmp file + rename).
//! - [`mem_backend::MemBackend`]: in-memory backend for tests, with write-failure
//!   simulation.
//! - [`persistence::Persistence`]: parses, default-fills and serializes documents.
//!   The "what".
//! - [`document_store::DocumentStore`]: owns the live document and exposes the
//!   per-collection operations. Saves after every change.
//!
//! ## Consistency
//!
//! There is one writer (this process) and no background work. Every operation
//! runs to completion and either commits both memory and slot or neither. Several
//! processes writing the same slot is not coordinated: the last write wins.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── questlog-tracker-data.json   # The slot (name configurable)
//! └── .questlog-tracker-data-<uuid>.tmp   # Transient, only during a write
//! ```

pub mod backend;
pub mod document_store;
pub mod fs_backend;
pub mod mem_backend;
pub mod persistence;

pub use backend::SlotBackend;
pub use document_store::DocumentStore;
