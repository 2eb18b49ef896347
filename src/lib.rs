//! taskdeck - Task-tracking core
//!
//! This library is the core of a personal task tracker: it owns the
//! canonical task collection and the active filter/view state, applies
//! mutations through a persistence backend, and derives the visible list
//! and navigation counts that a UI layer renders from.
//!
//! # Core Concepts
//!
//! - **Task Store**: one instance per session; serializes mutations and
//!   refreshes the collection from the backend after each one
//! - **Derivation**: a pure function from collection + filter state to the
//!   visible list and counts
//! - **Persistence Backend**: durable storage of task records scoped by an
//!   owner identity, behind an async trait
//! - **Board**: status columns and the guarded drag-and-drop transition
//!
//! # Module Organization
//!
//! - `task`: domain types (task, draft, patch, priority, status)
//! - `filter`: filter/view state and the derivation function
//! - `store`: the session task store
//! - `backend`: persistence backend trait and in-memory implementation
//! - `storage`: file-backed persistence
//! - `board`: board columns and drop handling
//! - `clock`: the current-date seam
//! - `notify`: user-visible notification sink
//! - `config`: configuration loading from `taskdeck.toml`
//! - `error`: error types and result alias
//! - `lock`: file locking for the file backend

pub mod backend;
pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod lock;
pub mod notify;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{Error, Result};
