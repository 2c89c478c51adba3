//! # Todoz Architecture
//!
//! Todoz is a **UI-agnostic todo library**. The terminal binary is its client
//! and contains no business logic. On wasm32 the library also compiles a
//! `localStorage` backend for embedders; this crate ships no browser front end.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, prompts, shell session │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Resolves row labels / ids, owns display handles          │
//! │  - Returns structured Result<CmdResult>                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Todo Store (todos.rs)                                      │
//! │  - Owns the collection, filter, edit session, load state    │
//! │  - Validation, id allocation, save-after-mutation           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - TodoPersistence: one JSON blob under the key "todos"     │
//! │  - KeyValueBackend: files, memory, localStorage             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes plain Rust values, returns plain Rust
//! types, and never writes to stdout/stderr, prompts, sleeps, or exits.
//! Diagnostics go through the `log` facade; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for front ends
//! - [`todos`]: The todo store and its operations
//! - [`commands`]: Structured results and the confirmation trait
//! - [`handles`]: Per-row display handles
//! - [`store`]: Persistence adapter and key-value backends
//! - [`model`]: Core data types (`Todo`, `TodoId`, `Filter`)
//! - [`config`]: Settings and data directory resolution
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod handles;
pub mod model;
pub mod store;
pub mod todos;
