//! # Notez Architecture
//!
//! Notez is a **UI-agnostic note-editing client** for a REST note-storage
//! service. The terminal binary is one front-end; the controller underneath it
//! would serve a TUI or a webview just the same.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders state, runs the shell session  │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Controller (client.rs)                                     │
//! │  - Note list, draft, selection, in-flight save, error area  │
//! │  - Turns every service failure into a user-facing Failure   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Service Boundary (backend/)                                │
//! │  - Abstract NotesBackend trait                              │
//! │  - HttpBackend (production), InMemoryBackend (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `client.rs` inward, code never writes to stdout/stderr, never exits the
//! process, and never assumes a terminal. Diagnostics go through `log`.
//!
//! ## Testing Strategy
//!
//! 1. **Controller** (`client.rs`): the bulk of the tests, run against
//!    `InMemoryBackend`, which records every call it receives.
//! 2. **HTTP** (`tests/http_backend.rs`): `HttpBackend` against a local stub service.
//! 3. **CLI** (`tests/cli.rs`): the binary end to end.
//!
//! ## Module Overview
//!
//! - [`client`]: The controller, entry point for all operations
//! - [`backend`]: Service trait and implementations
//! - [`model`]: Core data types (`Note`, `Draft`, `DraftState`)
//! - [`tags`]: Tag text conversion
//! - [`config`]: Configuration management
//! - [`editor`]: External editor integration
//! - [`error`]: Error types and the user-facing failure taxonomy
//! - `cli`: Argument parsing, rendering and the interactive shell (binary only)

pub mod backend;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod tags;
