//! # Service Boundary
//!
//! The [`NotesBackend`] trait is everything the client knows about the note
//! storage service. The controller is generic over it, the same way it would be
//! over any storage layer:
//!
//! - [`http::HttpBackend`]: production, speaks the REST contract below
//! - [`memory::InMemoryBackend`]: deterministic double for tests and demos
//!
//! ## REST Contract
//!
//! ```text
//! GET    /notes        -> [Note]
//! GET    /notes/{id}   -> Note
//! POST   /notes        {title, content, tags} -> Note (id assigned)
//! PUT    /notes/{id}   {title, content, tags} -> Note
//! DELETE /notes/{id}   -> (ignored)
//! GET    /health       -> {"ok": bool}
//! ```
//!
//! Any transport failure or non-2xx status is an error; the controller turns
//! it into a user-facing failure.

use crate::error::Result;
use crate::model::{Note, NoteId, NotePayload};
use async_trait::async_trait;

pub mod http;
pub mod memory;

#[async_trait]
pub trait NotesBackend {
    /// Fetch every note, in the service's order.
    async fn list_notes(&self) -> Result<Vec<Note>>;

    async fn get_note(&self, id: &NoteId) -> Result<Note>;

    /// Persist a new note. The service assigns the id.
    async fn create_note(&self, payload: &NotePayload) -> Result<Note>;

    async fn update_note(&self, id: &NoteId, payload: &NotePayload) -> Result<Note>;

    async fn delete_note(&self, id: &NoteId) -> Result<()>;

    /// Whether the service reports itself healthy.
    async fn health(&self) -> Result<bool>;
}
