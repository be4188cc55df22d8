use super::NotesBackend;
use crate::error::{NotezError, Result};
use crate::model::{Note, NoteId, NotePayload, Tags};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// One request as the service would have received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Get(NoteId),
    Create(NotePayload),
    Update(NoteId, NotePayload),
    Delete(NoteId),
    Health,
}

impl Call {
    pub fn kind(&self) -> CallKind {
        match self {
            Call::List => CallKind::List,
            Call::Get(_) => CallKind::Get,
            Call::Create(_) => CallKind::Create,
            Call::Update(..) => CallKind::Update,
            Call::Delete(_) => CallKind::Delete,
            Call::Health => CallKind::Health,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    List,
    Get,
    Create,
    Update,
    Delete,
    Health,
}

#[derive(Default)]
struct State {
    notes: Vec<Note>,
    next_id: i64,
    calls: Vec<Call>,
    fail_next: HashSet<CallKind>,
    offline: bool,
}

/// In-memory note service for testing and development.
/// Does NOT persist data. Ids are sequential integers, newest notes first.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Inserts a note directly, bypassing the call log.
    pub fn seed(&self, note: Note) {
        let mut state = self.lock();
        if let Ok(n) = note.id.as_str().parse::<i64>() {
            state.next_id = state.next_id.max(n);
        }
        state.notes.push(note);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.lock().calls.iter().filter(|c| c.kind() == kind).count()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.lock().notes.clone()
    }

    /// Makes the next call of `kind` fail with a 503.
    pub fn fail_next(&self, kind: CallKind) {
        self.lock().fail_next.insert(kind);
    }

    /// While offline every call fails as if the service were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn record(&self, call: Call) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        let kind = call.kind();
        state.calls.push(call);
        if state.offline {
            return Err(NotezError::Api("connection refused".to_string()));
        }
        if state.fail_next.remove(&kind) {
            return Err(NotezError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(state)
    }
}

fn not_found() -> NotezError {
    NotezError::Status {
        status: 404,
        body: "{\"detail\":\"Note not found\"}".to_string(),
    }
}

#[async_trait]
impl NotesBackend for InMemoryBackend {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let state = self.record(Call::List)?;
        Ok(state.notes.clone())
    }

    async fn get_note(&self, id: &NoteId) -> Result<Note> {
        let state = self.record(Call::Get(id.clone()))?;
        state
            .notes
            .iter()
            .find(|n| &n.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_note(&self, payload: &NotePayload) -> Result<Note> {
        let mut state = self.record(Call::Create(payload.clone()))?;
        state.next_id += 1;
        let now = Utc::now();
        let note = Note {
            id: NoteId::from(state.next_id),
            title: payload.title.clone(),
            content: payload.content.clone(),
            tags: Tags::from_text(&payload.tags),
            created_at: Some(now),
            updated_at: Some(now),
        };
        state.notes.insert(0, note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: &NoteId, payload: &NotePayload) -> Result<Note> {
        let mut state = self.record(Call::Update(id.clone(), payload.clone()))?;
        let pos = state
            .notes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(not_found)?;
        let mut note = state.notes.remove(pos);
        note.title = payload.title.clone();
        note.content = payload.content.clone();
        note.tags = Tags::from_text(&payload.tags);
        note.updated_at = Some(Utc::now());
        state.notes.insert(0, note.clone());
        Ok(note)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let mut state = self.record(Call::Delete(id.clone()))?;
        let pos = state
            .notes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(not_found)?;
        state.notes.remove(pos);
        Ok(())
    }

    async fn health(&self) -> Result<bool> {
        drop(self.record(Call::Health)?);
        Ok(true)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub fn note(id: i64, title: &str, content: &str, tags: &[&str]) -> Note {
        Note {
            id: NoteId::from(id),
            title: title.to_string(),
            content: content.to_string(),
            tags: Tags::new(tags.iter().map(|t| t.to_string()).collect()),
            created_at: None,
            updated_at: None,
        }
    }

    pub struct BackendFixture {
        pub backend: InMemoryBackend,
    }

    impl Default for BackendFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl BackendFixture {
        pub fn new() -> Self {
            Self {
                backend: InMemoryBackend::new(),
            }
        }

        pub fn with_note(self, id: i64, title: &str, tags: &[&str]) -> Self {
            self.backend
                .seed(note(id, title, &format!("Content for {}", title), tags));
            self
        }

        pub fn with_notes(self, count: usize) -> Self {
            for i in 0..count {
                let id = i as i64 + 1;
                self.backend.seed(note(
                    id,
                    &format!("Test Note {}", id),
                    &format!("Content for note {}", id),
                    &[],
                ));
            }
            self
        }

        pub fn build(self) -> InMemoryBackend {
            self.backend
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::BackendFixture;
    use super::*;

    fn payload(title: &str, tags: &str) -> NotePayload {
        NotePayload {
            title: title.to_string(),
            content: String::new(),
            tags: tags.to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_after_seeded_notes() {
        let backend = BackendFixture::new().with_notes(2).build();
        let note = backend.create_note(&payload("New", "a, b")).await.unwrap();
        assert_eq!(note.id, NoteId::from(3));
        assert_eq!(note.tags.as_slice(), &["a", "b"]);
        assert_eq!(backend.notes()[0].id, note.id);
    }

    #[tokio::test]
    async fn update_of_missing_note_is_not_found() {
        let backend = InMemoryBackend::new();
        let err = backend
            .update_note(&NoteId::from(9), &payload("x", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, NotezError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn fail_next_applies_once() {
        let backend = InMemoryBackend::new();
        backend.fail_next(CallKind::List);
        assert!(backend.list_notes().await.is_err());
        assert!(backend.list_notes().await.is_ok());
        assert_eq!(backend.count(CallKind::List), 2);
    }

    #[tokio::test]
    async fn offline_fails_everything_but_still_records() {
        let backend = BackendFixture::new().with_note(1, "A", &[]).build();
        backend.set_offline(true);
        assert!(backend.get_note(&NoteId::from(1)).await.is_err());
        assert_eq!(backend.calls(), vec![Call::Get(NoteId::from(1))]);
    }

    #[tokio::test]
    async fn health_releases_the_lock() {
        let backend = InMemoryBackend::new();
        assert!(backend.health().await.unwrap());
        assert_eq!(backend.calls(), vec![Call::Health]);

        backend.set_offline(true);
        assert!(backend.health().await.is_err());
        assert_eq!(backend.count(CallKind::Health), 2);
    }
}
