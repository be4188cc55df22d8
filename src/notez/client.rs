//! # Note Editor Controller
//!
//! [`NoteEditorClient`] holds everything a note-editing UI shows:
//! - the note list
//! - the draft bound to the editor
//! - the selection
//! - the in-flight save flag
//! - a single message area for the most recent error
//!
//! ## State Machine
//!
//! ```text
//!            save                 ok
//! Browsing ───────► Saving ──────────────► Editing(id)
//! Editing  ───────►   │
//!                     └── failure ──► prior state, error set
//!
//! new / delete ──► Browsing
//! ```
//!
//! The create-or-update decision is carried by [`DraftState`]: `New` can only
//! produce a create, `Existing(id)` can only produce an update with that id.
//!
//! ## Driving It
//!
//! Each async operation is a network call followed by a synchronous `apply_*`
//! step. Hosts that issue calls themselves can feed responses straight into the
//! `apply_*` methods in arrival order; the last response applied wins.
//!
//! Failures never escape as panics. Every operation records its [`Failure`] in
//! the message area and also returns it, so the caller can decide how loud to be.

use crate::backend::NotesBackend;
use crate::error::{Failure, FailureKind, NotezError, Result};
use crate::model::{Draft, DraftState, Note, NoteId, NotePayload};
use log::{debug, warn};

/// Coarse view of the controller for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    Editing(NoteId),
    Saving,
}

/// The single request a save action produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(NotePayload),
    Update(NoteId, NotePayload),
}

impl SaveRequest {
    pub async fn dispatch<B: NotesBackend + ?Sized>(&self, backend: &B) -> Result<Note> {
        match self {
            SaveRequest::Create(payload) => backend.create_note(payload).await,
            SaveRequest::Update(id, payload) => backend.update_note(id, payload).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(Note),
    /// The save trigger was disabled; nothing was sent.
    Disabled,
}

pub struct NoteEditorClient<B: NotesBackend> {
    backend: B,
    notes: Vec<Note>,
    draft: Draft,
    state: DraftState,
    /// Bumped whenever the draft is replaced by a load, a new note or a delete.
    draft_epoch: u64,
    /// Epoch the in-flight save started from.
    saving: Option<u64>,
    error: Option<Failure>,
    activated: bool,
}

impl<B: NotesBackend> NoteEditorClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            notes: Vec::new(),
            draft: Draft::default(),
            state: DraftState::New,
            draft_epoch: 0,
            saving: None,
            error: None,
            activated: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_state(&self) -> &DraftState {
        &self.state
    }

    pub fn selection(&self) -> Option<&NoteId> {
        self.state.selected_id()
    }

    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    pub fn mode(&self) -> Mode {
        if self.is_saving() {
            return Mode::Saving;
        }
        match &self.state {
            DraftState::New => Mode::Browsing,
            DraftState::Existing(id) => Mode::Editing(id.clone()),
        }
    }

    /// Save is disabled while a save is in flight or when the draft is blank.
    pub fn can_save(&self) -> bool {
        !self.is_saving() && !self.draft.is_blank()
    }

    /// Delete needs a selection and no save in flight.
    pub fn can_delete(&self) -> bool {
        !self.is_saving() && self.state.selected_id().is_some()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
    }

    pub fn set_tags_text(&mut self, tags: impl Into<String>) {
        self.draft.tags_text = tags.into();
    }

    /// Replaces all draft fields at once, keeping the selection.
    pub fn set_draft(&mut self, draft: Draft) {
        self.draft = draft;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn fail(&mut self, kind: FailureKind, err: &NotezError) -> Failure {
        let failure = Failure::from_error(kind, err);
        warn!("{} ({})", failure, failure.detail);
        self.error = Some(failure.clone());
        failure
    }

    /// Initial load: the first call refreshes the list, later calls do nothing.
    pub async fn activate(&mut self) -> std::result::Result<(), Failure> {
        if self.activated {
            return Ok(());
        }
        self.activated = true;
        self.refresh_list().await
    }

    pub async fn refresh_list(&mut self) -> std::result::Result<(), Failure> {
        self.clear_error();
        let result = self.backend.list_notes().await;
        self.apply_list(result)
    }

    /// Replaces the list on success; on failure the previous list stays.
    pub fn apply_list(&mut self, result: Result<Vec<Note>>) -> std::result::Result<(), Failure> {
        match result {
            Ok(notes) => {
                debug!("list refreshed: {} notes", notes.len());
                self.notes = notes;
                Ok(())
            }
            Err(e) => Err(self.fail(FailureKind::ListLoadFailed, &e)),
        }
    }

    pub async fn load_note(&mut self, id: &NoteId) -> std::result::Result<Note, Failure> {
        self.clear_error();
        let result = self.backend.get_note(id).await;
        self.apply_loaded(id, result)
    }

    /// Populates the draft from the fetched note and selects it. The draft is
    /// left alone if the fetch failed or returned a different note.
    pub fn apply_loaded(
        &mut self,
        requested: &NoteId,
        result: Result<Note>,
    ) -> std::result::Result<Note, Failure> {
        let note = match result {
            Ok(note) => note,
            Err(e) => return Err(self.fail(FailureKind::SingleLoadFailed, &e)),
        };
        if &note.id != requested {
            let err = NotezError::Api(format!(
                "requested note {} but the service returned note {}",
                requested, note.id
            ));
            return Err(self.fail(FailureKind::SingleLoadFailed, &err));
        }
        debug!("selected note {}", note.id);
        self.draft = Draft::from_note(&note);
        self.state = DraftState::Existing(note.id.clone());
        self.draft_epoch += 1;
        Ok(note)
    }

    /// Starts a save if the trigger is enabled, marking it in flight.
    ///
    /// Returns `None` while another save is in flight or when the draft is blank.
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if !self.can_save() {
            debug!("save ignored: trigger disabled");
            return None;
        }
        self.clear_error();
        self.saving = Some(self.draft_epoch);
        let payload = self.draft.to_payload();
        let request = match &self.state {
            DraftState::New => SaveRequest::Create(payload),
            DraftState::Existing(id) => SaveRequest::Update(id.clone(), payload),
        };
        debug!("save started: {:?}", request);
        Some(request)
    }

    /// Ends the in-flight save. Success selects the persisted note; failure
    /// keeps draft and selection for a retry.
    ///
    /// If the draft was replaced while the save was in flight (another note
    /// loaded, a new note started), the newer selection is kept.
    pub fn finish_save(&mut self, result: Result<Note>) -> std::result::Result<Note, Failure> {
        let started_from = self.saving.take();
        match result {
            Ok(note) => {
                if started_from == Some(self.draft_epoch) {
                    debug!("save finished: note {}", note.id);
                    self.state = DraftState::Existing(note.id.clone());
                } else {
                    debug!("save finished: note {} (draft replaced meanwhile)", note.id);
                }
                Ok(note)
            }
            Err(e) => Err(self.fail(FailureKind::SaveFailed, &e)),
        }
    }

    /// Persists the draft, then refreshes the list.
    ///
    /// A refresh failure after a successful save is left in the message area;
    /// the outcome is still `Saved`.
    pub async fn save_note(&mut self) -> std::result::Result<SaveOutcome, Failure> {
        let Some(request) = self.begin_save() else {
            return Ok(SaveOutcome::Disabled);
        };
        let result = request.dispatch(&self.backend).await;
        let note = self.finish_save(result)?;
        self.refresh_list().await.ok();
        Ok(SaveOutcome::Saved(note))
    }

    /// Clears the draft and selection. No network call.
    pub fn new_note(&mut self) {
        self.clear_error();
        self.draft = Draft::default();
        self.state = DraftState::New;
        self.draft_epoch += 1;
    }

    /// Deletes the note, returns to new-note mode, and refreshes the list.
    ///
    /// `None` is a no-op: no call, no state change.
    pub async fn delete_note(&mut self, id: Option<&NoteId>) -> std::result::Result<(), Failure> {
        let Some(id) = id else {
            return Ok(());
        };
        self.clear_error();
        let result = self.backend.delete_note(id).await;
        self.apply_deleted(id, result)?;
        self.refresh_list().await.ok();
        Ok(())
    }

    /// The list is never edited optimistically; only the refresh removes the note.
    pub fn apply_deleted(
        &mut self,
        id: &NoteId,
        result: Result<()>,
    ) -> std::result::Result<(), Failure> {
        match result {
            Ok(()) => {
                debug!("deleted note {}", id);
                self.new_note();
                Ok(())
            }
            Err(e) => Err(self.fail(FailureKind::DeleteFailed, &e)),
        }
    }
}
