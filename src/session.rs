//! Per-view edit state tracking

use crate::model::RecordId;

/// What a view is currently editing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState<D> {
    /// No record is being edited
    #[default]
    Idle,
    /// One record's transient draft is open
    Editing { id: RecordId, draft: D },
}

/// Single-slot edit tracker for one view.
///
/// At most one record per view can be in the editing state; starting a new
/// edit silently abandons the previous draft. The session also carries the
/// separate draft buffer backing the view's "new record" form — same shape,
/// but never tied to an id.
///
/// The session never touches the entity store. Saving a draft goes through
/// the mutation coordinator; only after that succeeds should the caller
/// invoke [`finish`](EditSession::finish) (or
/// [`reset_new`](EditSession::reset_new) for a create), so a failed save
/// keeps the draft around for correction and retry.
#[derive(Debug, Clone, Default)]
pub struct EditSession<D> {
    state: EditState<D>,
    new_draft: D,
}

impl<D: Default> EditSession<D> {
    /// Create a session with no edit in progress and an empty new-record form
    pub fn new() -> Self {
        Self::default()
    }

    /// The current edit state
    pub fn state(&self) -> &EditState<D> {
        &self.state
    }

    /// Whether a record is currently being edited
    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// Id of the record being edited, if any
    pub fn editing_id(&self) -> Option<RecordId> {
        match self.state {
            EditState::Editing { id, .. } => Some(id),
            EditState::Idle => None,
        }
    }

    /// Start editing a record, initializing the draft from its current field
    /// values. Any edit already in progress is abandoned.
    pub fn begin(&mut self, id: RecordId, draft: D) {
        self.state = EditState::Editing { id, draft };
    }

    /// The in-progress draft, if any
    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Idle => None,
        }
    }

    /// Mutable access to the in-progress draft for field changes
    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match &mut self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Idle => None,
        }
    }

    /// Discard the in-progress draft without saving
    pub fn cancel(&mut self) {
        self.state = EditState::Idle;
    }

    /// Close the edit after a successful save and reset the new-record form
    /// to its empty shape
    pub fn finish(&mut self) {
        self.state = EditState::Idle;
        self.new_draft = D::default();
    }

    /// The draft behind the "new record" form
    pub fn new_draft(&self) -> &D {
        &self.new_draft
    }

    /// Mutable access to the "new record" draft
    pub fn new_draft_mut(&mut self) -> &mut D {
        &mut self.new_draft
    }

    /// Reset the "new record" form after a successful create
    pub fn reset_new(&mut self) {
        self.new_draft = D::default();
    }
}
