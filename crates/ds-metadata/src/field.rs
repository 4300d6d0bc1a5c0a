//! Per-field edit controller
//!
//! One controller owns the editable state of exactly one metadata field bound
//! to one target item (or to an item that does not exist yet). Edits produce
//! save payloads; the caller hands them to the persistence boundary and feeds
//! the result back through [`MetadataFieldController::acknowledge`].
//!
//! Every emitted payload carries a revision. A save result for an older
//! revision than the latest edit is reported as superseded, so a slow first
//! save cannot clobber the state produced by a later edit.

use crate::error::MetadataError;
use crate::form::RenderableField;
use crate::value::{Contents, MetadataId, MetadataPayload, MetadataValue};
use crate::widget::WidgetKind;
use serde_json::Value;

/// Payload waiting to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    /// Edit revision that produced the payload
    pub revision: u64,
    /// Insert or patch payload
    pub payload: MetadataPayload,
}

/// Outcome of feeding a save result back into a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// The result matches the latest edit; the field is clean
    Applied,
    /// A newer edit exists; the field stays dirty
    Superseded {
        /// Latest emitted revision
        latest: u64,
    },
}

/// Editable state of one metadata field
#[derive(Debug, Clone)]
pub struct MetadataFieldController {
    definition: String,
    field: String,
    widget: WidgetKind,
    options: Vec<Value>,
    metadata_id: Option<MetadataId>,
    local_contents: Contents,
    committed: Contents,
    read_only: bool,
    dirty: bool,
    revision: u64,
}

impl MetadataFieldController {
    /// Create a controller for `definition.field`
    #[must_use]
    pub fn new(
        definition: impl Into<String>,
        field: impl Into<String>,
        widget: WidgetKind,
        options: Vec<Value>,
    ) -> Self {
        Self {
            definition: definition.into(),
            field: field.into(),
            widget,
            options,
            metadata_id: None,
            local_contents: Contents::new(),
            committed: Contents::new(),
            read_only: false,
            dirty: false,
            revision: 0,
        }
    }

    /// Create a controller for an assembled field
    #[must_use]
    pub fn for_field(field: &RenderableField) -> Self {
        Self::new(
            field.widget_name.clone(),
            field.field_name.clone(),
            field.widget.clone(),
            field.options.clone(),
        )
    }

    /// Seed state from persisted contents
    ///
    /// Contents are only adopted when they hold an entry for this field.
    /// Creation flows pass `initial_read_only = false`, detail views `true`.
    pub fn initialize(&mut self, existing: Option<&MetadataValue>, initial_read_only: bool) {
        self.metadata_id = existing.and_then(|v| v.id.clone());
        self.local_contents = match existing {
            Some(value) if value.contents.contains_key(&self.field) => value.contents.clone(),
            _ => Contents::new(),
        };
        self.committed = self.local_contents.clone();
        self.read_only = initial_read_only;
        self.dirty = false;
    }

    /// Builder form of [`Self::initialize`]
    #[must_use]
    pub fn initialized(
        mut self,
        existing: Option<&MetadataValue>,
        initial_read_only: bool,
    ) -> Self {
        self.initialize(existing, initial_read_only);
        self
    }

    /// Record a new value for this field
    ///
    /// Returns a patch payload once an id is known, an insert payload before.
    pub fn on_change(&mut self, value: Value) -> PendingSave {
        self.dirty = true;
        self.local_contents.insert(self.field.clone(), value);
        self.revision += 1;
        self.pending()
    }

    /// Flip between read-only and editing
    ///
    /// Entering read-only with unsaved edits returns the commit payload.
    /// Leaving read-only clears the dirty flag.
    pub fn toggle_read_only(&mut self) -> Option<PendingSave> {
        if self.read_only {
            self.read_only = false;
            self.dirty = false;
            return None;
        }

        self.read_only = true;
        if self.dirty {
            tracing::debug!(
                definition = %self.definition,
                field = %self.field,
                revision = self.revision,
                "committing field on leave"
            );
            Some(self.pending())
        } else {
            None
        }
    }

    /// Feed a save result back
    pub fn acknowledge(&mut self, revision: u64, persisted: &MetadataValue) -> Acknowledgement {
        // The insert happened even if stale; later payloads must patch it.
        if self.metadata_id.is_none() {
            self.metadata_id = persisted.id.clone();
        }

        if revision < self.revision {
            tracing::debug!(
                definition = %self.definition,
                field = %self.field,
                revision,
                latest = self.revision,
                "discarding superseded save result"
            );
            return Acknowledgement::Superseded {
                latest: self.revision,
            };
        }

        self.committed = self.local_contents.clone();
        self.dirty = false;
        Acknowledgement::Applied
    }

    /// Record an id persisted through another field of the same definition
    pub fn adopt_id(&mut self, id: &MetadataId) {
        if self.metadata_id.is_none() {
            self.metadata_id = Some(id.clone());
        }
    }

    /// Drop unsaved edits and return to read-only
    pub fn cancel(&mut self) {
        self.local_contents = self.committed.clone();
        self.dirty = false;
        self.read_only = true;
    }

    /// Return to edit mode after a failed commit
    ///
    /// Unsaved edits and the dirty flag are kept, so the next toggle commits
    /// them again.
    pub fn reopen(&mut self) {
        self.read_only = false;
    }

    /// Validate the current value through the field's widget
    pub fn validate(&self) -> Result<(), MetadataError> {
        match self.value() {
            Some(value) => self
                .widget
                .validate(value, &self.options)
                .map_err(|source| MetadataError::InvalidValue {
                    definition: self.definition.clone(),
                    field: self.field.clone(),
                    source,
                }),
            None => Ok(()),
        }
    }

    fn pending(&self) -> PendingSave {
        let payload = match &self.metadata_id {
            Some(id) => MetadataPayload::Update {
                id: id.clone(),
                definition: self.definition.clone(),
                contents: self.local_contents.clone(),
            },
            None => MetadataPayload::Create {
                definition: self.definition.clone(),
                contents: self.local_contents.clone(),
            },
        };
        PendingSave {
            revision: self.revision,
            payload,
        }
    }

    /// Current value of this field
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.local_contents.get(&self.field)
    }

    /// Local contents
    #[inline]
    #[must_use]
    pub fn contents(&self) -> &Contents {
        &self.local_contents
    }

    /// Owning definition name
    #[inline]
    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Resolved widget
    #[inline]
    #[must_use]
    pub fn widget(&self) -> &WidgetKind {
        &self.widget
    }

    /// Persisted id, if any
    #[inline]
    #[must_use]
    pub fn metadata_id(&self) -> Option<&MetadataId> {
        self.metadata_id.as_ref()
    }

    /// Is the field read-only
    #[inline]
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Are there unsaved edits
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Latest emitted revision
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lat() -> MetadataFieldController {
        MetadataFieldController::new("GPS", "lat", WidgetKind::FloatField, Vec::new())
    }

    #[test]
    fn initialize_without_existing_is_empty() {
        let ctl = lat().initialized(None, false);
        assert!(ctl.contents().is_empty());
        assert!(!ctl.is_read_only());
        assert!(!ctl.is_dirty());
    }

    #[test]
    fn initialize_ignores_contents_without_field() {
        let existing = MetadataValue::new("GPS")
            .with_id(MetadataId::new("m1"))
            .with_entry("lon", json!(1.0));
        let ctl = lat().initialized(Some(&existing), true);
        assert!(ctl.contents().is_empty());
        assert_eq!(ctl.metadata_id(), Some(&MetadataId::new("m1")));
        assert!(ctl.is_read_only());
    }

    #[test]
    fn change_without_id_emits_create() {
        let mut ctl = lat().initialized(None, false);
        let pending = ctl.on_change(json!(40.1));
        assert!(ctl.is_dirty());
        assert_eq!(pending.revision, 1);
        assert!(pending.payload.is_create());
        assert_eq!(pending.payload.contents().get("lat"), Some(&json!(40.1)));
    }

    #[test]
    fn change_with_id_emits_update() {
        let existing = MetadataValue::new("GPS")
            .with_id(MetadataId::new("m1"))
            .with_entry("lat", json!(1.0))
            .with_entry("lon", json!(2.0));
        let mut ctl = lat().initialized(Some(&existing), false);
        let pending = ctl.on_change(json!(3.0));

        assert_eq!(pending.payload.id(), Some(&MetadataId::new("m1")));
        assert_eq!(pending.payload.contents().get("lat"), Some(&json!(3.0)));
        assert_eq!(pending.payload.contents().get("lon"), Some(&json!(2.0)));
    }

    #[test]
    fn leaving_edit_mode_while_dirty_commits() {
        let mut ctl = lat().initialized(None, false);
        ctl.on_change(json!(1.5));
        let commit = ctl.toggle_read_only().expect("dirty field commits");
        assert!(ctl.is_read_only());
        assert_eq!(commit.revision, 1);
    }

    #[test]
    fn leaving_edit_mode_clean_does_not_commit() {
        let mut ctl = lat().initialized(None, false);
        assert!(ctl.toggle_read_only().is_none());
    }

    #[test]
    fn entering_edit_mode_clears_dirty() {
        let mut ctl = lat().initialized(None, true);
        ctl.on_change(json!(1.5));
        assert!(ctl.is_dirty());
        assert!(ctl.toggle_read_only().is_none());
        assert!(!ctl.is_read_only());
        assert!(!ctl.is_dirty());
    }

    #[test]
    fn acknowledge_adopts_id_and_cleans() {
        let mut ctl = lat().initialized(None, false);
        let pending = ctl.on_change(json!(1.5));
        let persisted = MetadataValue::from(pending.payload).with_id(MetadataId::new("m9"));

        assert_eq!(ctl.acknowledge(pending.revision, &persisted), Acknowledgement::Applied);
        assert!(!ctl.is_dirty());
        assert!(!ctl.on_change(json!(2.0)).payload.is_create());
    }

    #[test]
    fn stale_acknowledge_keeps_dirty_but_adopts_id() {
        let mut ctl = lat().initialized(None, false);
        let first = ctl.on_change(json!(1.0));
        let second = ctl.on_change(json!(2.0));
        assert!(second.payload.is_create());

        let persisted = MetadataValue::from(first.payload).with_id(MetadataId::new("m1"));
        assert_eq!(
            ctl.acknowledge(first.revision, &persisted),
            Acknowledgement::Superseded { latest: 2 }
        );
        assert!(ctl.is_dirty());
        assert_eq!(ctl.metadata_id(), Some(&MetadataId::new("m1")));
    }

    #[test]
    fn adopt_id_keeps_known_id() {
        let mut ctl = lat().initialized(None, false);
        ctl.adopt_id(&MetadataId::new("a"));
        ctl.adopt_id(&MetadataId::new("b"));
        assert_eq!(ctl.metadata_id(), Some(&MetadataId::new("a")));
        assert!(!ctl.on_change(json!(0.5)).payload.is_create());
    }

    #[test]
    fn cancel_restores_committed() {
        let existing = MetadataValue::new("GPS")
            .with_id(MetadataId::new("m1"))
            .with_entry("lat", json!(1.0));
        let mut ctl = lat().initialized(Some(&existing), false);
        ctl.on_change(json!(99.0));
        ctl.cancel();

        assert_eq!(ctl.value(), Some(&json!(1.0)));
        assert!(ctl.is_read_only());
        assert!(!ctl.is_dirty());
    }

    #[test]
    fn reopen_after_failed_commit_commits_again() {
        let mut ctl = lat().initialized(None, false);
        ctl.on_change(json!(2.5));
        assert!(ctl.toggle_read_only().is_some());

        ctl.reopen();
        assert!(!ctl.is_read_only());
        assert!(ctl.is_dirty());

        let retry = ctl.toggle_read_only().unwrap();
        assert_eq!(retry.payload.contents().get("lat"), Some(&json!(2.5)));
    }

    #[test]
    fn validate_uses_widget() {
        let mut ctl = lat().initialized(None, false);
        ctl.on_change(json!("north"));
        assert!(ctl.validate().is_err());
        ctl.on_change(json!("12.5"));
        assert!(ctl.validate().is_ok());
    }
}
