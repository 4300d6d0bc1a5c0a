//! Metadata editing on an existing dataset or file
//!
//! Every field starts read-only. Entering edit mode and leaving it again
//! commits the field if it changed; the save result is acknowledged by the
//! field controller and folded into the store.

use crate::error::CoreError;
use crate::failure::FailureChannel;
use crate::persistence::MetadataSink;
use ds_metadata::{
    Acknowledgement, MetadataDefinition, MetadataFieldController, MetadataFormAssembler,
    MetadataPayload, MetadataValue, PendingSave, RenderableField, TargetKind,
};
use ds_store::{MetadataEvent, ResourceId, ResourceStore};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

type FieldKey = (String, String);

fn key(definition: &str, field: &str) -> FieldKey {
    (definition.to_string(), field.to_string())
}

/// Detail-view metadata editor
pub struct MetadataEditor<S> {
    sink: Arc<S>,
    store: Arc<ResourceStore>,
    failures: Arc<FailureChannel>,
    resource: ResourceId,
    fields: Vec<RenderableField>,
    controllers: IndexMap<FieldKey, MetadataFieldController>,
}

impl<S: MetadataSink> MetadataEditor<S> {
    /// Editor for `resource`, seeded from the store's saved metadata
    #[must_use]
    pub fn new(
        sink: Arc<S>,
        store: Arc<ResourceStore>,
        failures: Arc<FailureChannel>,
        resource: ResourceId,
        target: TargetKind,
        assembler: &MetadataFormAssembler,
        definitions: &[MetadataDefinition],
    ) -> Self {
        let existing: Vec<MetadataValue> =
            store.snapshot().metadata.values.iter().cloned().collect();
        let fields = assembler.assemble(definitions, target);
        let controllers = assembler
            .controllers(definitions, target, &existing, true)
            .into_iter()
            .map(|ctl| (key(ctl.definition(), ctl.field()), ctl))
            .collect();

        Self {
            sink,
            store,
            failures,
            resource,
            fields,
            controllers,
        }
    }

    /// Resource being edited
    #[inline]
    #[must_use]
    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    /// Fields in render order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[RenderableField] {
        &self.fields
    }

    /// Controller of one field
    #[must_use]
    pub fn controller(&self, definition: &str, field: &str) -> Option<&MetadataFieldController> {
        self.controllers.get(&key(definition, field))
    }

    /// Fields with unsaved edits
    #[must_use]
    pub fn dirty_fields(&self) -> Vec<FieldKey> {
        self.controllers
            .iter()
            .filter(|(_, ctl)| ctl.is_dirty())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Change a field in edit mode
    pub fn edit(
        &mut self,
        definition: &str,
        field: &str,
        value: Value,
    ) -> Result<PendingSave, CoreError> {
        let ctl = self.controller_mut(definition, field)?;
        if ctl.is_read_only() {
            return Err(CoreError::ReadOnly {
                definition: definition.to_string(),
                field: field.to_string(),
            });
        }
        Ok(ctl.on_change(value))
    }

    /// Flip edit mode; leaving it with changes saves the field
    ///
    /// An invalid value keeps the field in edit mode and is returned as an
    /// error without calling the sink.
    pub async fn toggle(
        &mut self,
        definition: &str,
        field: &str,
    ) -> Result<Option<MetadataValue>, CoreError> {
        let ctl = self.controller_mut(definition, field)?;
        if !ctl.is_read_only() && ctl.is_dirty() {
            ctl.validate()?;
        }

        match ctl.toggle_read_only() {
            Some(pending) => self.persist(key(definition, field), pending).await.map(Some),
            None => Ok(None),
        }
    }

    /// Drop unsaved edits of a field
    pub fn cancel(&mut self, definition: &str, field: &str) -> Result<(), CoreError> {
        self.controller_mut(definition, field)?.cancel();
        Ok(())
    }

    /// Re-seed clean fields from the store
    pub fn reload(&mut self) {
        let snapshot = self.store.snapshot();
        for ((definition, _), ctl) in &mut self.controllers {
            if ctl.is_dirty() {
                continue;
            }
            let read_only = ctl.is_read_only();
            ctl.initialize(snapshot.metadata.for_definition(definition), read_only);
        }
    }

    async fn persist(
        &mut self,
        field_key: FieldKey,
        pending: PendingSave,
    ) -> Result<MetadataValue, CoreError> {
        let payload = self.merge_latest(&field_key.1, pending.payload);
        let result = self.sink.save(&self.resource, payload).await;
        let value = match self.failures.capture("save_metadata", result) {
            Ok(value) => value,
            Err(err) => {
                if let Some(ctl) = self.controllers.get_mut(&field_key) {
                    ctl.reopen();
                }
                return Err(err.into());
            }
        };

        if let Some(ctl) = self.controllers.get_mut(&field_key) {
            let ack = ctl.acknowledge(pending.revision, &value);
            if let Acknowledgement::Superseded { latest } = ack {
                tracing::debug!(
                    definition = %field_key.0,
                    field = %field_key.1,
                    latest,
                    "save acknowledged after newer edit"
                );
            }
        }
        if let Some(id) = &value.id {
            for ((definition, _), ctl) in &mut self.controllers {
                if *definition == field_key.0 {
                    ctl.adopt_id(id);
                }
            }
        }

        self.store.dispatch(MetadataEvent::SavedMetadata(value.clone()));
        tracing::info!(
            resource = %self.resource,
            definition = %field_key.0,
            field = %field_key.1,
            "metadata field saved"
        );
        Ok(value)
    }

    /// Overlay this field's value on the latest saved contents of its
    /// definition so edits of sibling fields are not reverted.
    fn merge_latest(&self, field: &str, payload: MetadataPayload) -> MetadataPayload {
        let snapshot = self.store.snapshot();
        let latest = match payload.id() {
            Some(id) => snapshot.metadata.get(id),
            None => snapshot.metadata.for_definition(payload.definition()),
        };
        let Some(latest) = latest else {
            return payload;
        };

        let mut contents = latest.contents.clone();
        if let Some(value) = payload.contents().get(field) {
            contents.insert(field.to_string(), value.clone());
        }

        match payload {
            MetadataPayload::Update { id, definition, .. } => MetadataPayload::Update {
                id,
                definition,
                contents,
            },
            MetadataPayload::Create { definition, .. } => match &latest.id {
                Some(id) => MetadataPayload::Update {
                    id: id.clone(),
                    definition,
                    contents,
                },
                None => MetadataPayload::Create {
                    definition,
                    contents,
                },
            },
        }
    }

    fn controller_mut(
        &mut self,
        definition: &str,
        field: &str,
    ) -> Result<&mut MetadataFieldController, CoreError> {
        self.controllers
            .get_mut(&key(definition, field))
            .ok_or_else(|| CoreError::UnknownField {
                definition: definition.to_string(),
                field: field.to_string(),
            })
    }
}

impl<S> std::fmt::Debug for MetadataEditor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataEditor")
            .field("resource", &self.resource)
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}
