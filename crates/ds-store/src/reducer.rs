//! Pure reducers
//!
//! `reduce` folds one event into a snapshot and returns the next snapshot.
//! The input is never modified. Collection semantics are uniform:
//!
//! - received: replace the collection wholesale
//! - created: stash into the staging slot, the list is left alone
//! - updated: replace the entry with the same id, never append
//! - deleted: drop the entry with the same id, order of the rest is kept
//! - reset: clear the staging slot

use crate::event::{DatasetEvent, MetadataEvent, StoreEvent, VisualizationEvent};
use crate::resource::{FolderOrFile, Identified, ResourceId};
use crate::state::{DatasetState, MetadataState, StoreState, VisualizationState};
use ds_metadata::MetadataValue;
use std::sync::Arc;

/// Fold one event into a snapshot
#[must_use]
pub fn reduce(state: &StoreState, event: &StoreEvent) -> StoreState {
    match event {
        StoreEvent::Dataset(event) => StoreState {
            dataset: reduce_dataset(&state.dataset, event),
            ..state.clone()
        },
        StoreEvent::Metadata(event) => StoreState {
            metadata: reduce_metadata(&state.metadata, event),
            ..state.clone()
        },
        StoreEvent::Visualization(event) => StoreState {
            visualization: reduce_visualization(&state.visualization, event),
            ..state.clone()
        },
    }
}

/// Fold a sequence of events
#[must_use]
pub fn replay<'a, I>(initial: &StoreState, events: I) -> StoreState
where
    I: IntoIterator<Item = &'a StoreEvent>,
{
    events
        .into_iter()
        .fold(initial.clone(), |state, event| reduce(&state, event))
}

/// Dataset slice reducer
#[must_use]
pub fn reduce_dataset(state: &DatasetState, event: &DatasetEvent) -> DatasetState {
    let mut next = state.clone();
    match event {
        DatasetEvent::ReceivedDatasets(page) => next.datasets = page.clone().into(),
        DatasetEvent::CreatedDataset(dataset) => next.new_dataset = Some(dataset.clone()),
        DatasetEvent::ResetCreateDataset => next.new_dataset = None,
        DatasetEvent::UpdatedDataset(dataset) => {
            next.about = Some(dataset.clone());
            next.datasets.data = replace_by_id(&state.datasets.data, dataset.clone());
        }
        DatasetEvent::DeletedDataset(dataset) => {
            next.datasets.data = remove_by_id(&state.datasets.data, dataset.id());
        }
        DatasetEvent::ReceivedAbout(dataset) => next.about = Some(dataset.clone()),
        DatasetEvent::ReceivedRole(role) => next.dataset_role = Some(role.clone()),
        DatasetEvent::ReceivedRoles(roles) => next.roles = Some(roles.clone()),
        DatasetEvent::ReceivedFoldersAndFiles(page) => {
            next.folders_and_files = page.clone().into();
        }
        DatasetEvent::CreatedFile(file) => next.new_file = Some(file.clone()),
        DatasetEvent::CreatedFiles(files) => next.new_files = files.iter().cloned().collect(),
        DatasetEvent::ResetCreateFile => next.new_file = None,
        DatasetEvent::ResetCreateFiles => next.new_files = im::Vector::new(),
        DatasetEvent::UpdatedFile(file) => {
            next.folders_and_files.data = replace_by_id(
                &state.folders_and_files.data,
                FolderOrFile::File(file.clone()),
            );
        }
        DatasetEvent::DeletedFile(file) => {
            next.folders_and_files.data = remove_by_id(&state.folders_and_files.data, file.id());
        }
        DatasetEvent::CreatedFolder(folder) => next.new_folder = Some(folder.clone()),
        DatasetEvent::ResetCreateFolder => next.new_folder = None,
        DatasetEvent::UpdatedFolder(folder) => {
            next.folders_and_files.data = replace_by_id(
                &state.folders_and_files.data,
                FolderOrFile::Folder(folder.clone()),
            );
        }
        DatasetEvent::DeletedFolder(folder) => {
            next.folders_and_files.data =
                remove_by_id(&state.folders_and_files.data, folder.id());
        }
        DatasetEvent::SetGroupRole
        | DatasetEvent::SetUserRole
        | DatasetEvent::RemovedGroupRole
        | DatasetEvent::RemovedUserRole => {}
    }
    next
}

/// Metadata slice reducer
#[must_use]
pub fn reduce_metadata(state: &MetadataState, event: &MetadataEvent) -> MetadataState {
    match event {
        MetadataEvent::ReceivedMetadata(values) => MetadataState {
            values: values.iter().cloned().collect(),
        },
        MetadataEvent::SavedMetadata(value) => MetadataState {
            values: upsert_metadata(&state.values, value),
        },
        MetadataEvent::DeletedMetadata(value) => MetadataState {
            values: state
                .values
                .iter()
                .filter(|v| !same_metadata(v, value))
                .cloned()
                .collect(),
        },
    }
}

/// Visualization slice reducer
#[must_use]
pub fn reduce_visualization(
    state: &VisualizationState,
    event: &VisualizationEvent,
) -> VisualizationState {
    let mut next = state.clone();
    match event {
        VisualizationEvent::ReceivedData(data) => next.data = Some(data.clone()),
        VisualizationEvent::ReceivedConfigs(configs) => {
            next.configs = configs.iter().cloned().collect();
        }
        VisualizationEvent::DownloadedBlob(bytes) => next.blob = Arc::from(bytes.as_slice()),
        VisualizationEvent::GeneratedUrl(url) => next.url.clone_from(url),
        VisualizationEvent::ReceivedPresignedUrl(url) => next.presigned_url.clone_from(url),
    }
    next
}

fn replace_by_id<T>(items: &im::Vector<T>, replacement: T) -> im::Vector<T>
where
    T: Clone + Identified,
{
    items
        .iter()
        .map(|item| {
            if item.id() == replacement.id() {
                replacement.clone()
            } else {
                item.clone()
            }
        })
        .collect()
}

fn remove_by_id<T>(items: &im::Vector<T>, id: &ResourceId) -> im::Vector<T>
where
    T: Clone + Identified,
{
    items.iter().filter(|item| item.id() != id).cloned().collect()
}

// Values without an id only match by definition name; they are never persisted
// twice under different names.
fn same_metadata(a: &MetadataValue, b: &MetadataValue) -> bool {
    match (&a.id, &b.id) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.definition == b.definition,
        _ => false,
    }
}

fn upsert_metadata(
    values: &im::Vector<MetadataValue>,
    value: &MetadataValue,
) -> im::Vector<MetadataValue> {
    if values.iter().any(|v| same_metadata(v, value)) {
        values
            .iter()
            .map(|v| {
                if same_metadata(v, value) {
                    value.clone()
                } else {
                    v.clone()
                }
            })
            .collect()
    } else {
        let mut next = values.clone();
        next.push_back(value.clone());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Dataset, DatasetRole, FileItem, Folder};
    use ds_metadata::{MetadataId, Paged};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn datasets(ids: &[&str]) -> StoreState {
        let page = Paged::complete(ids.iter().map(|id| Dataset::new(*id, *id)).collect());
        reduce(
            &StoreState::default(),
            &DatasetEvent::ReceivedDatasets(page).into(),
        )
    }

    fn listing() -> StoreState {
        let page = Paged::complete(vec![
            Folder::new("f1", "raw", "d1").into(),
            FileItem::new("a", "a.csv", "d1").into(),
            FileItem::new("b", "b.csv", "d1").into(),
        ]);
        reduce(
            &StoreState::default(),
            &DatasetEvent::ReceivedFoldersAndFiles(page).into(),
        )
    }

    #[test]
    fn deleted_dataset_removes_by_id() {
        let state = datasets(&["1", "2"]);
        let next = reduce(
            &state,
            &DatasetEvent::DeletedDataset(Dataset::new("1", "")).into(),
        );
        assert_eq!(next.dataset.datasets.ids(), vec![ResourceId::new("2")]);
        assert_eq!(state.dataset.datasets.len(), 2);
    }

    #[test]
    fn created_dataset_goes_to_staging_only() {
        let state = datasets(&["1"]);
        let next = reduce(
            &state,
            &DatasetEvent::CreatedDataset(Dataset::new("9", "new")).into(),
        );
        assert_eq!(next.dataset.datasets.len(), 1);
        assert_eq!(
            next.dataset.new_dataset.as_ref().map(|d| d.id.clone()),
            Some(ResourceId::new("9"))
        );
    }

    #[test]
    fn updated_dataset_replaces_about_and_entry() {
        let state = datasets(&["1", "2"]);
        let renamed = Dataset::new("2", "renamed");
        let next = reduce(&state, &DatasetEvent::UpdatedDataset(renamed.clone()).into());

        assert_eq!(next.dataset.about, Some(renamed.clone()));
        assert_eq!(next.dataset.datasets.len(), 2);
        assert_eq!(next.dataset.datasets.get(&ResourceId::new("2")), Some(&renamed));
    }

    #[test]
    fn updated_unknown_dataset_does_not_append() {
        let state = datasets(&["1"]);
        let next = reduce(
            &state,
            &DatasetEvent::UpdatedDataset(Dataset::new("7", "ghost")).into(),
        );
        assert_eq!(next.dataset.datasets.ids(), vec![ResourceId::new("1")]);
    }

    #[test]
    fn file_and_folder_updates_share_listing() {
        let state = listing();
        let mut renamed = FileItem::new("b", "b-v2.csv", "d1");
        renamed.version_num = 2;
        let next = reduce(&state, &DatasetEvent::UpdatedFile(renamed.clone()).into());
        assert_eq!(next.dataset.files().nth(1), Some(&renamed));

        let next = reduce(
            &next,
            &DatasetEvent::DeletedFolder(Folder::new("f1", "raw", "d1")).into(),
        );
        assert_eq!(
            next.dataset.folders_and_files.ids(),
            vec![ResourceId::new("a"), ResourceId::new("b")]
        );
        assert_eq!(next.dataset.folders().count(), 0);
    }

    #[test]
    fn deleted_file_keeps_order_of_rest() {
        let state = listing();
        let next = reduce(
            &state,
            &DatasetEvent::DeletedFile(FileItem::new("a", "a.csv", "d1")).into(),
        );
        assert_eq!(
            next.dataset.folders_and_files.ids(),
            vec![ResourceId::new("f1"), ResourceId::new("b")]
        );
    }

    #[test]
    fn staging_slots_reset() {
        let mut state = StoreState::default();
        for event in [
            DatasetEvent::CreatedFile(FileItem::new("a", "a.csv", "d1")),
            DatasetEvent::CreatedFiles(vec![FileItem::new("b", "b.csv", "d1")]),
            DatasetEvent::CreatedFolder(Folder::new("f", "raw", "d1")),
        ] {
            state = reduce(&state, &event.into());
        }
        assert!(state.dataset.new_file.is_some());
        assert_eq!(state.dataset.new_files.len(), 1);
        assert!(state.dataset.new_folder.is_some());

        for event in [
            DatasetEvent::ResetCreateFile,
            DatasetEvent::ResetCreateFiles,
            DatasetEvent::ResetCreateFolder,
        ] {
            state = reduce(&state, &event.into());
        }
        assert_eq!(state, StoreState::default());
    }

    #[test]
    fn role_acknowledgements_are_noops() {
        let state = datasets(&["1"]);
        for event in [
            DatasetEvent::SetGroupRole,
            DatasetEvent::SetUserRole,
            DatasetEvent::RemovedGroupRole,
            DatasetEvent::RemovedUserRole,
        ] {
            assert_eq!(reduce(&state, &event.into()), state);
        }
    }

    #[test]
    fn received_role_sets_singleton() {
        let role = DatasetRole {
            dataset_id: ResourceId::new("1"),
            role: "owner".to_string(),
        };
        let next = reduce(
            &StoreState::default(),
            &DatasetEvent::ReceivedRole(role.clone()).into(),
        );
        assert_eq!(next.dataset.dataset_role, Some(role));
    }

    #[test]
    fn saved_metadata_upserts_by_id() {
        let first = MetadataValue::new("GPS")
            .with_id(MetadataId::new("m1"))
            .with_entry("lat", json!(1.0));
        let other = MetadataValue::new("Units").with_id(MetadataId::new("m2"));
        let state = reduce(
            &StoreState::default(),
            &MetadataEvent::ReceivedMetadata(vec![first, other]).into(),
        );

        let patched = MetadataValue::new("GPS")
            .with_id(MetadataId::new("m1"))
            .with_entry("lat", json!(2.0));
        let next = reduce(&state, &MetadataEvent::SavedMetadata(patched.clone()).into());
        assert_eq!(next.metadata.values.len(), 2);
        assert_eq!(next.metadata.get(&MetadataId::new("m1")), Some(&patched));

        let fresh = MetadataValue::new("Grant").with_id(MetadataId::new("m3"));
        let next = reduce(&next, &MetadataEvent::SavedMetadata(fresh).into());
        assert_eq!(next.metadata.values.len(), 3);

        let next = reduce(&next, &MetadataEvent::DeletedMetadata(patched).into());
        assert_eq!(next.metadata.values.len(), 2);
        assert!(next.metadata.for_definition("GPS").is_none());
    }

    #[test]
    fn visualization_slice_replaces() {
        let events = [
            StoreEvent::from(VisualizationEvent::GeneratedUrl("http://x/vis".to_string())),
            VisualizationEvent::DownloadedBlob(vec![1, 2, 3]).into(),
            VisualizationEvent::ReceivedPresignedUrl("http://x/signed".to_string()).into(),
        ];
        let state = replay(&StoreState::default(), &events);
        assert_eq!(state.visualization.url, "http://x/vis");
        assert_eq!(&*state.visualization.blob, &[1, 2, 3]);
        assert_eq!(state.visualization.presigned_url, "http://x/signed");
        assert_eq!(state.dataset, DatasetState::default());
    }
}
