//! Wizard steps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Step identifiers of the dataset creation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    /// Create the parent dataset; every later step depends on it
    CreateDataset,
    /// Fill in required metadata
    FillMetadata,
    /// Create folders inside the dataset
    CreateFolders,
    /// Upload files into the dataset
    AttachFiles,
}

impl StepId {
    /// Default label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            StepId::CreateDataset => "Create Dataset",
            StepId::FillMetadata => "Fill in Metadata",
            StepId::CreateFolders => "Create Folders",
            StepId::AttachFiles => "Attach Files",
        }
    }

    /// Default description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            StepId::CreateFolders => {
                "Users can create folders and subfolders inside dataset to help with \
                 file management."
            }
            StepId::CreateDataset | StepId::FillMetadata | StepId::AttachFiles => "",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One step of a wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardStep {
    /// Step identifier
    pub id: StepId,
    /// Label shown to the user
    pub label: String,
    /// Optional longer description
    pub description: String,
    /// Has the step's sub-form been completed
    pub completed: bool,
}

impl WizardStep {
    /// Step with default label and description
    #[must_use]
    pub fn new(id: StepId) -> Self {
        Self {
            id,
            label: id.label().to_string(),
            description: id.description().to_string(),
            completed: false,
        }
    }

    /// Override the label
    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// The four steps of dataset creation, in order
#[must_use]
pub fn dataset_creation_steps() -> Vec<WizardStep> {
    [
        StepId::CreateDataset,
        StepId::FillMetadata,
        StepId::CreateFolders,
        StepId::AttachFiles,
    ]
    .into_iter()
    .map(WizardStep::new)
    .collect()
}
