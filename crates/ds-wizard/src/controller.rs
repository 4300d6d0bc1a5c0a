//! Wizard controller
//!
//! Owns the ordered steps, the active index and the finished flag. Actions
//! are checked in this order:
//!
//! - finished wizards reject everything with [`WizardError::AlreadyFinished`]
//! - the action must be offered on the active step
//! - Next and Finish require the active step to be completed
//!
//! Moving Back never clears a step's completion.

use crate::error::WizardError;
use crate::machine::{self, WizardAction};
use crate::step::{dataset_creation_steps, StepId, WizardStep};
use serde::Serialize;

/// Result of an accepted action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WizardOutcome {
    /// Active step changed
    Moved {
        /// Step left
        from: StepId,
        /// Step entered
        to: StepId,
    },
    /// Wizard completed
    Finished,
}

/// Render status of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Before the active step and completed
    Done,
    /// Before the active step and not completed
    Skipped,
    /// Active step
    Active,
    /// After the active step
    Pending,
}

/// One row of the step indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    /// Step identifier
    pub id: StepId,
    /// Label
    pub label: String,
    /// Description
    pub description: String,
    /// Status relative to the active step
    pub status: StepStatus,
}

/// Everything a renderer needs to draw the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardView {
    /// Steps in order
    pub steps: Vec<StepView>,
    /// Active step index
    pub active: usize,
    /// Label of the primary button
    pub primary_label: &'static str,
    /// Actions currently accepted
    pub enabled: Vec<WizardAction>,
    /// Whether the wizard completed
    pub finished: bool,
}

/// Linear wizard state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardController {
    steps: Vec<WizardStep>,
    active: usize,
    finished: bool,
}

impl WizardController {
    /// Wizard over the given steps, starting at the first
    pub fn new(steps: Vec<WizardStep>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::EmptyWizard);
        }
        Ok(Self {
            steps,
            active: 0,
            finished: false,
        })
    }

    /// Four-step dataset creation wizard
    #[must_use]
    pub fn dataset_creation() -> Self {
        Self {
            steps: dataset_creation_steps(),
            active: 0,
            finished: false,
        }
    }

    /// Steps in order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; construction rejects empty wizards
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Active step index
    #[inline]
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Active step
    #[inline]
    #[must_use]
    pub fn active_step(&self) -> &WizardStep {
        &self.steps[self.active]
    }

    /// Active step identifier
    #[inline]
    #[must_use]
    pub fn active_id(&self) -> StepId {
        self.active_step().id
    }

    /// Whether Finish was accepted
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Is the last step active
    #[inline]
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.active + 1 == self.steps.len()
    }

    /// "Finish" on the last step, "Next" elsewhere
    #[must_use]
    pub fn primary_label(&self) -> &'static str {
        if self.is_last() {
            "Finish"
        } else {
            "Next"
        }
    }

    /// Completion flag of a step
    #[must_use]
    pub fn is_completed(&self, id: StepId) -> bool {
        self.steps.iter().any(|s| s.id == id && s.completed)
    }

    /// Record whether a step's sub-form is complete
    pub fn set_completed(&mut self, id: StepId, completed: bool) -> Result<(), WizardError> {
        let step = self
            .steps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(WizardError::UnknownStep(id))?;
        step.completed = completed;
        tracing::debug!(step = %id, completed, "wizard step completion changed");
        Ok(())
    }

    /// Check an action without applying it
    pub fn check(&self, action: WizardAction) -> Result<(), WizardError> {
        if self.finished {
            return Err(WizardError::AlreadyFinished);
        }

        let step = self.active_step();
        if !machine::is_allowed(self.active, self.steps.len(), action) {
            return Err(WizardError::IllegalAction {
                action,
                step: step.id,
            });
        }
        if machine::requires_completion(action) && !step.completed {
            return Err(WizardError::StepIncomplete(step.id));
        }
        Ok(())
    }

    /// Is the action currently accepted
    #[inline]
    #[must_use]
    pub fn can(&self, action: WizardAction) -> bool {
        self.check(action).is_ok()
    }

    /// Apply an action
    pub fn apply(&mut self, action: WizardAction) -> Result<WizardOutcome, WizardError> {
        if let Err(e) = self.check(action) {
            tracing::debug!(
                ?action,
                step = %self.active_id(),
                error = %e,
                "wizard action rejected"
            );
            return Err(e);
        }

        let from = self.active_id();
        match machine::target_index(self.active, action) {
            Some(index) => {
                self.active = index;
                let to = self.active_id();
                tracing::debug!(?action, %from, %to, "wizard moved");
                Ok(WizardOutcome::Moved { from, to })
            }
            None => {
                self.finished = true;
                tracing::info!(steps = self.steps.len(), "wizard finished");
                Ok(WizardOutcome::Finished)
            }
        }
    }

    /// Apply Next
    pub fn next(&mut self) -> Result<WizardOutcome, WizardError> {
        self.apply(WizardAction::Next)
    }

    /// Apply Skip
    pub fn skip(&mut self) -> Result<WizardOutcome, WizardError> {
        self.apply(WizardAction::Skip)
    }

    /// Apply Back
    pub fn back(&mut self) -> Result<WizardOutcome, WizardError> {
        self.apply(WizardAction::Back)
    }

    /// Apply Finish
    pub fn finish(&mut self) -> Result<WizardOutcome, WizardError> {
        self.apply(WizardAction::Finish)
    }

    /// Snapshot for rendering
    #[must_use]
    pub fn view(&self) -> WizardView {
        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| StepView {
                id: step.id,
                label: step.label.clone(),
                description: step.description.clone(),
                status: match i.cmp(&self.active) {
                    std::cmp::Ordering::Less if step.completed => StepStatus::Done,
                    std::cmp::Ordering::Less => StepStatus::Skipped,
                    std::cmp::Ordering::Equal => StepStatus::Active,
                    std::cmp::Ordering::Greater => StepStatus::Pending,
                },
            })
            .collect();

        let enabled = [
            WizardAction::Next,
            WizardAction::Skip,
            WizardAction::Back,
            WizardAction::Finish,
        ]
        .into_iter()
        .filter(|a| self.can(*a))
        .collect();

        WizardView {
            steps,
            active: self.active,
            primary_label: self.primary_label(),
            enabled,
            finished: self.finished,
        }
    }
}

impl Default for WizardController {
    fn default() -> Self {
        Self::dataset_creation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_on_create_dataset() {
        let wizard = WizardController::dataset_creation();
        assert_eq!(wizard.active_id(), StepId::CreateDataset);
        assert_eq!(wizard.primary_label(), "Next");
        assert!(!wizard.is_finished());
    }

    #[test]
    fn next_requires_completion() {
        let mut wizard = WizardController::dataset_creation();
        assert_eq!(
            wizard.next(),
            Err(WizardError::StepIncomplete(StepId::CreateDataset))
        );

        wizard.set_completed(StepId::CreateDataset, true).unwrap();
        assert_eq!(
            wizard.next(),
            Ok(WizardOutcome::Moved {
                from: StepId::CreateDataset,
                to: StepId::FillMetadata
            })
        );
    }

    #[test]
    fn skip_is_not_offered_on_first_step() {
        let mut wizard = WizardController::dataset_creation();
        assert_eq!(
            wizard.skip(),
            Err(WizardError::IllegalAction {
                action: WizardAction::Skip,
                step: StepId::CreateDataset
            })
        );
    }

    #[test]
    fn skip_and_back_keep_completion() {
        let mut wizard = WizardController::dataset_creation();
        wizard.set_completed(StepId::CreateDataset, true).unwrap();
        wizard.next().unwrap();
        wizard.skip().unwrap();
        assert_eq!(wizard.active_id(), StepId::CreateFolders);

        wizard.back().unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.active_id(), StepId::CreateDataset);
        assert!(wizard.is_completed(StepId::CreateDataset));
    }

    #[test]
    fn finish_on_last_step_then_everything_rejected() {
        let mut wizard = WizardController::dataset_creation();
        wizard.set_completed(StepId::CreateDataset, true).unwrap();
        wizard.next().unwrap();
        wizard.skip().unwrap();
        wizard.skip().unwrap();
        assert_eq!(wizard.primary_label(), "Finish");
        assert_eq!(
            wizard.finish(),
            Err(WizardError::StepIncomplete(StepId::AttachFiles))
        );

        wizard.set_completed(StepId::AttachFiles, true).unwrap();
        assert_eq!(wizard.finish(), Ok(WizardOutcome::Finished));
        assert_eq!(wizard.back(), Err(WizardError::AlreadyFinished));
        assert_eq!(wizard.finish(), Err(WizardError::AlreadyFinished));
    }

    #[test]
    fn view_reports_status_and_enabled_actions() {
        let mut wizard = WizardController::dataset_creation();
        wizard.set_completed(StepId::CreateDataset, true).unwrap();
        wizard.next().unwrap();
        wizard.skip().unwrap();

        let view = wizard.view();
        let statuses: Vec<_> = view.steps.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                StepStatus::Done,
                StepStatus::Skipped,
                StepStatus::Active,
                StepStatus::Pending
            ]
        );
        assert_eq!(view.enabled, vec![WizardAction::Skip, WizardAction::Back]);
        assert_eq!(view.primary_label, "Next");
    }

    #[test]
    fn empty_wizard_rejected() {
        assert_eq!(WizardController::new(Vec::new()), Err(WizardError::EmptyWizard));
    }
}
