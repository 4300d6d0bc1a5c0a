//! Wizard errors

use crate::machine::WizardAction;
use crate::step::StepId;

/// Rejected wizard action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// Action not available on the active step
    #[error("{action:?} is not available on step {step}")]
    IllegalAction {
        /// Rejected action
        action: WizardAction,
        /// Active step
        step: StepId,
    },

    /// Active step's sub-form is not complete
    #[error("step {0} is not complete")]
    StepIncomplete(StepId),

    /// Wizard already finished
    #[error("wizard already finished")]
    AlreadyFinished,

    /// Wizard built without steps
    #[error("wizard has no steps")]
    EmptyWizard,

    /// Step is not part of this wizard
    #[error("step {0} is not part of this wizard")]
    UnknownStep(StepId),
}

impl WizardError {
    /// Whether completing the active step would make the action succeed
    #[inline]
    #[must_use]
    pub fn is_gating(&self) -> bool {
        matches!(self, Self::StepIncomplete(_))
    }
}
