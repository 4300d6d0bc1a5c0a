//! Pure transition rules
//!
//! Positions are step indices in `[0, len - 1]`. The first step has no Skip
//! or Back; the last step offers Finish instead of Next and has no Skip.

use serde::{Deserialize, Serialize};

/// Wizard button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardAction {
    /// Advance after completing the step
    Next,
    /// Advance without completing the step
    Skip,
    /// Return to the previous step
    Back,
    /// Terminal completion on the last step
    Finish,
}

/// Actions available at `index` in a wizard of `len` steps
#[must_use]
pub fn allowed_actions(index: usize, len: usize) -> Vec<WizardAction> {
    if index >= len {
        return Vec::new();
    }

    let last = len - 1;
    let mut actions = Vec::with_capacity(3);
    if index < last {
        actions.push(WizardAction::Next);
    } else {
        actions.push(WizardAction::Finish);
    }
    if index > 0 && index < last {
        actions.push(WizardAction::Skip);
    }
    if index > 0 {
        actions.push(WizardAction::Back);
    }
    actions
}

/// Is `action` structurally allowed at `index`
#[inline]
#[must_use]
pub fn is_allowed(index: usize, len: usize, action: WizardAction) -> bool {
    allowed_actions(index, len).contains(&action)
}

/// Index reached by a structurally allowed action; `None` for Finish
#[must_use]
pub fn target_index(index: usize, action: WizardAction) -> Option<usize> {
    match action {
        WizardAction::Next | WizardAction::Skip => Some(index + 1),
        WizardAction::Back => index.checked_sub(1),
        WizardAction::Finish => None,
    }
}

/// Does the action require the active step to be complete
#[inline]
#[must_use]
pub fn requires_completion(action: WizardAction) -> bool {
    matches!(action, WizardAction::Next | WizardAction::Finish)
}
