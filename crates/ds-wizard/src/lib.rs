//! Dataset Workbench creation wizard
//!
//! A linear wizard over an ordered list of steps. Each step offers a subset
//! of Next, Skip, Back and Finish:
//!
//! - first step: Next
//! - middle steps: Next, Skip, Back
//! - last step: Finish, Back
//!
//! Next and Finish only succeed once the active step's sub-form reports
//! completion. Finish is terminal.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod controller;
mod error;
mod machine;
mod step;

pub use controller::{StepStatus, StepView, WizardController, WizardOutcome, WizardView};
pub use error::WizardError;
pub use machine::{allowed_actions, is_allowed, requires_completion, target_index, WizardAction};
pub use step::{dataset_creation_steps, StepId, WizardStep};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
