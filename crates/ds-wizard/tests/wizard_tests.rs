use ds_wizard::{
    allowed_actions, StepId, WizardAction, WizardController, WizardError, WizardOutcome,
};
use proptest::prelude::*;

fn action() -> impl Strategy<Value = WizardAction> {
    prop_oneof![
        Just(WizardAction::Next),
        Just(WizardAction::Skip),
        Just(WizardAction::Back),
        Just(WizardAction::Finish),
    ]
}

fn step() -> impl Strategy<Value = StepId> {
    prop_oneof![
        Just(StepId::CreateDataset),
        Just(StepId::FillMetadata),
        Just(StepId::CreateFolders),
        Just(StepId::AttachFiles),
    ]
}

#[derive(Debug, Clone)]
enum Input {
    Act(WizardAction),
    Complete(StepId, bool),
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        3 => action().prop_map(Input::Act),
        1 => (step(), any::<bool>()).prop_map(|(s, c)| Input::Complete(s, c)),
    ]
}

#[test]
fn next_four_times_from_fresh_wizard_never_finishes() {
    let mut wizard = WizardController::dataset_creation();
    for id in [
        StepId::CreateDataset,
        StepId::FillMetadata,
        StepId::CreateFolders,
        StepId::AttachFiles,
    ] {
        wizard.set_completed(id, true).unwrap();
    }

    for _ in 0..3 {
        assert!(matches!(wizard.next(), Ok(WizardOutcome::Moved { .. })));
    }
    // fourth Next is not offered on the last step
    assert_eq!(
        wizard.next(),
        Err(WizardError::IllegalAction {
            action: WizardAction::Next,
            step: StepId::AttachFiles
        })
    );
    assert!(!wizard.is_finished());
}

#[test]
fn skip_unavailable_at_first_and_last() {
    assert!(!allowed_actions(0, 4).contains(&WizardAction::Skip));
    assert!(!allowed_actions(3, 4).contains(&WizardAction::Skip));
}

#[test]
fn fill_metadata_can_be_skipped_after_dataset_created() {
    let mut wizard = WizardController::dataset_creation();
    wizard.set_completed(StepId::CreateDataset, true).unwrap();
    wizard.next().unwrap();

    assert!(wizard.can(WizardAction::Skip));
    assert!(!wizard.can(WizardAction::Next));
    wizard.skip().unwrap();
    assert_eq!(wizard.active_id(), StepId::CreateFolders);
    assert!(!wizard.is_completed(StepId::FillMetadata));
}

#[test]
fn view_serializes_for_renderers() {
    let view = WizardController::dataset_creation().view();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["primary_label"], "Next");
    assert_eq!(json["steps"][2]["label"], "Create Folders");
    assert_eq!(json["steps"][0]["status"], "active");
}

proptest! {
    #[test]
    fn prop_active_index_stays_in_range(inputs in prop::collection::vec(input(), 0..64)) {
        let mut wizard = WizardController::dataset_creation();
        for input in inputs {
            match input {
                Input::Act(a) => { let _ = wizard.apply(a); }
                Input::Complete(s, c) => { wizard.set_completed(s, c).unwrap(); }
            }
            prop_assert!(wizard.active_index() < wizard.len());
        }
    }

    #[test]
    fn prop_accepted_actions_are_offered(inputs in prop::collection::vec(input(), 0..64)) {
        let mut wizard = WizardController::dataset_creation();
        for input in inputs {
            match input {
                Input::Act(a) => {
                    let offered = allowed_actions(wizard.active_index(), wizard.len()).contains(&a);
                    let was_finished = wizard.is_finished();
                    if wizard.apply(a).is_ok() {
                        prop_assert!(offered);
                        prop_assert!(!was_finished);
                    }
                }
                Input::Complete(s, c) => { wizard.set_completed(s, c).unwrap(); }
            }
        }
    }

    #[test]
    fn prop_finished_is_terminal(a in action()) {
        let mut wizard = WizardController::dataset_creation();
        wizard.set_completed(StepId::CreateDataset, true).unwrap();
        wizard.set_completed(StepId::AttachFiles, true).unwrap();
        wizard.next().unwrap();
        wizard.skip().unwrap();
        wizard.skip().unwrap();
        wizard.finish().unwrap();

        let before = wizard.clone();
        prop_assert_eq!(wizard.apply(a), Err(WizardError::AlreadyFinished));
        prop_assert_eq!(wizard, before);
    }

    #[test]
    fn prop_back_preserves_completion(a in step(), c in any::<bool>()) {
        let mut wizard = WizardController::dataset_creation();
        wizard.set_completed(StepId::CreateDataset, true).unwrap();
        wizard.next().unwrap();
        wizard.set_completed(a, c).unwrap();
        let flags: Vec<bool> = wizard.steps().iter().map(|s| s.completed).collect();

        wizard.back().unwrap();
        let after: Vec<bool> = wizard.steps().iter().map(|s| s.completed).collect();
        prop_assert_eq!(flags, after);
    }
}
