use ds_core::{FailureChannel, FailureReport};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_latest_failure_wins(reasons in prop::collection::vec("[a-z ]{1,12}", 1..10)) {
        let channel = FailureChannel::new();
        for reason in &reasons {
            channel.report(FailureReport::new(reason.clone(), ""));
        }
        prop_assert_eq!(channel.current().map(|r| r.reason), reasons.last().cloned());
        prop_assert_eq!(channel.reported(), reasons.len() as u64);
    }

    #[test]
    fn prop_issue_body_is_url_safe(stack in "\\PC{0,64}") {
        let url = FailureReport::new("Boom", stack).issue_url("https://t/new?title=Bug");
        let body = url.split_once("&body=").map(|(_, body)| body).unwrap_or_default();
        prop_assert!(body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-._~%".contains(c)));
    }
}
