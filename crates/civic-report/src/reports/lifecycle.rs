//! Legal status transitions and the policy governing their enforcement.
//!
//! The table is total: every `(from, to)` pair is either allowed or rejected
//! with a named reason. The permissive policy accepts any target state and
//! exists as an administrator override.

use serde::{Deserialize, Serialize};

use super::domain::Status;

/// Whether out-of-order transitions are rejected or accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Enforce the forward-only table below. Default.
    Strict,
    /// Accept any of the four states at any time (administrator override).
    Permissive,
}

/// Targets reachable from each state under the strict policy. `Assigned`
/// may return to `Submitted` (reopen an assignment) and `InProgress` may
/// fall back to `Assigned` (work handed to another department); `Resolved`
/// is terminal.
pub const fn allowed_targets(from: Status) -> &'static [Status] {
    match from {
        Status::Submitted => &[Status::Assigned],
        Status::Assigned => &[Status::InProgress, Status::Submitted],
        Status::InProgress => &[Status::Resolved, Status::Assigned],
        Status::Resolved => &[],
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot move a report from '{}' to '{}'", from.label(), to.label())]
    IllegalTransition { from: Status, to: Status },
}

/// Validate a requested transition under the given policy.
pub fn check_transition(
    policy: TransitionPolicy,
    from: Status,
    to: Status,
) -> Result<(), LifecycleError> {
    match policy {
        TransitionPolicy::Permissive => Ok(()),
        TransitionPolicy::Strict => {
            if allowed_targets(from).contains(&to) {
                Ok(())
            } else {
                Err(LifecycleError::IllegalTransition { from, to })
            }
        }
    }
}

/// Message recorded on the ledger when a status changes.
pub fn status_change_message(to: Status) -> String {
    format!("Status changed to {}", to.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_total_over_all_pairs() {
        for from in Status::ordered() {
            for to in Status::ordered() {
                let verdict = check_transition(TransitionPolicy::Strict, from, to);
                let expected = allowed_targets(from).contains(&to);
                assert_eq!(verdict.is_ok(), expected, "({from:?} -> {to:?})");
            }
        }
    }

    #[test]
    fn resolved_is_terminal_under_strict_policy() {
        for to in Status::ordered() {
            let verdict = check_transition(TransitionPolicy::Strict, Status::Resolved, to);
            assert_eq!(
                verdict,
                Err(LifecycleError::IllegalTransition {
                    from: Status::Resolved,
                    to,
                })
            );
        }
    }

    #[test]
    fn permissive_policy_accepts_regressions() {
        assert!(check_transition(
            TransitionPolicy::Permissive,
            Status::Resolved,
            Status::Submitted
        )
        .is_ok());
    }

    #[test]
    fn status_change_message_names_the_target() {
        assert_eq!(
            status_change_message(Status::InProgress),
            "Status changed to in progress"
        );
        assert!(status_change_message(Status::Resolved).contains("resolved"));
    }
}
