use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::status::Status;

/// Mutable portion of a task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskState {
    pub status: Status,
    pub start_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub is_rejected: bool,
    pub reason: Option<String>,
}

impl TaskState {
    pub fn new_task() -> Self {
        Self {
            status: Status::New,
            start_date: None,
            completed_date: None,
            is_rejected: false,
            reason: None,
        }
    }

    /// new -> processing
    pub fn start_processing(&self, now: DateTime<Utc>) -> Result<TaskState, DomainError> {
        if self.status != Status::New {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                action: "start processing",
            });
        }
        Ok(TaskState {
            status: Status::Processing,
            start_date: Some(now),
            ..self.clone()
        })
    }

    /// processing -> completed. Completing twice is an error so the first
    /// completion date is never overwritten.
    pub fn complete(&self, now: DateTime<Utc>) -> Result<TaskState, DomainError> {
        if self.status != Status::Processing {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                action: "complete",
            });
        }
        Ok(TaskState {
            status: Status::Completed,
            completed_date: Some(now),
            ..self.clone()
        })
    }

    /// {new, processing} -> completed, flagged as rejected.
    pub fn reject(&self, reason: &str, now: DateTime<Utc>) -> Result<TaskState, DomainError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::validation("rejection reason cannot be empty"));
        }
        if self.status == Status::Completed {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                action: "reject",
            });
        }
        Ok(TaskState {
            status: Status::Completed,
            completed_date: Some(now),
            is_rejected: true,
            reason: Some(reason.to_string()),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn happy_path_sets_dates() {
        let started = TaskState::new_task().start_processing(at(9)).unwrap();
        assert_eq!(started.status, Status::Processing);
        assert_eq!(started.start_date, Some(at(9)));

        let done = started.complete(at(11)).unwrap();
        assert_eq!(done.status, Status::Completed);
        assert_eq!(done.start_date, Some(at(9)));
        assert_eq!(done.completed_date, Some(at(11)));
        assert!(!done.is_rejected);
    }

    #[test]
    fn cannot_complete_a_new_task() {
        let err = TaskState::new_task().complete(at(9)).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition { from: Status::New, action: "complete" }
        );
    }

    #[test]
    fn completing_twice_is_an_error() {
        let done = TaskState::new_task()
            .start_processing(at(9))
            .and_then(|s| s.complete(at(10)))
            .unwrap();
        assert!(matches!(
            done.complete(at(12)),
            Err(DomainError::InvalidTransition { from: Status::Completed, .. })
        ));
    }

    #[test]
    fn cannot_start_twice() {
        let started = TaskState::new_task().start_processing(at(9)).unwrap();
        assert!(started.start_processing(at(10)).is_err());
    }

    #[test]
    fn reject_from_new_and_processing() {
        let from_new = TaskState::new_task().reject("duplicate entry", at(9)).unwrap();
        assert_eq!(from_new.status, Status::Completed);
        assert!(from_new.is_rejected);
        assert_eq!(from_new.reason.as_deref(), Some("duplicate entry"));
        assert_eq!(from_new.completed_date, Some(at(9)));

        let processing = TaskState::new_task().start_processing(at(8)).unwrap();
        let rejected = processing.reject("missing documents", at(9)).unwrap();
        assert!(rejected.is_rejected);
        assert_eq!(rejected.start_date, Some(at(8)));
    }

    #[test]
    fn reject_requires_reason_and_leaves_state_untouched() {
        let state = TaskState::new_task().start_processing(at(8)).unwrap();
        let before = state.clone();
        assert!(matches!(state.reject("   ", at(9)), Err(DomainError::Validation(_))));
        assert_eq!(state, before);
    }

    #[test]
    fn rejected_task_is_terminal() {
        let rejected = TaskState::new_task().reject("wrong village", at(9)).unwrap();
        assert!(rejected.reject("again", at(10)).is_err());
        assert!(rejected.start_processing(at(10)).is_err());
    }
}
