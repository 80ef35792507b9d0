use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Lifecycle state of a single task, also used for the derived state of a
/// whole death record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Processing,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Processing => "processing",
            Status::Completed => "completed",
        }
    }

    /// Predicate over the aggregated `new_tasks` / `completed_tasks` /
    /// `all_tasks` columns that selects records in this state.
    pub fn sql_predicate(&self) -> &'static str {
        match self {
            Status::Completed => "completed_tasks = all_tasks",
            Status::Processing => "(completed_tasks != all_tasks AND new_tasks = 0)",
            Status::New => "new_tasks > 0",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Status::New),
            "processing" => Ok(Status::Processing),
            "completed" => Ok(Status::Completed),
            other => Err(DomainError::validation(format!("unknown status '{}'", other))),
        }
    }
}

/// Per-state task counts for one death record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub new: i64,
    pub processing: i64,
    pub completed: i64,
}

impl StatusCounts {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Status>,
    {
        statuses.into_iter().fold(Self::default(), |mut counts, status| {
            match status {
                Status::New => counts.new += 1,
                Status::Processing => counts.processing += 1,
                Status::Completed => counts.completed += 1,
            }
            counts
        })
    }

    pub fn all(&self) -> i64 {
        self.new + self.processing + self.completed
    }

    /// Aggregate state of the record. A record without tasks counts as
    /// completed, matching the `completed_tasks = all_tasks` predicate.
    pub fn status(&self) -> Status {
        if self.completed == self.all() {
            Status::Completed
        } else if self.new == 0 {
            Status::Processing
        } else {
            Status::New
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(new: i64, processing: i64, completed: i64) -> StatusCounts {
        StatusCounts { new, processing, completed }
    }

    fn predicates(c: StatusCounts) -> [bool; 3] {
        let all = c.all();
        [
            c.new > 0,
            c.completed != all && c.new == 0,
            c.completed == all,
        ]
    }

    #[test]
    fn exactly_one_status_holds_for_every_small_task_set() {
        for n in 0..4 {
            for p in 0..4 {
                for c in 0..4 {
                    let cnt = counts(n, p, c);
                    if cnt.all() == 0 {
                        continue;
                    }
                    let holds = predicates(cnt);
                    assert_eq!(holds.iter().filter(|h| **h).count(), 1, "{:?}", cnt);

                    let expected = match holds {
                        [true, _, _] => Status::New,
                        [_, true, _] => Status::Processing,
                        _ => Status::Completed,
                    };
                    assert_eq!(cnt.status(), expected, "{:?}", cnt);
                }
            }
        }
    }

    #[test]
    fn any_new_task_keeps_record_new() {
        assert_eq!(counts(1, 3, 5).status(), Status::New);
    }

    #[test]
    fn started_but_unfinished_is_processing() {
        assert_eq!(counts(0, 1, 4).status(), Status::Processing);
    }

    #[test]
    fn all_done_is_completed() {
        assert_eq!(counts(0, 0, 3).status(), Status::Completed);
    }

    #[test]
    fn empty_task_set_is_vacuously_completed() {
        assert_eq!(StatusCounts::default().status(), Status::Completed);
    }

    #[test]
    fn counts_from_statuses() {
        let c = StatusCounts::from_statuses([Status::New, Status::Completed, Status::Completed]);
        assert_eq!(c, counts(1, 0, 2));
        assert_eq!(c.all(), 3);
    }

    #[test]
    fn status_round_trips_through_text() {
        for s in [Status::New, Status::Processing, Status::Completed] {
            assert_eq!(s.as_str().parse::<Status>().unwrap(), s);
        }
        assert!("done".parse::<Status>().is_err());
    }
}
