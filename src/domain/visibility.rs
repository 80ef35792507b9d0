use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::role::Role;
use super::status::{Status, StatusCounts};

/// One task as shown inside a death-record listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub task_id: i64,
    pub task_type_id: i64,
    pub name: String,
    pub status: Status,
    pub start_date: Option<NaiveDate>,
    pub complete_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_rejected: bool,
    pub reason: Option<String>,
    #[serde(default)]
    pub is_editable: bool,
}

/// Task types a role may act on.
#[derive(Debug, Clone, Default)]
pub struct Authorization {
    actionable: HashSet<i64>,
}

impl Authorization {
    pub fn new<I: IntoIterator<Item = i64>>(task_type_ids: I) -> Self {
        Self {
            actionable: task_type_ids.into_iter().collect(),
        }
    }

    pub fn can_act_on(&self, task_type_id: i64) -> bool {
        self.actionable.contains(&task_type_id)
    }
}

/// Filters and flags a record's tasks for one viewer.
///
/// Actionable tasks are kept and marked editable. Everything else is kept
/// read-only for Sachiv and Sahayak and dropped for every other role.
pub fn project_tasks(role: &Role, tasks: Vec<TaskView>, auth: &Authorization) -> Vec<TaskView> {
    tasks
        .into_iter()
        .filter_map(|mut task| {
            if auth.can_act_on(task.task_type_id) {
                task.is_editable = true;
                Some(task)
            } else if role.sees_all_tasks() {
                task.is_editable = false;
                Some(task)
            } else {
                None
            }
        })
        .collect()
}

/// Task types that bound the listing lane for a role: every type for field
/// roles, only the authorized ones for oversight roles.
pub fn display_types(role: &Role, all_types: &[i64], auth: &Authorization) -> Vec<i64> {
    if role.is_field_role() {
        all_types.to_vec()
    } else {
        all_types
            .iter()
            .copied()
            .filter(|id| auth.can_act_on(*id))
            .collect()
    }
}

/// Aggregate status over whatever tasks are in view.
pub fn aggregate_status(tasks: &[TaskView]) -> Status {
    StatusCounts::from_statuses(tasks.iter().map(|t| t.status)).status()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, type_id: i64, status: Status) -> TaskView {
        TaskView {
            task_id: id,
            task_type_id: type_id,
            name: format!("type-{}", type_id),
            status,
            start_date: None,
            complete_date: None,
            is_rejected: false,
            reason: None,
            is_editable: false,
        }
    }

    fn sample_tasks() -> Vec<TaskView> {
        vec![
            task(1, 10, Status::New),
            task(2, 20, Status::Processing),
            task(3, 30, Status::Completed),
        ]
    }

    #[test]
    fn actionable_tasks_are_editable() {
        let auth = Authorization::new([20]);
        let out = project_tasks(&Role::Sdm, sample_tasks(), &auth);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].task_id, 2);
        assert!(out[0].is_editable);
    }

    #[test]
    fn sachiv_keeps_non_actionable_tasks_read_only() {
        let auth = Authorization::new([10]);
        let out = project_tasks(&Role::Sachiv, sample_tasks(), &auth);
        assert_eq!(out.len(), 3);
        let editable: Vec<_> = out.iter().map(|t| t.is_editable).collect();
        assert_eq!(editable, vec![true, false, false]);
    }

    #[test]
    fn lekhpal_only_sees_its_lane() {
        let auth = Authorization::new([30]);
        let out = project_tasks(&Role::Lekhpal, sample_tasks(), &auth);
        assert_eq!(out.iter().map(|t| t.task_id).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn empty_task_list_projects_to_empty() {
        let out = project_tasks(&Role::Sahayak, vec![], &Authorization::default());
        assert!(out.is_empty());
    }

    #[test]
    fn field_roles_display_every_type() {
        let auth = Authorization::new([20]);
        let all = [10, 20, 30];
        assert_eq!(display_types(&Role::Sachiv, &all, &auth), vec![10, 20, 30]);
        assert_eq!(display_types(&Role::Lekhpal, &all, &auth), vec![10, 20, 30]);
    }

    #[test]
    fn oversight_roles_display_only_authorized_types() {
        let auth = Authorization::new([20, 99]);
        let all = [10, 20, 30];
        assert_eq!(display_types(&Role::Sdm, &all, &auth), vec![20]);
        assert_eq!(display_types(&Role::District("DM".into()), &all, &auth), vec![20]);
    }

    #[test]
    fn aggregate_over_projected_tasks() {
        assert_eq!(aggregate_status(&sample_tasks()), Status::New);
        assert_eq!(aggregate_status(&[task(1, 1, Status::Completed)]), Status::Completed);
    }

    #[test]
    fn deserializes_aggregated_json() {
        let raw = r#"{"taskId":7,"taskTypeId":2,"name":"Verification","status":"processing",
                      "startDate":"2024-03-01","completeDate":null,"isRejected":false,"reason":null}"#;
        let t: TaskView = serde_json::from_str(raw).unwrap();
        assert_eq!(t.status, Status::Processing);
        assert_eq!(t.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(!t.is_editable);
    }
}
