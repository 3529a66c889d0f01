use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::Task;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub day: NaiveDate,
    pub task_ids: Vec<String>,
}

impl NotificationRequest {
    /// Reminder listing the tasks still missing a report for `day`.
    pub fn unreported(day: NaiveDate, tasks: &[Task]) -> Self {
        let title = match tasks.len() {
            1 => "1 task has no report today".to_string(),
            n => format!("{n} tasks have no report today"),
        };
        let body = tasks
            .iter()
            .map(|task| {
                if task.description.is_empty() {
                    task.id.clone()
                } else {
                    format!("{} ({})", task.description, task.id)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            title,
            body,
            day,
            task_ids: tasks.iter().map(|task| task.id.clone()).collect(),
        }
    }
}

/// Receives the unreported-task reminder raised after a fresh data load.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: NotificationRequest);
}
