use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RosterError;
use crate::task::Task;

/// Task field a text filter can search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    Description,
    Status,
    Area,
    TaskType,
    Assigner,
    Assignee,
    Priority,
    Shift,
}

impl FilterField {
    pub const ALL: [FilterField; 8] = [
        FilterField::Description,
        FilterField::Status,
        FilterField::Area,
        FilterField::TaskType,
        FilterField::Assigner,
        FilterField::Assignee,
        FilterField::Priority,
        FilterField::Shift,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterField::Description => "description",
            FilterField::Status => "status",
            FilterField::Area => "area",
            FilterField::TaskType => "taskType",
            FilterField::Assigner => "assigner",
            FilterField::Assignee => "assignee",
            FilterField::Priority => "priority",
            FilterField::Shift => "shift",
        }
    }

    fn value_of(self, task: &Task) -> &str {
        match self {
            FilterField::Description => &task.description,
            FilterField::Status => &task.status,
            FilterField::Area => &task.area_name,
            FilterField::TaskType => &task.task_type_name,
            FilterField::Assigner => &task.assigner_name,
            FilterField::Assignee => &task.assignee_name,
            FilterField::Priority => &task.priority,
            FilterField::Shift => &task.shift,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterField {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.trim().to_ascii_lowercase().as_str() {
            "description" => FilterField::Description,
            "status" => FilterField::Status,
            "area" | "area_name" | "areaname" => FilterField::Area,
            "tasktype" | "task_type" | "task_type_name" | "tasktypename" => FilterField::TaskType,
            "assigner" | "assigner_name" | "assignername" => FilterField::Assigner,
            "assignee" | "assignee_name" | "assigneename" => FilterField::Assignee,
            "priority" => FilterField::Priority,
            "shift" => FilterField::Shift,
            _ => return Err(RosterError::UnknownFilterField(s.to_string())),
        };
        Ok(field)
    }
}

/// A selected field together with the text typed into the search box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskFilter {
    pub field: Option<FilterField>,
    pub needle: String,
}

impl TaskFilter {
    pub fn new(field: FilterField, needle: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            needle: needle.into(),
        }
    }

    /// Filter that keeps every task.
    pub fn keep_all() -> Self {
        Self {
            field: Some(FilterField::Description),
            needle: String::new(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.field.is_some() && self.needle.is_empty()
    }

    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        filter_tasks(tasks, self.field, &self.needle)
    }
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self::keep_all()
    }
}

/// Case-insensitive substring filter over one field. An empty needle keeps
/// everything; no field (`None`) keeps nothing.
pub fn filter_tasks(tasks: &[Task], field: Option<FilterField>, needle: &str) -> Vec<Task> {
    let Some(field) = field else {
        return Vec::new();
    };
    let needle = needle.to_lowercase();
    tasks
        .iter()
        .filter(|task| field.value_of(task).to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Like [`filter_tasks`], resolving the field by name. Unknown names yield an empty result.
pub fn filter_tasks_by_name(tasks: &[Task], field: &str, needle: &str) -> Vec<Task> {
    let parsed = match field.parse::<FilterField>() {
        Ok(field) => Some(field),
        Err(err) => {
            tracing::debug!(%err, "filter field not recognised");
            None
        }
    };
    filter_tasks(tasks, parsed, needle)
}
