use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::interval::is_active_on;
use crate::shift::{normalize, Shift};
use crate::task::Task;
use crate::week::WeekWindow;

/// Tasks of one day, split by shift, plus the day's total.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub day: Vec<Task>,
    pub night: Vec<Task>,
    pub count: usize,
}

impl DayColumn {
    pub fn bucket(&self, shift: Shift) -> &[Task] {
        match shift {
            Shift::Day => &self.day,
            Shift::Night => &self.night,
        }
    }
}

/// Day × shift projection of a task list over one week.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Grid {
    window: WeekWindow,
    columns: Vec<DayColumn>,
}

impl Grid {
    pub fn window(&self) -> &WeekWindow {
        &self.window
    }

    pub fn columns(&self) -> &[DayColumn] {
        &self.columns
    }

    /// Tasks for a day index (0 = Monday) and shift; empty outside the week.
    pub fn cell(&self, day_index: usize, shift: Shift) -> &[Task] {
        self.columns
            .get(day_index)
            .map(|column| column.bucket(shift))
            .unwrap_or(&[])
    }

    pub fn count(&self, day_index: usize) -> usize {
        self.columns
            .get(day_index)
            .map(|column| column.count)
            .unwrap_or(0)
    }

    /// Sum of the per-day counts; a three-day task contributes three.
    pub fn total(&self) -> usize {
        self.columns.iter().map(|column| column.count).sum()
    }
}

/// Buckets `tasks` into the week's day × shift cells, keeping the input order in each cell.
pub fn build_grid(tasks: &[Task], window: &WeekWindow) -> Grid {
    let columns = window
        .days()
        .iter()
        .map(|date| {
            let mut column = DayColumn {
                date: *date,
                day: Vec::new(),
                night: Vec::new(),
                count: 0,
            };
            let mut seen: HashSet<&str> = HashSet::new();
            for task in tasks.iter().filter(|task| is_active_on(task, date)) {
                match normalize(&task.shift) {
                    Shift::Day => column.day.push(task.clone()),
                    Shift::Night => column.night.push(task.clone()),
                }
                seen.insert(task.id.as_str());
            }
            column.count = seen.len();
            column
        })
        .collect();

    Grid {
        window: *window,
        columns,
    }
}
