//! Weekly shift roster: projects dated work assignments onto a Monday-aligned
//! day × shift grid and finds today's assignments that still lack a report.

pub mod calendar;
pub mod error;
pub mod filter;
pub mod grid;
pub mod interval;
pub mod notifications;
pub mod reminder;
pub mod service;
pub mod shift;
pub mod store;
pub mod task;
pub mod week;

pub use crate::error::{Result, RosterError};
pub use crate::filter::{filter_tasks, filter_tasks_by_name, FilterField, TaskFilter};
pub use crate::grid::{build_grid, DayColumn, Grid};
pub use crate::interval::is_active_on;
pub use crate::reminder::find_unreported;
pub use crate::service::{RosterService, RosterServiceBuilder, WeekView};
pub use crate::shift::{normalize, Shift};
pub use crate::store::{JsonTaskStore, TaskSource};
pub use crate::task::{attach_reports, Report, ReportRef, Task};
pub use crate::week::{next_week, previous_week, week_of, WeekWindow};
