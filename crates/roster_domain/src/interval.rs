use crate::calendar::{end_of_day, start_of_day, CalendarDay};
use crate::task::Task;

/// Whether `day` lies inside the task's inclusive span. Bounds are widened to
/// whole days, so stored times of day never matter. Inverted spans match nothing.
pub fn is_active_on(task: &Task, day: impl CalendarDay) -> bool {
    let day = start_of_day(day);
    let from = start_of_day(task.from_date);
    let to = end_of_day(task.last_date());
    from <= day && day <= to
}

/// Whether the task is active on at least one day of `[from, to]`.
pub fn overlaps_range(task: &Task, from: impl CalendarDay, to: impl CalendarDay) -> bool {
    let range_start = start_of_day(from);
    let range_end = end_of_day(to);
    let task_start = start_of_day(task.from_date);
    let task_end = end_of_day(task.last_date());
    if range_end < range_start || task_end < task_start {
        return false;
    }
    task_start <= range_end && range_start <= task_end
}
