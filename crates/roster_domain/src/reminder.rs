use crate::calendar::CalendarDay;
use crate::interval::is_active_on;
use crate::task::Task;

/// Tasks active on `today` that have no report attached. `None` means there is
/// nothing to remind about; a returned list is never empty.
pub fn find_unreported(tasks: &[Task], today: impl CalendarDay) -> Option<Vec<Task>> {
    let today = today.calendar_day();
    let unreported: Vec<Task> = tasks
        .iter()
        .filter(|task| is_active_on(task, today) && !task.has_report())
        .cloned()
        .collect();

    if unreported.is_empty() {
        None
    } else {
        Some(unreported)
    }
}
