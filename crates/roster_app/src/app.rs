use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use roster_domain::{
    notifications::{NotificationRequest, NotificationSink},
    DayColumn, FilterField, RosterService, Shift, Task, TaskFilter, WeekView, week_of,
};
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) roots: Vec<PathBuf>,
    pub(crate) anchor: Option<NaiveDate>,
    pub(crate) today: Option<NaiveDate>,
    pub(crate) week_offset: i64,
    pub(crate) filter: TaskFilter,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `ROSTER_*` variables resolved through `lookup`.
    /// Values that fail to parse are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(root) = lookup("ROSTER_ROOT") {
            config.push_root(PathBuf::from(root));
        }
        if let Some(list) = lookup("ROSTER_ROOTS") {
            for path in std::env::split_paths(&list) {
                config.push_root(path);
            }
        }
        if let Some(raw) = lookup("ROSTER_ANCHOR") {
            config.anchor = parse_date("ROSTER_ANCHOR", &raw);
        }
        if let Some(raw) = lookup("ROSTER_TODAY") {
            config.today = parse_date("ROSTER_TODAY", &raw);
        }
        if let Some(raw) = lookup("ROSTER_WEEK_OFFSET") {
            match raw.trim().parse::<i64>() {
                Ok(value) if value.unsigned_abs() <= max_week_offset() => {
                    config.week_offset = value
                }
                Ok(value) => warn!(value, "ROSTER_WEEK_OFFSET is past the calendar range; ignoring"),
                Err(err) => warn!(value = %raw, %err, "ignoring ROSTER_WEEK_OFFSET"),
            }
        }
        if let Some(raw) = lookup("ROSTER_FILTER_FIELD") {
            // An unknown field keeps nothing, same as the library filter.
            config.filter.field = match raw.parse::<FilterField>() {
                Ok(field) => Some(field),
                Err(err) => {
                    warn!(%err, "filter will match no tasks");
                    None
                }
            };
        }
        if let Some(needle) = lookup("ROSTER_FILTER_TEXT") {
            config.filter.needle = needle;
        }
        Ok(config)
    }

    pub(crate) fn push_root(&mut self, path: PathBuf) {
        if path.as_os_str().is_empty() || self.roots.contains(&path) {
            return;
        }
        info!(path = %path.display(), "registering root");
        self.roots.push(path);
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            anchor: None,
            today: None,
            week_offset: 0,
            filter: TaskFilter::default(),
        }
    }
}

/// Weeks spanned by chrono's whole date range.
fn max_week_offset() -> u64 {
    NaiveDate::MAX
        .signed_duration_since(NaiveDate::MIN)
        .num_weeks()
        .unsigned_abs()
}

fn parse_date(key: &str, raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(key, value = %raw, %err, "ignoring unparseable date");
            None
        }
    }
}

/// Surfaces reminders through the log.
struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, notification: NotificationRequest) {
        warn!(
            day = %notification.day,
            tasks = ?notification.task_ids,
            "{}",
            notification.title
        );
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    if config.roots.is_empty() {
        warn!("no task roots configured; set ROSTER_ROOT or ROSTER_ROOTS");
    }
    let today = config.today.unwrap_or_else(|| Local::now().date_naive());
    let anchor = config.anchor.unwrap_or(today);
    let window = week_of(anchor).shift_weeks(config.week_offset);

    let service = RosterService::builder()
        .with_json_roots(&config.roots)
        .context("loading task files")?
        .with_notification_sink(Box::new(LogNotificationSink))
        .build()?;

    let view = service
        .refresh(window.monday(), &config.filter, today)
        .context("building week view")?;
    info!(monday = %view.window.monday(), tasks = view.grid.total(), "week loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_week(&mut out, &view, today)?;
    out.flush()?;
    Ok(())
}

pub fn render_week(out: &mut impl Write, view: &WeekView, today: NaiveDate) -> io::Result<()> {
    writeln!(
        out,
        "Week of {} to {}",
        view.window.monday().format("%Y-%m-%d"),
        view.window.sunday().format("%Y-%m-%d")
    )?;
    for column in view.grid.columns() {
        writeln!(out)?;
        render_day(out, column, today)?;
    }

    writeln!(out)?;
    match &view.unreported {
        Some(tasks) => {
            writeln!(out, "Missing reports for {}:", today.format("%Y-%m-%d"))?;
            for task in tasks {
                writeln!(out, "  - {}", format_task(task))?;
            }
        }
        None => writeln!(out, "All of today's tasks are reported.")?,
    }
    Ok(())
}

fn render_day(out: &mut impl Write, column: &DayColumn, today: NaiveDate) -> io::Result<()> {
    writeln!(out, "{}", format_day_heading(column.date, today, column.count))?;
    for shift in Shift::ALL {
        let tasks = column.bucket(shift);
        if tasks.is_empty() {
            continue;
        }
        writeln!(out, "  {shift}:")?;
        for task in tasks {
            writeln!(out, "    - {}", format_task(task))?;
        }
    }
    Ok(())
}

fn format_day_heading(date: NaiveDate, today: NaiveDate, count: usize) -> String {
    let label = if date == today { " (today)" } else { "" };
    let noun = if count == 1 { "task" } else { "tasks" };
    format!("{}{} | {} {}", date.format("%a %Y-%m-%d"), label, count, noun)
}

fn format_task(task: &Task) -> String {
    let mut line = task.id.clone();
    if !task.description.is_empty() {
        line.push(' ');
        line.push_str(&task.description);
    }
    if !task.assignee_name.is_empty() {
        line.push_str(" @");
        line.push_str(&task.assignee_name);
    }
    if task.has_report() {
        line.push_str(" [reported]");
    }
    line
}
