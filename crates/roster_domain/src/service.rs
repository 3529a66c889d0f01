use std::path::Path;

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    calendar::CalendarDay,
    error::{Result, RosterError},
    filter::TaskFilter,
    grid::{build_grid, Grid},
    notifications::{NotificationRequest, NotificationSink},
    reminder::find_unreported,
    store::{JsonTaskStore, TaskSource},
    task::{attach_reports, Task},
    week::{week_of, WeekWindow},
};

/// Everything a week screen needs for one render.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WeekView {
    pub window: WeekWindow,
    pub grid: Grid,
    pub unreported: Option<Vec<Task>>,
    pub today_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReminderState {
    #[default]
    Idle,
    DataLoaded,
    NotificationPending,
    NotificationShown,
}

/// Per-load notification lifecycle. Each load restarts the cycle; a pending
/// reminder can be shown once.
#[derive(Debug, Default)]
pub struct ReminderCycle {
    state: ReminderState,
    pending: Option<NotificationRequest>,
}

impl ReminderCycle {
    pub fn state(&self) -> ReminderState {
        self.state
    }

    /// Records a fresh data load. Returns true when a reminder is now pending.
    pub fn load(&mut self, today: NaiveDate, unreported: Option<&[Task]>) -> bool {
        self.state = ReminderState::DataLoaded;
        match unreported {
            Some(tasks) if !tasks.is_empty() => {
                self.pending = Some(NotificationRequest::unreported(today, tasks));
                self.state = ReminderState::NotificationPending;
                true
            }
            _ => {
                self.pending = None;
                self.state = ReminderState::Idle;
                false
            }
        }
    }

    pub fn pending(&self) -> Option<&NotificationRequest> {
        self.pending.as_ref()
    }

    /// Hands out the pending reminder and moves to `NotificationShown`.
    /// Returns `None` unless a reminder is pending.
    pub fn mark_shown(&mut self) -> Option<NotificationRequest> {
        if self.state != ReminderState::NotificationPending {
            return None;
        }
        self.state = ReminderState::NotificationShown;
        self.pending.take()
    }
}

pub struct RosterService {
    source: Box<dyn TaskSource>,
    notification_sink: Option<Box<dyn NotificationSink>>,
    reminder: Mutex<ReminderCycle>,
}

pub struct RosterServiceBuilder {
    source: Option<Box<dyn TaskSource>>,
    notification_sink: Option<Box<dyn NotificationSink>>,
}

impl RosterServiceBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            notification_sink: None,
        }
    }

    pub fn with_source(mut self, source: Box<dyn TaskSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Uses a [`JsonTaskStore`] over the given roots as the task source.
    pub fn with_json_roots<I, P>(self, roots: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let store = JsonTaskStore::open(roots)?;
        Ok(self.with_source(Box::new(store)))
    }

    pub fn with_notification_sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.notification_sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<RosterService> {
        let source = self.source.ok_or(RosterError::NoTaskSource)?;
        Ok(RosterService {
            source,
            notification_sink: self.notification_sink,
            reminder: Mutex::new(ReminderCycle::default()),
        })
    }
}

impl Default for RosterServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterService {
    pub fn builder() -> RosterServiceBuilder {
        RosterServiceBuilder::new()
    }

    /// Loads the week containing `anchor` and projects it. Reports filed for
    /// `today` are attached before the reminder runs; the filter only narrows the grid.
    #[instrument(skip_all)]
    pub fn week_view(
        &self,
        anchor: impl CalendarDay,
        filter: &TaskFilter,
        today: impl CalendarDay,
    ) -> Result<WeekView> {
        let window = week_of(anchor);
        let today = today.calendar_day();
        tracing::debug!(monday = %window.monday(), %today, "loading week");

        let fetched = self.source.fetch_tasks(window.monday(), window.sunday())?;
        let reports = self.source.reports_on(today)?;
        let tasks = attach_reports(&fetched, &reports, today);

        let visible = filter.apply(&tasks);
        let grid = build_grid(&visible, &window);
        let unreported = find_unreported(&tasks, today);

        Ok(WeekView {
            window,
            grid,
            unreported,
            today_index: window.index_of(today),
        })
    }

    /// [`Self::week_view`] plus the reminder cycle: a pending reminder is handed
    /// to the notification sink once per load.
    pub fn refresh(
        &self,
        anchor: impl CalendarDay,
        filter: &TaskFilter,
        today: impl CalendarDay,
    ) -> Result<WeekView> {
        let today = today.calendar_day();
        let view = self.week_view(anchor, filter, today)?;

        let mut cycle = self.reminder.lock();
        if cycle.load(today, view.unreported.as_deref()) {
            if let Some(sink) = &self.notification_sink {
                if let Some(request) = cycle.mark_shown() {
                    tracing::info!(count = request.task_ids.len(), "unreported task reminder");
                    sink.notify(request);
                }
            }
        }
        Ok(view)
    }

    pub fn reminder_state(&self) -> ReminderState {
        self.reminder.lock().state()
    }

    /// Shows a reminder left pending because no sink was attached at load time.
    pub fn take_pending_reminder(&self) -> Option<NotificationRequest> {
        self.reminder.lock().mark_shown()
    }
}
