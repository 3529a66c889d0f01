use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDay;

pub const DAYS_PER_WEEK: usize = 7;

/// Seven consecutive dates, Monday first. Navigation builds a new window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WeekWindow {
    days: [NaiveDate; DAYS_PER_WEEK],
}

impl WeekWindow {
    pub fn monday(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn sunday(&self) -> NaiveDate {
        self.days[DAYS_PER_WEEK - 1]
    }

    pub fn days(&self) -> &[NaiveDate; DAYS_PER_WEEK] {
        &self.days
    }

    pub fn day(&self, index: usize) -> Option<NaiveDate> {
        self.days.get(index).copied()
    }

    /// Position of `date` inside the window, if it falls in this week.
    pub fn index_of(&self, date: impl CalendarDay) -> Option<usize> {
        let date = date.calendar_day();
        self.days.iter().position(|day| *day == date)
    }

    pub fn contains(&self, date: impl CalendarDay) -> bool {
        self.index_of(date).is_some()
    }

    /// Window `weeks` weeks away. Shifts past the calendar's range stop at
    /// the first or last full week chrono can represent.
    pub fn shift_weeks(&self, weeks: i64) -> WeekWindow {
        let span = Days::new(weeks.unsigned_abs().saturating_mul(DAYS_PER_WEEK as u64));
        let target = if weeks >= 0 {
            self.monday().checked_add_days(span)
        } else {
            self.monday().checked_sub_days(span)
        };
        match target {
            Some(date) => week_of(date),
            None if weeks >= 0 => week_of(NaiveDate::MAX),
            None => week_of(NaiveDate::MIN),
        }
    }
}

/// Monday-aligned week containing `anchor`.
///
/// Anchors in the partial weeks at either end of chrono's date range get the
/// nearest full week instead.
pub fn week_of(anchor: impl CalendarDay) -> WeekWindow {
    let anchor = anchor.calendar_day();
    // Sunday = 0 .. Saturday = 6
    let day_of_week = anchor.weekday().num_days_from_sunday();
    let monday_offset = if day_of_week == 0 { 6 } else { day_of_week - 1 };
    let monday = anchor
        .checked_sub_days(Days::new(u64::from(monday_offset)))
        .filter(|monday| monday.checked_add_days(Days::new(6)).is_some())
        .unwrap_or_else(|| {
            if anchor < first_full_monday() {
                first_full_monday()
            } else {
                last_full_monday()
            }
        });

    let mut days = [monday; DAYS_PER_WEEK];
    for (slot, date) in days.iter_mut().zip(monday.iter_days()) {
        *slot = date;
    }
    WeekWindow { days }
}

fn first_full_monday() -> NaiveDate {
    let min = NaiveDate::MIN;
    let ahead = (7 - min.weekday().num_days_from_monday()) % 7;
    min.checked_add_days(Days::new(u64::from(ahead)))
        .unwrap_or(min)
}

fn last_full_monday() -> NaiveDate {
    let max = NaiveDate::MAX;
    let back = max.weekday().num_days_from_sunday() + 6;
    max.checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(max)
}

pub fn next_week(window: &WeekWindow) -> WeekWindow {
    window.shift_weeks(1)
}

pub fn previous_week(window: &WeekWindow) -> WeekWindow {
    window.shift_weeks(-1)
}
