use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Anything that names a calendar day. Time-of-day components are discarded.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.naive_local().date()
    }
}

impl<T: CalendarDay + ?Sized> CalendarDay for &T {
    fn calendar_day(&self) -> NaiveDate {
        (**self).calendar_day()
    }
}

/// First instant of the day: 00:00:00.000.
pub fn start_of_day(day: impl CalendarDay) -> NaiveDateTime {
    day.calendar_day().and_time(NaiveTime::MIN)
}

/// Last instant of the day: 23:59:59.999.
pub fn end_of_day(day: impl CalendarDay) -> NaiveDateTime {
    let last =
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("23:59:59.999 is a valid time");
    day.calendar_day().and_time(last)
}
