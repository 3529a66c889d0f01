use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDay;

/// A work assignment as supplied by the task source. Only `from_date`, `to_date`,
/// `shift` and `report` carry scheduling meaning; the rest is for filtering and display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub area_name: String,
    #[serde(default)]
    pub task_type_name: String,
    #[serde(default)]
    pub assigner_name: String,
    #[serde(default)]
    pub assignee_name: String,
    #[serde(default)]
    pub priority: String,
    #[serde(with = "timestamp")]
    pub from_date: NaiveDateTime,
    #[serde(default, with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub shift: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportRef>,
}

impl Task {
    pub fn new(id: impl Into<String>, from_date: NaiveDateTime, shift: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            status: String::new(),
            area_name: String::new(),
            task_type_name: String::new(),
            assigner_name: String::new(),
            assignee_name: String::new(),
            priority: String::new(),
            from_date,
            to_date: None,
            shift: shift.into(),
            report: None,
        }
    }

    pub fn with_to_date(mut self, to_date: NaiveDateTime) -> Self {
        self.to_date = Some(to_date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_report(mut self, report: ReportRef) -> Self {
        self.report = Some(report);
        self
    }

    /// Final timestamp of the active span; single-day tasks end where they start.
    pub fn last_date(&self) -> NaiveDateTime {
        self.to_date.unwrap_or(self.from_date)
    }

    pub fn has_report(&self) -> bool {
        self.report.is_some()
    }
}

/// Link from a task to the follow-up record filed for one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRef {
    pub id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub task_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
}

impl Report {
    pub fn to_ref(&self) -> ReportRef {
        ReportRef {
            id: self.id.clone(),
            date: self.date,
        }
    }
}

/// Copies `tasks`, attaching the first report filed for each task on `day`.
/// A reference the task already carries survives only if it is dated `day`.
pub fn attach_reports(tasks: &[Task], reports: &[Report], day: impl CalendarDay) -> Vec<Task> {
    let day = day.calendar_day();
    tasks
        .iter()
        .map(|task| {
            let report = reports
                .iter()
                .find(|report| report.task_id == task.id && report.date == day)
                .map(Report::to_ref)
                .or_else(|| task.report.clone().filter(|carried| carried.date == day));
            Task {
                report,
                ..task.clone()
            }
        })
        .collect()
}

/// Source timestamps arrive as bare dates, local date-times or RFC 3339 strings.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        let raw = raw.trim();
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, FORMAT) {
            return Ok(stamp);
        }
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Ok(stamp);
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
            return Ok(stamp.naive_local());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|err| format!("invalid timestamp `{raw}`: {err}"))
    }
}

pub(crate) mod optional_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(stamp) => super::timestamp::serialize(stamp, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::timestamp::parse(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
