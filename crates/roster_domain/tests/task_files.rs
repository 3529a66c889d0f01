use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use roster_domain::{
    find_unreported, store::TaskSource, JsonTaskStore, RosterService, Shift, TaskFilter,
};
use tempfile::tempdir;

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write fixture");
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

const WEEK_FILE: &str = r#"{
  "tasks": [
    {"id": "T1", "description": "Calibrate scales", "fromDate": "2025-03-10T07:00:00", "shift": "Day Shift"},
    {"id": "T2", "description": "Boiler watch", "fromDate": "2025-03-09T22:00:00", "toDate": "2025-03-11T06:00:00", "shift": "Night"},
    {"id": "T3", "description": "Inventory count", "fromDate": "2025-03-15", "toDate": "2025-03-20", "shift": "day"}
  ],
  "reports": [
    {"id": "R1", "taskId": "T1", "date": "2025-03-10", "note": "scales within tolerance"}
  ]
}"#;

#[test]
fn reference_week_end_to_end() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path();
    write_file(&root.join("site-a/week11.json"), WEEK_FILE);
    write_file(
        &root.join("site-b/april.json"),
        r#"[{"id": "T9", "fromDate": "2025-04-01", "shift": "Day"}]"#,
    );
    write_file(&root.join("README.md"), "not a task file");

    let service = RosterService::builder()
        .with_json_roots([root])
        .expect("open store")
        .build()
        .expect("build service");

    let view = service
        .week_view(date(3, 13), &TaskFilter::default(), date(3, 10))
        .expect("week view");

    assert_eq!(view.window.monday(), date(3, 10));
    assert_eq!(view.window.sunday(), date(3, 16));

    let day0: Vec<&str> = view.grid.cell(0, Shift::Day).iter().map(|t| t.id.as_str()).collect();
    let night0: Vec<&str> = view.grid.cell(0, Shift::Night).iter().map(|t| t.id.as_str()).collect();
    let day5: Vec<&str> = view.grid.cell(5, Shift::Day).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(day0, vec!["T1"]);
    assert_eq!(night0, vec!["T2"]);
    assert_eq!(view.grid.count(0), 2);
    assert_eq!(day5, vec!["T3"]);
    assert!(view
        .grid
        .columns()
        .iter()
        .all(|column| column.day.iter().chain(&column.night).all(|t| t.id != "T9")));

    let unreported = view.unreported.expect("T2 has no report");
    let ids: Vec<&str> = unreported.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["T2"]);
}

#[test]
fn store_reload_picks_up_new_reports() {
    let temp = tempdir().expect("tempdir");
    let file = temp.path().join("roster.json");
    write_file(&file, WEEK_FILE);

    let store = JsonTaskStore::open([&file]).expect("open store");
    assert_eq!(store.list_files(), vec![file.clone()]);

    let tasks = store.fetch_tasks(date(3, 10), date(3, 16)).expect("fetch");
    let reports = store.reports_on(date(3, 11)).expect("reports");
    let attached = roster_domain::attach_reports(&tasks, &reports, date(3, 11));
    let due = find_unreported(&attached, date(3, 11)).expect("T2 due on 03-11");
    assert_eq!(due.len(), 1);

    let updated = WEEK_FILE.replace(
        r#""reports": ["#,
        r#""reports": [
    {"id": "R2", "taskId": "T2", "date": "2025-03-11"},"#,
    );
    write_file(&file, &updated);
    store.reload_all().expect("reload");

    let reports = store.reports_on(date(3, 11)).expect("reports");
    let attached = roster_domain::attach_reports(&tasks, &reports, date(3, 11));
    assert!(find_unreported(&attached, date(3, 11)).is_none());
}

#[test]
fn fetch_returns_only_overlapping_tasks_once() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path();
    write_file(&root.join("a.json"), WEEK_FILE);
    write_file(
        &root.join("b.json"),
        r#"[
            {"id": "T2", "fromDate": "2025-03-10", "shift": "Day"},
            {"id": "T4", "fromDate": "2025-03-16T23:00:00", "shift": "Night"}
        ]"#,
    );

    let store = JsonTaskStore::open([root]).expect("open store");
    let tasks = store.fetch_tasks(date(3, 12), date(3, 16)).expect("fetch");
    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["T3", "T4"]);

    let tasks = store.fetch_tasks(date(3, 10), date(3, 10)).expect("fetch");
    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["T1", "T2"]);
}

#[test]
fn malformed_file_fails_reload_and_keeps_previous_data() {
    let temp = tempdir().expect("tempdir");
    let file = temp.path().join("roster.json");
    write_file(&file, WEEK_FILE);
    let store = JsonTaskStore::open([&file]).expect("open store");

    write_file(&file, "{ not json");
    let err = store.reload_all().unwrap_err();
    assert!(err.to_string().contains("roster.json"));

    let tasks = store.fetch_tasks(date(3, 10), date(3, 16)).expect("fetch");
    assert_eq!(tasks.len(), 3);
}

#[test]
fn missing_root_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let missing = temp.path().join("nowhere");
    assert!(JsonTaskStore::open([&missing]).is_err());
}

#[test]
fn add_root_extends_the_loaded_files() {
    let temp = tempdir().expect("tempdir");
    let first = temp.path().join("first.json");
    let second = temp.path().join("more/second.json");
    write_file(&first, WEEK_FILE);
    write_file(
        &second,
        r#"[{"id": "T5", "fromDate": "2025-03-12", "shift": "Evening"}]"#,
    );

    let mut store = JsonTaskStore::open([&first]).expect("open store");
    store.add_root(temp.path().join("more")).expect("add root");
    store.add_root(temp.path().join("more")).expect("re-adding is a no-op");
    assert_eq!(store.roots().len(), 2);
    assert_eq!(store.list_files().len(), 2);

    let tasks = store.fetch_tasks(date(3, 12), date(3, 12)).expect("fetch");
    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["T5"]);
}

#[test]
fn stale_carried_report_does_not_hide_todays_reminder() {
    let temp = tempdir().expect("tempdir");
    let file = temp.path().join("carried.json");
    write_file(
        &file,
        r#"[{"id": "T2", "fromDate": "2025-03-09", "toDate": "2025-03-11", "shift": "Night",
             "report": {"id": "R0", "date": "2025-03-09"}}]"#,
    );

    let service = RosterService::builder()
        .with_json_roots([&file])
        .expect("open store")
        .build()
        .expect("build service");

    let view = service
        .week_view(date(3, 10), &TaskFilter::default(), date(3, 10))
        .expect("week view");
    let due = view.unreported.expect("yesterday's report does not cover today");
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, "T2");
}
