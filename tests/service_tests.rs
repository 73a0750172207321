use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db, init_db_with_data, setup_test_db, sl, toggle_at};

#[test]
fn test_service_toggles_in_and_out() {
    let db_path = setup_test_db("service_toggle");
    init_db(&db_path);

    sl().args(["--db", &db_path, "--at", "2024-01-01T08:00", "service", "Alice"])
        .assert()
        .success()
        .stdout(contains("Alice started their service at 2024-01-01T08:00:00."));

    sl().args(["--db", &db_path, "status", "Alice"])
        .assert()
        .success()
        .stdout(contains("Alice is en service."));

    sl().args(["--db", &db_path, "--at", "2024-01-01T12:00", "service", "Alice"])
        .assert()
        .success()
        .stdout(contains("Alice ended their service at 2024-01-01T12:00:00."));

    sl().args(["--db", &db_path, "status", "Alice"])
        .assert()
        .success()
        .stdout(contains("Alice is hors service."));
}

#[test]
fn test_second_clock_in_is_rejected() {
    let db_path = setup_test_db("service_double_in");
    init_db(&db_path);

    sl().args(["--db", &db_path, "--at", "2024-01-01T08:00", "service", "Bob", "--in"])
        .assert()
        .success();

    sl().args(["--db", &db_path, "--at", "2024-01-01T08:05", "service", "Bob", "--in"])
        .assert()
        .failure()
        .stdout(contains("Bob is already on duty"));

    sl().args(["--db", &db_path, "history", "Bob"])
        .assert()
        .success()
        .stdout(contains("2024-01-01T08:00:00 — en service"))
        .stdout(contains("08:05").not());
}

#[test]
fn test_clock_out_when_off_duty_is_rejected() {
    let db_path = setup_test_db("service_out_off");
    init_db(&db_path);

    sl().args(["--db", &db_path, "service", "Carol", "--out"])
        .assert()
        .failure()
        .stdout(contains("Carol is not on duty"));
}

#[test]
fn test_today_counts_closed_and_open_shifts() {
    let db_path = setup_test_db("today_open");
    init_db(&db_path);
    toggle_at(&db_path, "Alice", "2024-01-01T08:00");
    toggle_at(&db_path, "Alice", "2024-01-01T12:00");
    toggle_at(&db_path, "Alice", "2024-01-01T14:00");

    sl().args(["--db", &db_path, "--at", "2024-01-01T15:30", "today", "Alice"])
        .assert()
        .success()
        .stdout(contains("Alice worked a total of 5h 30m today."));
}

#[test]
fn test_total_over_last_days() {
    let db_path = setup_test_db("total_days");
    init_db_with_data(&db_path);

    sl().args(["--db", &db_path, "--at", "2024-01-02T20:00", "total", "Alice", "1"])
        .assert()
        .success()
        .stdout(contains("Alice worked a total of 12h 00m over the last 1 day(s)."));

    sl().args(["--db", &db_path, "--at", "2024-01-02T20:00", "total", "Alice", "0"])
        .assert()
        .success()
        .stdout(contains("8h 00m"));
}

#[test]
fn test_total_rejects_bad_day_counts() {
    let db_path = setup_test_db("total_bad_days");
    init_db_with_data(&db_path);

    for days in ["abc", "-3"] {
        sl().args(["--db", &db_path, "total", "Alice", days])
            .assert()
            .failure()
            .stdout(contains(format!("Invalid day count '{days}'")));
    }
}

#[test]
fn test_range_over_a_month() {
    let db_path = setup_test_db("range_month");
    init_db_with_data(&db_path);

    sl().args(["--db", &db_path, "--at", "2024-03-01T00:00", "range", "Bob", "2024-01"])
        .assert()
        .success()
        .stdout(contains(
            "Bob worked a total of 1h 30m between 2024-01-01 and 2024-01-31.",
        ));

    sl().args(["--db", &db_path, "range", "Bob", "2024-02:2024-01"])
        .assert()
        .failure();
}

#[test]
fn test_history_empty_and_listed() {
    let db_path = setup_test_db("history");
    init_db_with_data(&db_path);

    sl().args(["--db", &db_path, "history", "Nobody"])
        .assert()
        .success()
        .stdout(contains("No service history for Nobody."));

    sl().args(["--db", &db_path, "history", "Alice"])
        .assert()
        .success()
        .stdout(contains("2024-01-01T08:00:00 — en service"))
        .stdout(contains("2024-01-02T17:00:00 — hors service"));
}

#[test]
fn test_subjects_lists_members() {
    let db_path = setup_test_db("subjects");
    init_db_with_data(&db_path);

    sl().args(["--db", &db_path, "--at", "2024-01-02T23:59", "subjects"])
        .assert()
        .success()
        .stdout(contains("2 member(s)"))
        .stdout(contains("Alice"))
        .stdout(contains("Bob"));
}

#[test]
fn test_names_are_sanitized() {
    let db_path = setup_test_db("sanitized");
    init_db(&db_path);

    sl().args(["--db", &db_path, "--at", "2024-01-01T08:00", "service", "Dr/Who?"])
        .assert()
        .success()
        .stdout(contains("Dr_Who_ started their service"));

    sl().args(["--db", &db_path, "service", "   "])
        .assert()
        .failure()
        .stdout(contains("empty name"));
}
