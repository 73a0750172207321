use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db, setup_test_db, sl};

#[test]
fn test_console_prompt_flow() {
    let db_path = setup_test_db("console_prompt");
    init_db(&db_path);

    let script = "\
good morning
!service Alice
start 1 Bob
start 1 Alice
end 1 Alice
!status Alice
";

    sl().args(["--db", &db_path, "--at", "2024-01-01T08:00", "console"])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Prompt #1 for Alice (currently hors service)"))
        .stdout(contains("start 1 Alice  |  end 1 Alice"))
        .stdout(contains("Only Alice can act on prompt #1."))
        .stdout(contains("Alice started their service at 2024-01-01T08:00:00."))
        .stdout(contains("This action is no longer valid."))
        .stdout(contains("Alice is en service."))
        .stdout(contains("good morning").not());
}

#[test]
fn test_console_time_queries() {
    let db_path = setup_test_db("console_queries");
    init_db(&db_path);
    for at in ["2024-01-01T08:00", "2024-01-01T10:15"] {
        sl().args(["--db", &db_path, "--at", at, "service", "Zoé"])
            .assert()
            .success();
    }

    let script = "\
!temps Zoé
!total 3 Zoé
!total x Zoé
!total 3
!history Zoé
!history Nobody
";

    sl().args(["--db", &db_path, "--at", "2024-01-01T20:00", "console"])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Zoé worked a total of 2h 15m today."))
        .stdout(contains("Zoé worked a total of 2h 15m over the last 3 day(s)."))
        .stdout(contains("Invalid day count 'x'"))
        .stdout(contains("Please mention a member and a number of days"))
        .stdout(contains("2024-01-01T10:15:00 — hors service"))
        .stdout(contains("No service history for Nobody."));
}
