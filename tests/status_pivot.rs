mod support;

use support::log_tree::LogTree;

use nightly_status::runs::{LogValidator, UNKNOWN, collect_run_records};
use nightly_status::{DEFAULT_WINDOW_DAYS, RunStatus, collect_run_statuses};
use time::macros::date;

#[test]
fn pivots_one_row_per_variant_and_host() {
    let tree = LogTree::new();
    tree.run("navajo", "20240301_001500", "5.1.0+trunk", "ok\n", true);
    tree.run("navajo", "20240229_001500", "5.1.0+trunk", "Fatal error: Not_found\n", true);
    tree.run("turing", "20240301_001500", "5.1.0+trunk", "ok\n", false);
    tree.run("navajo", "20240228_001500", "5.1.0+trunk+decouple", "ok\n", true);

    let table = collect_run_statuses(
        tree.root(),
        date!(2024 - 03 - 01),
        DEFAULT_WINDOW_DAYS,
        &LogValidator::default(),
    )
    .unwrap();

    let keys: Vec<(String, String)> = table
        .rows()
        .iter()
        .map(|row| (row.variant.clone(), row.host.clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("5.1.0+trunk".to_string(), "navajo".to_string()),
            ("5.1.0+trunk".to_string(), "turing".to_string()),
            ("5.1.0+trunk+decouple".to_string(), "navajo".to_string()),
        ]
    );
    assert_eq!(
        table.cell("5.1.0+trunk", "navajo", date!(2024 - 03 - 01)),
        Some(&[RunStatus::Success][..])
    );
    assert_eq!(
        table.cell("5.1.0+trunk", "navajo", date!(2024 - 02 - 29)),
        Some(&[RunStatus::Failed][..])
    );
    assert_eq!(
        table.cell("5.1.0+trunk", "turing", date!(2024 - 03 - 01)),
        Some(&[RunStatus::Incomplete][..])
    );
}

#[test]
fn columns_run_newest_first() {
    let tree = LogTree::new();
    tree.run("navajo", "20240226_001500", "trunk", "ok\n", true);
    tree.run("navajo", "20240301_001500", "trunk", "ok\n", true);
    tree.run("navajo", "20240228_001500", "trunk", "ok\n", true);

    let table = collect_run_statuses(
        tree.root(),
        date!(2024 - 03 - 01),
        DEFAULT_WINDOW_DAYS,
        &LogValidator::default(),
    )
    .unwrap();
    assert_eq!(
        table.dates(),
        &[date!(2024 - 03 - 01), date!(2024 - 02 - 28), date!(2024 - 02 - 26)]
    );
}

#[test]
fn unparseable_log_path_reports_unknown_host() {
    let tree = LogTree::new();
    // The dated directory sits at the root, leaving no `<kind>/<host>` prefix.
    tree.file("20240301_001500/trunk.orun.summary.log", "ok\n");

    let records = collect_run_records(
        tree.root(),
        date!(2024 - 03 - 01),
        DEFAULT_WINDOW_DAYS,
        &LogValidator::default(),
    )
    .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].host, UNKNOWN);
    assert_eq!(records[0].variant, "trunk");

    let table = collect_run_statuses(
        tree.root(),
        date!(2024 - 03 - 01),
        DEFAULT_WINDOW_DAYS,
        &LogValidator::default(),
    )
    .unwrap();
    assert_eq!(table.rows().len(), 1);
    assert_eq!(table.rows()[0].host, UNKNOWN);
}

#[test]
fn week_without_logs_gives_empty_table() {
    let tree = LogTree::new();
    tree.run("navajo", "20240220_001500", "trunk", "ok\n", true);
    tree.file("sequential/navajo/20240301_001500/0a1b2c3d/trunk.orun.summary.bench", "{}");

    let table = collect_run_statuses(
        tree.root(),
        date!(2024 - 03 - 01),
        DEFAULT_WINDOW_DAYS,
        &LogValidator::default(),
    )
    .unwrap();
    assert!(table.is_empty());
    assert!(table.dates().is_empty());
}

#[test]
fn window_length_limits_dates() {
    let tree = LogTree::new();
    tree.run("navajo", "20240301_001500", "trunk", "ok\n", true);
    tree.run("navajo", "20240229_001500", "trunk", "ok\n", true);

    let table = collect_run_statuses(
        tree.root(),
        date!(2024 - 03 - 01),
        1,
        &LogValidator::default(),
    )
    .unwrap();
    assert_eq!(table.dates(), &[date!(2024 - 03 - 01)]);
}
