mod support;

use std::process::Command;

use support::{log_tree::LogTree, status_env::StatusEnvGuard};

use nightly_status::app_dirs::{self, APP_DIR_NAME, CONFIG_HOME_ENV};
use nightly_status::config::{self, CONFIG_FILE_NAME};
use nightly_status::{LogSource, Reporter};
use time::macros::date;

fn nightly_status(config_home: &std::path::Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_nightly-status"));
    command.env(CONFIG_HOME_ENV, config_home).env("RUST_LOG", "warn");
    command
}

#[test]
fn renders_text_table_for_local_root() {
    let tree = LogTree::new();
    tree.run("navajo", "20240301_001500", "5.1.0+trunk", "ok\n", true);
    tree.run("turing", "20240229_001500", "5.1.0+trunk", "Error: build failed\n", true);
    let home = tempfile::tempdir().unwrap();

    let output = nightly_status(home.path())
        .args(["render", "--format", "text", "--date", "2024-03-01", "--root"])
        .arg(tree.root())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected = "\
variant      host    2024-03-01  2024-02-29
5.1.0+trunk  navajo  success     -
5.1.0+trunk  turing  -           failed
";
    assert_eq!(stdout, expected);
}

#[test]
fn writes_html_page_to_output_file() {
    let tree = LogTree::new();
    tree.run("navajo", "20240301_001500", "5.1.0+trunk", "ok\n", true);
    let home = tempfile::tempdir().unwrap();
    let page = home.path().join("site/index.html");

    let status = nightly_status(home.path())
        .args(["render", "--date", "2024-03-01", "--output"])
        .arg(&page)
        .arg("--root")
        .arg(tree.root())
        .status()
        .unwrap();
    assert!(status.success());
    let html = std::fs::read_to_string(page).unwrap();
    assert!(html.contains("<h1>Sandmark Nightly Build Status</h1>"));
    assert!(html.contains("<td class=\"status-success\">success</td>"));
}

#[test]
fn missing_root_exits_with_error() {
    let home = tempfile::tempdir().unwrap();
    let output = nightly_status(home.path())
        .args(["render", "--root"])
        .arg(home.path().join("absent"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not a directory"));
}

#[test]
fn config_in_app_dir_selects_root_and_title() {
    let tree = LogTree::new();
    tree.run("navajo", "20240301_001500", "trunk", "ok\n", true);
    let home = tempfile::tempdir().unwrap();
    let _env = StatusEnvGuard::set_config_home(home.path().to_path_buf());

    let app_dir = home.path().join(APP_DIR_NAME);
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(
        app_dir.join(CONFIG_FILE_NAME),
        format!(
            "[scan]\nroot = {:?}\ndays = 2\n\n[page]\ntitle = \"Nightly\"\n",
            tree.root().display().to_string()
        ),
    )
    .unwrap();

    let config = config::load_or_default().unwrap();
    assert_eq!(config.page.title, "Nightly");
    let source = LogSource::from_config(&config);
    assert_eq!(source, LogSource::Local(tree.root().to_path_buf()));

    let mut reporter = Reporter::new(config, source);
    let report = reporter.build(date!(2024 - 03 - 02)).unwrap();
    assert_eq!(report.table.dates(), &[date!(2024 - 03 - 01)]);
    assert_eq!(report.table.rows()[0].host, "navajo");
}

#[test]
fn app_dirs_follow_config_home_override() {
    let home = tempfile::tempdir().unwrap();
    let _env = StatusEnvGuard::set_config_home(home.path().to_path_buf());

    let root = app_dirs::app_root_dir().unwrap();
    assert_eq!(root, home.path().join(APP_DIR_NAME));
    let logs = app_dirs::logs_dir().unwrap();
    assert_eq!(logs, root.join("logs"));
    assert!(logs.is_dir());
    assert_eq!(config::config_path().unwrap(), root.join(CONFIG_FILE_NAME));
}
