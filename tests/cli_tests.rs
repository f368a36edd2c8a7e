mod support;

use assert_cmd::Command;
use predicates::prelude::*;

use support::fixtures::{Workspace, STANDARD_RATES};

fn pricesync() -> Command {
    let mut cmd = Command::cargo_bin("pricesync").expect("binary built");
    cmd.env_remove("PRICESYNC_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn convert_prints_rounded_amount() {
    let ws = Workspace::new();
    ws.write("rates.json", STANDARD_RATES);
    let config = ws.write_config("");

    pricesync()
        .arg("--config")
        .arg(&config)
        .args(["convert", "--amount", "1000", "--from", "USD", "--to", "EUR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000 USD = 914 EUR"));
}

#[test]
fn convert_rejects_negative_amount() {
    let ws = Workspace::new();
    ws.write("rates.json", STANDARD_RATES);
    let config = ws.write_config("");

    pricesync()
        .arg("--config")
        .arg(&config)
        .args(["convert", "--amount", "-5", "--from", "USD", "--to", "EUR"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--amount"));
}

#[test]
fn convert_emits_json_line() {
    let ws = Workspace::new();
    ws.write("rates.json", STANDARD_RATES);
    let config = ws.write_config("");

    pricesync()
        .env("PRICESYNC_CONFIG", &config)
        .args(["--json", "convert", "--amount", "1000", "--from", "EUR", "--to", "CNY"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\":\"conversion\""))
        .stdout(predicate::str::contains("\"converted\":7927"));
}

#[test]
fn missing_pivot_rate_exits_nonzero() {
    let ws = Workspace::new();
    ws.write("rates.json", r#"{"live": {"EUR": "0.9"}}"#);
    ws.write("items.json", r#"[{"app_id": 730, "key": "Case", "currency": "USD"}]"#);
    let config = ws.write_config("");

    pricesync()
        .arg("--config")
        .arg(&config)
        .args(["sync-prices", "--app", "730"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("pivot currency USD"));
}

#[test]
fn invalid_config_exits_nonzero() {
    let ws = Workspace::new();
    let config = ws.write("config.toml", "[engine]\nsnapshot_capacity = 0\n");

    pricesync()
        .arg("--config")
        .arg(&config)
        .args(["shift", "--app", "730"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("snapshot_capacity"));
}

#[test]
fn shift_reports_saved_items() {
    let ws = Workspace::new();
    ws.write("rates.json", STANDARD_RATES);
    ws.write("items.json", r#"[{"app_id": 730, "key": "Case", "currency": "USD"}]"#);
    let config = ws.write_config("");

    pricesync()
        .arg("--config")
        .arg(&config)
        .args(["--json", "shift", "--app", "730"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"saved\":1"));
}
