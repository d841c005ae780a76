use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn test_trillion_subunit_order() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "order, total, debt, commission").unwrap();
    writeln!(file, "BIG-1, 1000000000000, 0, ").unwrap();

    let mut cmd = Command::new(cargo_bin!("paysplit"));
    cmd.arg("quote").arg(file.path());

    cmd.assert().success().stdout(predicate::str::contains(
        "BIG-1,1000000000000,29866118538,50000000000,0,79866118538,950000000000",
    ));
}

#[test]
fn test_overflowing_order_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "order, total, debt, commission").unwrap();
    // u64::MAX
    writeln!(file, "MAX-1, 18446744073709551615, 0, ").unwrap();
    writeln!(file, "OK-1, 2500, 0, ").unwrap();

    let mut cmd = Command::new(cargo_bin!("paysplit"));
    cmd.arg("quote").arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Arithmetic overflow"))
        .stdout(predicate::str::contains("MAX-1").not())
        .stdout(predicate::str::contains("OK-1,2500,1208,125,0,1333,2375"));
}
