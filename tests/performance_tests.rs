use assert_cmd::cargo_bin;
use std::process::Command;

mod common;

#[test]
fn test_large_batch_streaming() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("large_orders.csv");
    common::generate_orders_csv(&input, 200_000).expect("Failed to generate large CSV");

    let output = Command::new(cargo_bin!("paysplit"))
        .arg("quote")
        .arg(&input)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Binary failed to quote large batch");

    let stdout = String::from_utf8_lossy(&output.stdout);
    // Header + one row per order
    assert_eq!(stdout.lines().count(), 200_001);
}
