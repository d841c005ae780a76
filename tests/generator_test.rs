mod common;

#[test]
fn test_generate_orders_csv() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("orders.csv");
    common::generate_orders_csv(&output_path, 5).expect("Failed to generate CSV");

    let content = std::fs::read_to_string(&output_path).expect("Failed to read file");
    // Header + 5 rows = 6 lines
    assert_eq!(content.lines().count(), 6);
}

#[test]
fn test_generated_orders_are_within_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("orders.csv");
    common::generate_orders_csv(&output_path, 500).expect("Failed to generate CSV");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&output_path)
        .expect("Failed to open CSV");

    let mut with_debt = 0;
    for result in reader.records() {
        let record = result.expect("Failed to read record");
        let total: u64 = record[1].parse().expect("Failed to parse total");
        let debt: u64 = record[2].parse().expect("Failed to parse debt");
        let commission: u32 = record[3].parse().expect("Failed to parse commission");
        assert!(total <= 5_000_000);
        assert!(commission <= 20);
        if debt > 0 {
            with_debt += 1;
        }
    }

    assert!(with_debt > 0, "Some orders should carry debt");
}
