use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed_f00d)
}

pub fn generate_orders_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    let mut rng = seeded_rng();

    wtr.write_record(["order", "total", "debt", "commission"])?;

    for i in 1..=rows {
        let total: u64 = rng.gen_range(0..=5_000_000);
        let debt: u64 = if rng.gen_bool(0.3) {
            rng.gen_range(0..=10_000_000)
        } else {
            0
        };
        let commission: u32 = rng.gen_range(0..=20);
        wtr.write_record([
            format!("ORD-{i}"),
            total.to_string(),
            debt.to_string(),
            commission.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
