use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const NEIGHBORHOODS: [&str; 4] = ["Riverside", "Old Town", "Hillcrest", "Harbor"];

/// Box-Muller transform for a normal draw.
fn gauss(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-15);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn main() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let output_path = "sample_housing.csv";
    let rows = 500;

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "area_sqm",
        "bedrooms",
        "age_years",
        "distance_km",
        "neighborhood",
        "price_k",
    ])?;

    for _ in 0..rows {
        let area = gauss(&mut rng, 110.0, 30.0).max(25.0);
        let bedrooms = (area / 35.0).round().clamp(1.0, 6.0);
        let age = rng.random_range(0.0..80.0_f64);
        let distance = rng.random_range(0.5..25.0_f64);
        let neighborhood = NEIGHBORHOODS[rng.random_range(0..NEIGHBORHOODS.len())];
        let price = 40.0 + 2.1 * area + 12.0 * bedrooms - 0.8 * age - 4.5 * distance
            + gauss(&mut rng, 0.0, 15.0);

        // A few gaps so missing-value handling shows up in the explorer.
        let age_cell = if rng.random_bool(0.03) {
            String::new()
        } else {
            format!("{age:.0}")
        };

        writer.write_record([
            format!("{area:.1}"),
            format!("{bedrooms:.0}"),
            age_cell,
            format!("{distance:.2}"),
            neighborhood.to_string(),
            format!("{price:.1}"),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}
