use anyhow::{Context, Result};

use granary::{ingest, IngestOptions, RawUpload};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);

    let years = 2015..=2024;

    // (country, malnutrition base %, crop yield base t/ha, production index base)
    let profiles: Vec<(&str, f64, f64, f64)> = vec![
        ("Kenya", 26.0, 1.6, 98.0),
        ("Ethiopia", 32.0, 2.1, 95.0),
        ("Nigeria", 35.0, 1.9, 101.0),
        ("Chad", 39.0, 1.1, 92.0),
        ("Niger", 42.0, 0.9, 90.0),
        ("Somalia", 45.0, 0.7, 88.0),
    ];

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record([
        "Country",
        "Year",
        "Malnutrition_Rate",
        "Crop_Yield",
        "Food_Production_Index",
    ])?;

    let mut rows = 0usize;
    for &(country, rate_base, yield_base, index_base) in &profiles {
        for (i, year) in years.clone().enumerate() {
            // Slow improvement over the years, with per-reading noise.
            let rate = (rate_base - 0.4 * i as f64 + rng.gauss(0.0, 0.8)).clamp(2.0, 60.0);
            let crop_yield = (yield_base * (1.0 + 0.02 * i as f64) + rng.gauss(0.0, 0.15)).max(0.2);
            let production = index_base + 1.5 * i as f64 + rng.gauss(0.0, 2.5);

            writer.write_record(&[
                country.to_string(),
                year.to_string(),
                format!("{rate:.1}"),
                format!("{crop_yield:.2}"),
                format!("{production:.1}"),
            ])?;
            rows += 1;
        }
    }
    writer.flush().context("writing sample file")?;

    // Run the file back through the pipeline as a smoke check.
    let bytes = std::fs::read(output_path).context("re-reading the sample file")?;
    let upload = RawUpload::new(output_path, bytes);
    let out = ingest(&upload, &IngestOptions::default()).context("ingesting the sample file")?;

    println!("Wrote {rows} rows to {output_path}");
    for column in &out.dataset.columns {
        println!("  {}: {}", column.name, column.ty);
    }
    println!("{}", out.report.summary());

    Ok(())
}
