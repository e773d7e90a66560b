use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

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

/// Porous-layer style correlation `Nu ~ a * Ra^(1/2)` with multiplicative noise.
fn generate_experiment(pr_p: f64, rng: &mut SimpleRng) -> Vec<(f64, f64)> {
    let a = 0.02 + 0.03 * rng.next_f64();
    (0..25)
        .map(|i| {
            let ra_d = pr_p * 10f64.powf(0.5 + i as f64 * 0.15);
            let nu = pr_p * a * (ra_d / pr_p).sqrt() * (1.0 + rng.gauss(0.0, 0.05));
            (ra_d, nu)
        })
        .collect()
}

/// Thousands separators, the way spreadsheets export large numbers.
fn with_commas(v: f64) -> String {
    let digits = format!("{:.0}", v);
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let authors = ["Elder", "Katto & Masuoka", "Lapwood", "Combarnous", "Buretta"];
    let darcy = [1e-6, 1e-5, 1e-4, 1e-3, 1e-2];
    let prandtl = [8.0, 75.0, 640.0, 2300.0];

    let data_dir = Path::new("Data_sets");
    fs::create_dir_all(data_dir).context("creating Data_sets")?;

    let meta_path = "HRL_historic_experiments.csv";
    let mut meta = csv::Writer::from_path(meta_path).context("creating metadata file")?;
    meta.write_record(["Name", " Key ", "Pr_p", "Da"])?;

    let mut n_rows = 0;
    for (a, author) in authors.iter().enumerate() {
        for (p, &pr_p) in prandtl.iter().enumerate() {
            let key = format!("{}_{}", author.split_whitespace().next().unwrap_or("exp"), p + 1);
            let da = darcy[(a + p) % darcy.len()];

            let pr_field = match (a, p) {
                // metadata gaps the viewer must drop
                (1, 3) => "nan".to_string(),
                (3, 0) => String::new(),
                _ => with_commas(pr_p),
            };
            meta.write_record([author.to_string(), key.clone(), pr_field, format!("{da:e}")])?;
            n_rows += 1;

            // one key without a data file, reported as skipped
            if (a, p) == (2, 2) {
                continue;
            }

            let mut w = csv::Writer::from_path(data_dir.join(format!("{key}.csv")))?;
            w.write_record(["Ra_D", "Nu"])?;
            for (ra_d, nu) in generate_experiment(pr_p, &mut rng) {
                w.write_record([format!("{ra_d:.6e}"), format!("{nu:.6e}")])?;
            }
            w.flush()?;
        }
    }
    meta.flush()?;

    println!(
        "Wrote {n_rows} metadata rows to {meta_path} and experiment files to {}",
        data_dir.display()
    );
    Ok(())
}
