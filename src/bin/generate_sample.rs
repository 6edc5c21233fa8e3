use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;

/// Write a deterministic sample inventory file.
///
/// About a quarter of the rows repeat an earlier product, code and
/// expiration with a different quantity, so loading the file exercises the
/// duplicate merge.
#[derive(Debug, Parser)]
#[command(about)]
struct Args {
    /// Number of data rows to write.
    #[arg(long, default_value_t = 40)]
    rows: usize,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output path.
    #[arg(long, default_value = "sample_inventory.csv")]
    output: PathBuf,
}

const PRODUCTS: [(&str, &str); 8] = [
    ("Apple", "A1"),
    ("Banana", "B2"),
    ("Carrot", "C3"),
    ("Milk", "M4"),
    ("Yogurt", "Y5"),
    ("Bread", "B6"),
    ("Cheese", "C7"),
    ("Eggs", "E8"),
];

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

    /// Uniform in `0..n` (n > 0).
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let base = NaiveDate::from_ymd_opt(2024, 1, 1).context("base date")?;

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record(["name", "code", "quantity", "expiration"])?;

    let mut written: Vec<(usize, String)> = Vec::with_capacity(args.rows);
    for _ in 0..args.rows {
        let quantity = rng.below(50).to_string();

        // Repeat an earlier item so the loader has something to merge.
        let (product, expiration) = if !written.is_empty() && rng.below(4) == 0 {
            let pick = rng.below(written.len() as u64) as usize;
            written[pick].clone()
        } else {
            let product = rng.below(PRODUCTS.len() as u64) as usize;
            let days = rng.below(365) as i64;
            let expiration = (base + Duration::days(days)).format("%Y-%m-%d").to_string();
            (product, expiration)
        };

        let (name, code) = PRODUCTS[product];
        writer.write_record([name, code, quantity.as_str(), expiration.as_str()])?;
        written.push((product, expiration));
    }
    writer.flush().context("flushing output")?;

    log::debug!("seed {} produced {} rows", args.seed, written.len());
    println!("Wrote {} rows to {}", args.rows, args.output.display());
    Ok(())
}
