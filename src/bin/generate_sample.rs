use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use plotsave::{read_blocks, write_blocks, NumericBlock, ParseOptions};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

/// One `[wavenumber, intensity]` block per sample.
fn spectrum_block(
    wavenumbers: &[f64],
    peaks: &[(f64, f64, f64)],
    rng: &mut SimpleRng,
) -> NumericBlock {
    let rows: Vec<[f64; 2]> = wavenumbers
        .iter()
        .map(|&wn| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wn, mu, sigma, amp))
                .sum();
            [wn, signal + rng.gauss(0.0, 0.005)]
        })
        .collect();
    NumericBlock::from_rows(&rows).unwrap_or_default()
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_blocks.dat"));

    let mut rng = SimpleRng::new(42);

    // Wavenumbers: 4000 → 2002, step 2
    let wavenumbers: Vec<f64> = (0..1000).map(|i| 4000.0 - i as f64 * 2.0).collect();

    let samples: [(&str, [(f64, f64, f64); 3]); 3] = [
        ("Sample_A", [(3400.0, 80.0, 0.8), (2900.0, 40.0, 0.5), (2350.0, 30.0, 0.3)]),
        ("Sample_B", [(3200.0, 60.0, 0.6), (2800.0, 50.0, 0.7), (2500.0, 35.0, 0.4)]),
        ("Sample_C", [(3600.0, 70.0, 0.9), (3000.0, 45.0, 0.4), (2200.0, 25.0, 0.5)]),
    ];

    let blocks: Vec<NumericBlock> = samples
        .iter()
        .map(|(name, peaks)| {
            info!("generating {name}");
            spectrum_block(&wavenumbers, peaks, &mut rng)
        })
        .collect();

    write_blocks(&output_path, &blocks)
        .with_context(|| format!("writing {}", output_path.display()))?;

    // Re-read as a sanity check on the written layout.
    let check = read_blocks(&output_path, &ParseOptions::default())
        .with_context(|| format!("re-reading {}", output_path.display()))?;
    anyhow::ensure!(
        check.len() == blocks.len(),
        "expected {} blocks, read back {}",
        blocks.len(),
        check.len()
    );

    println!(
        "Wrote {} spectra ({} wavenumbers each) to {}",
        blocks.len(),
        wavenumbers.len(),
        output_path.display()
    );
    Ok(())
}
