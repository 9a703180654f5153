use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

fn main() {
    let mut rng = SimpleRng::new(42);

    // (arm label, true effect, per-observation sigma, sample size)
    let arms: [(&str, f64, f64, usize); 6] = [
        ("Control", 0.0, 4.0, 40),
        ("Dose 10mg", 1.2, 4.0, 40),
        ("Dose 20mg", 2.5, 4.0, 38),
        ("Dose 50mg", 4.1, 4.5, 35),
        ("Dose 100mg", 4.3, 5.0, 20),
        ("Comparator", 3.0, 4.0, 40),
    ];

    let mut labels: Vec<String> = Vec::new();
    let mut estimates: Vec<f64> = Vec::new();
    let mut standard_errors: Vec<f64> = Vec::new();

    for &(label, effect, sigma, n) in &arms {
        let se = sigma / (n as f64).sqrt();
        let estimate = rng.gauss(effect, se);

        labels.push(label.to_string());
        estimates.push(estimate);
        standard_errors.push(se);
    }

    // Build Arrow arrays
    let label_array = StringArray::from(labels.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let estimate_array = Float64Array::from(estimates);
    let se_array = Float64Array::from(standard_errors);

    let schema = Arc::new(Schema::new(vec![
        Field::new("Label", DataType::Utf8, false),
        Field::new("Estimate", DataType::Float64, false),
        Field::new("SE", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(label_array),
            Arc::new(estimate_array),
            Arc::new(se_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_measurements.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {} measurements to {output_path}", arms.len());
}
