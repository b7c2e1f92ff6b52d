use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
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

/// Per-species measurement means: (sepal_length, sepal_width, petal_length,
/// petal_width), loosely following Fisher's iris data.
const SPECIES: [(&str, [f64; 4]); 3] = [
    ("setosa", [5.0, 3.4, 1.5, 0.25]),
    ("versicolor", [5.9, 2.8, 4.3, 1.3]),
    ("virginica", [6.6, 3.0, 5.6, 2.0]),
];

const ROWS_PER_SPECIES: usize = 50;

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut all_species: Vec<String> = Vec::new();
    let mut all_sl: Vec<f64> = Vec::new();
    let mut all_sw: Vec<f64> = Vec::new();
    let mut all_pl: Vec<f64> = Vec::new();
    let mut all_pw: Vec<f64> = Vec::new();
    let mut all_id: Vec<i64> = Vec::new();

    let mut row_id: i64 = 0;
    for (species, [sl, sw, pl, pw]) in SPECIES {
        for _ in 0..ROWS_PER_SPECIES {
            // One latent size factor per flower keeps the four measurements
            // positively correlated within a species.
            let size = rng.gauss(0.0, 1.0);

            all_species.push(species.to_string());
            all_sl.push(sl + 0.30 * size + rng.gauss(0.0, 0.12));
            all_sw.push(sw + 0.15 * size + rng.gauss(0.0, 0.15));
            all_pl.push(pl + 0.45 * size + rng.gauss(0.0, 0.10));
            all_pw.push(pw + 0.15 * size + rng.gauss(0.0, 0.05));
            all_id.push(row_id);
            row_id += 1;
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("sepal_length", DataType::Float64, false),
        Field::new("sepal_width", DataType::Float64, false),
        Field::new("petal_length", DataType::Float64, false),
        Field::new("petal_width", DataType::Float64, false),
        Field::new("species", DataType::Utf8, false),
        Field::new("sample_id", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(all_sl)),
            Arc::new(Float64Array::from(all_sw)),
            Arc::new(Float64Array::from(all_pl)),
            Arc::new(Float64Array::from(all_pw)),
            Arc::new(StringArray::from(
                all_species.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(all_id)),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_iris.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {row_id} rows across {} species to {output_path}",
        SPECIES.len()
    );
}
