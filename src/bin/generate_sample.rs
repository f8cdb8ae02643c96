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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const ROWS: usize = 200;

/// Share of Stock / Discount cells left empty so Is Empty filters have hits.
const EMPTY_RATE: f64 = 0.08;

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let categories = [
        ("Electronics", 4.5, ["Laptop", "Monitor", "Mouse", "Keyboard", "Headset"]),
        ("Furniture", 5.0, ["Desk", "Chair", "Shelf", "Cabinet", "Lamp"]),
        ("Stationery", 2.0, ["Notebook", "Pen Set", "Stapler", "Planner", "Marker"]),
    ];
    let brands = ["Acme", "Globex", "Initech", "Umbrella", "Stark"];

    let mut ids: Vec<i64> = Vec::with_capacity(ROWS);
    let mut names: Vec<String> = Vec::with_capacity(ROWS);
    let mut cats: Vec<&str> = Vec::with_capacity(ROWS);
    let mut prices: Vec<f64> = Vec::with_capacity(ROWS);
    let mut stock: Vec<Option<i64>> = Vec::with_capacity(ROWS);
    let mut discounts: Vec<Option<String>> = Vec::with_capacity(ROWS);

    for i in 0..ROWS {
        let (category, log_price, products) = categories[i % categories.len()];
        let product = rng.pick(&products);
        let brand = rng.pick(&brands);

        ids.push(i as i64 + 1);
        names.push(format!("{brand} {product}"));
        cats.push(category);
        prices.push((rng.gauss(log_price, 0.6).exp() * 100.0).round() / 100.0);
        stock.push(if rng.next_f64() < EMPTY_RATE {
            None
        } else {
            Some(rng.gauss(60.0, 40.0).max(0.0) as i64)
        });
        discounts.push(if rng.next_f64() < EMPTY_RATE {
            None
        } else {
            Some(format!("{}%", (rng.next_f64() * 6.0) as u32 * 5))
        });
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("ID", DataType::Int64, false),
        Field::new("Product Name", DataType::Utf8, false),
        Field::new("Category", DataType::Utf8, false),
        Field::new("Price", DataType::Float64, false),
        Field::new("Stock", DataType::Int64, true),
        Field::new("Discount (%)", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(ids.clone())),
            Arc::new(StringArray::from(names.iter().map(String::as_str).collect::<Vec<_>>())),
            Arc::new(StringArray::from(cats.clone())),
            Arc::new(Float64Array::from(prices.clone())),
            Arc::new(Int64Array::from(stock.clone())),
            Arc::new(StringArray::from(discounts.clone())),
        ],
    )?;

    // Write Parquet
    let parquet_path = "sample_screener.parquet";
    let file = std::fs::File::create(parquet_path)?;
    let mut writer = ArrowWriter::try_new(file, schema.clone(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    // Write the same rows as CSV
    let csv_path = "sample_screener.csv";
    let mut csv_writer = csv::Writer::from_path(csv_path)?;
    csv_writer.write_record(schema.fields().iter().map(|f| f.name().as_str()))?;
    for i in 0..ROWS {
        csv_writer.write_record([
            ids[i].to_string(),
            names[i].clone(),
            cats[i].to_string(),
            prices[i].to_string(),
            stock[i].map(|s| s.to_string()).unwrap_or_default(),
            discounts[i].clone().unwrap_or_default(),
        ])?;
    }
    csv_writer.flush()?;

    // Curated filter list: everything except the ID column
    let list_path = "sample_screener_list.csv";
    let mut list_writer = csv::Writer::from_path(list_path)?;
    list_writer.write_record(schema.fields().iter().skip(1).map(|f| f.name().as_str()))?;
    list_writer.flush()?;

    println!("Wrote {ROWS} rows to {parquet_path} and {csv_path}, column list to {list_path}");
    Ok(())
}
