//! Writes a synthetic `shopping_trends` table for trying the dashboard.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

const CATEGORIES: [(&str, f64); 4] = [
    ("Clothing", 60.0),
    ("Accessories", 58.0),
    ("Footwear", 62.0),
    ("Outerwear", 64.0),
];
const SEASONS: [&str; 4] = ["Winter", "Spring", "Summer", "Fall"];
const PAYMENT_METHODS: [&str; 6] = [
    "Credit Card",
    "Venmo",
    "Cash",
    "PayPal",
    "Debit Card",
    "Bank Transfer",
];
const LOCATIONS: [&str; 12] = [
    "Kentucky",
    "Maine",
    "Massachusetts",
    "Rhode Island",
    "Oregon",
    "Wyoming",
    "Montana",
    "Louisiana",
    "West Virginia",
    "Missouri",
    "Arkansas",
    "Nevada",
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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.next_u64() as usize % items.len()]
    }

    fn yes_no(&mut self, p_yes: f64) -> &'static str {
        if self.next_f64() < p_yes {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Column-oriented sample table, in the dashboard's header order.
#[derive(Default)]
struct Columns {
    age: Vec<i64>,
    category: Vec<&'static str>,
    review_rating: Vec<f64>,
    previous_purchases: Vec<i64>,
    season: Vec<&'static str>,
    payment_method: Vec<&'static str>,
    preferred_payment_method: Vec<&'static str>,
    subscription_status: Vec<&'static str>,
    discount_applied: Vec<&'static str>,
    purchase_amount: Vec<f64>,
    location: Vec<&'static str>,
}

const HEADERS: [&str; 11] = [
    "Age",
    "Category",
    "Review Rating",
    "Previous Purchases",
    "Season",
    "Payment Method",
    "Preferred Payment Method",
    "Subscription Status",
    "Discount Applied",
    "Purchase Amount (USD)",
    "Location",
];

fn generate(rows: usize, rng: &mut SimpleRng) -> Columns {
    let mut c = Columns::default();
    for _ in 0..rows {
        let (category, base_amount) = CATEGORIES[rng.next_u64() as usize % CATEGORIES.len()];
        let subscribed = rng.yes_no(0.27);
        // Subscribers always get the discount.
        let discount = if subscribed == "Yes" { "Yes" } else { rng.yes_no(0.25) };
        let amount = (base_amount + (rng.next_f64() - 0.5) * 80.0).round().max(20.0);
        let rating = 2.5 + (rng.next_f64() * 25.0).round() / 10.0;

        c.age.push(rng.range(18, 70));
        c.category.push(category);
        c.review_rating.push(rating);
        c.previous_purchases.push(rng.range(1, 50));
        c.season.push(rng.pick(&SEASONS));
        c.payment_method.push(rng.pick(&PAYMENT_METHODS));
        c.preferred_payment_method.push(rng.pick(&PAYMENT_METHODS));
        c.subscription_status.push(subscribed);
        c.discount_applied.push(discount);
        c.purchase_amount.push(amount);
        c.location.push(rng.pick(&LOCATIONS));
    }
    c
}

fn write_csv(path: &Path, c: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADERS)?;
    for i in 0..c.age.len() {
        writer.write_record([
            c.age[i].to_string(),
            c.category[i].to_string(),
            format!("{:.1}", c.review_rating[i]),
            c.previous_purchases[i].to_string(),
            c.season[i].to_string(),
            c.payment_method[i].to_string(),
            c.preferred_payment_method[i].to_string(),
            c.subscription_status[i].to_string(),
            c.discount_applied[i].to_string(),
            c.purchase_amount[i].to_string(),
            c.location[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, c: Columns) -> Result<()> {
    let types = [
        DataType::Int64,
        DataType::Utf8,
        DataType::Float64,
        DataType::Int64,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Float64,
        DataType::Utf8,
    ];
    let schema = Arc::new(Schema::new(
        HEADERS
            .iter()
            .zip(types)
            .map(|(name, ty)| Field::new(*name, ty, false))
            .collect::<Vec<_>>(),
    ));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(c.age)),
        Arc::new(StringArray::from(c.category)),
        Arc::new(Float64Array::from(c.review_rating)),
        Arc::new(Int64Array::from(c.previous_purchases)),
        Arc::new(StringArray::from(c.season)),
        Arc::new(StringArray::from(c.payment_method)),
        Arc::new(StringArray::from(c.preferred_payment_method)),
        Arc::new(StringArray::from(c.subscription_status)),
        Arc::new(StringArray::from(c.discount_applied)),
        Arc::new(Float64Array::from(c.purchase_amount)),
        Arc::new(StringArray::from(c.location)),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Generate a synthetic shopping-trends table.
///
/// The output format follows the extension: `.parquet` writes Parquet,
/// anything else comma-delimited text.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Output file
    #[arg(default_value = "shopping_trends.csv", value_name = "FILE")]
    output: PathBuf,

    /// Number of records to generate
    #[arg(short, long, default_value = "3900")]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let columns = generate(args.rows, &mut rng);

    let path = args.output.as_path();
    if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("parquet")) {
        write_parquet(path, columns)?;
    } else {
        write_csv(path, &columns)?;
    }

    println!("Wrote {} shopping records to {}", args.rows, path.display());
    Ok(())
}
