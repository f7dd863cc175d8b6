//! Synthetic hourly rental data in the `hour.csv` layout, for demos and tests.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Day-of-year offsets treated as public holidays.
const HOLIDAYS: [u32; 10] = [0, 16, 51, 149, 184, 246, 282, 314, 327, 358];

/// Relative demand per season (Spring, Summer, Fall, Winter).
const SEASON_FACTOR: [f64; 4] = [0.55, 1.0, 1.1, 0.8];

/// One generated row. Field names match the source dataset's columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    pub instant: i64,
    pub day: i64,
    pub season: i64,
    pub mnth: i64,
    pub hr: i64,
    pub holiday: i64,
    pub weekday: i64,
    pub workingday: i64,
    pub casual: i64,
    pub registered: i64,
    pub cnt: i64,
}

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
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

/// Commuter peaks at 8h and 17h; leisure riders in the afternoon.
fn hourly_profile(hour: i64, working: bool) -> (f64, f64) {
    let h = hour as f64;
    let bump = |center: f64, width: f64| (-(h - center).powi(2) / (2.0 * width * width)).exp();
    let night = if (1..=5).contains(&hour) { 0.1 } else { 1.0 };
    if working {
        let registered = night * (40.0 + 320.0 * bump(8.0, 1.0) + 380.0 * bump(17.5, 1.3));
        let casual = night * (5.0 + 35.0 * bump(15.0, 3.0));
        (casual, registered)
    } else {
        let registered = night * (20.0 + 160.0 * bump(13.5, 3.5));
        let casual = night * (8.0 + 140.0 * bump(14.0, 3.0));
        (casual, registered)
    }
}

/// Generate `days` days of hourly rows starting on a Saturday.
pub fn generate(days: u32, seed: u64) -> Vec<SampleRow> {
    let mut rng = SimpleRng::new(seed);
    let mut rows = Vec::with_capacity(days as usize * 24);

    for day in 0..days {
        let doy = day % 365;
        let mnth = (doy * 12 / 365 + 1) as i64;
        let season = (mnth - 1) / 3 + 1;
        let weekday = ((day + 6) % 7) as i64;
        let holiday = HOLIDAYS.contains(&doy);
        let working = (1..=5).contains(&weekday) && !holiday;
        let factor = SEASON_FACTOR[(season - 1) as usize];

        for hr in 0..24 {
            let (casual_mu, registered_mu) = hourly_profile(hr, working);
            let casual = rng
                .gauss(casual_mu * factor, 4.0 + 0.3 * casual_mu)
                .round()
                .max(0.0) as i64;
            let registered = rng
                .gauss(registered_mu * factor, 6.0 + 0.2 * registered_mu)
                .round()
                .max(0.0) as i64;

            rows.push(SampleRow {
                instant: rows.len() as i64 + 1,
                day: day as i64,
                season,
                mnth,
                hr,
                holiday: holiday as i64,
                weekday,
                workingday: working as i64,
                casual,
                registered,
                cnt: casual + registered,
            });
        }
    }
    rows
}

/// Write rows as CSV with a header line.
pub fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Write rows as a single-batch Parquet file of Int64 columns.
pub fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let column = |f: fn(&SampleRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let columns: Vec<(&str, ArrayRef)> = vec![
        ("instant", column(|r| r.instant)),
        ("day", column(|r| r.day)),
        ("season", column(|r| r.season)),
        ("mnth", column(|r| r.mnth)),
        ("hr", column(|r| r.hr)),
        ("holiday", column(|r| r.holiday)),
        ("weekday", column(|r| r.weekday)),
        ("workingday", column(|r| r.workingday)),
        ("casual", column(|r| r.casual)),
        ("registered", column(|r| r.registered)),
        ("cnt", column(|r| r.cnt)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Int64, false))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Dispatch on extension: `.parquet`/`.pq` → Parquet, anything else → CSV.
pub fn write_file(path: &Path, rows: &[SampleRow]) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("pq") => write_parquet(path, rows),
        _ => write_csv(path, rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_and_well_formed() {
        let a = generate(14, 7);
        let b = generate(14, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 14 * 24);
        for r in &a {
            assert!((1..=4).contains(&r.season));
            assert!((0..=23).contains(&r.hr));
            assert!(r.casual >= 0 && r.registered >= 0);
            assert_eq!(r.cnt, r.casual + r.registered);
            assert!(!(r.holiday == 1 && r.workingday == 1));
        }
        // day 0 is a Saturday and a holiday in this calendar
        assert_eq!(a[0].weekday, 6);
        assert_eq!(a[0].holiday, 1);
    }

    #[test]
    fn a_full_year_covers_every_season_and_day_type() {
        let rows = generate(365, 1);
        for season in 1..=4 {
            assert!(rows.iter().any(|r| r.season == season));
        }
        assert!(rows.iter().any(|r| r.holiday == 1));
        assert!(rows.iter().any(|r| r.workingday == 1));
        assert!(rows.iter().any(|r| r.holiday == 0 && r.workingday == 0));
    }
}
