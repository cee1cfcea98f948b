//! Writes deterministic synthetic trip files for the three cities, so the
//! explorer can be tried without the real bikeshare exports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Generate sample bikeshare datasets")]
struct Args {
    /// Output directory (created if missing)
    #[arg(long, default_value = "sample_data")]
    out_dir: PathBuf,

    /// Trips per city
    #[arg(long, default_value_t = 2000)]
    trips: usize,

    /// Write Parquet instead of CSV
    #[arg(long)]
    parquet: bool,
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

// ---------------------------------------------------------------------------
// Row shapes, matching the real exports' headers
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct DemographicTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: i64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type")]
    user_type: String,
    #[serde(rename = "Gender")]
    gender: Option<String>,
    #[serde(rename = "Birth Year")]
    birth_year: Option<f64>,
}

#[derive(Debug, Serialize)]
struct BasicTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type")]
    user_type: String,
}

struct CityProfile {
    stem: &'static str,
    stations: &'static [&'static str],
    demographics: bool,
}

const CITIES: [CityProfile; 3] = [
    CityProfile {
        stem: "chicago",
        stations: &[
            "Streeter Dr & Grand Ave",
            "Lake Shore Dr & Monroe St",
            "Clinton St & Washington Blvd",
            "Canal St & Adams St",
            "Theater on the Lake",
        ],
        demographics: true,
    },
    CityProfile {
        stem: "new_york_city",
        stations: &[
            "Pershing Square North",
            "E 17 St & Broadway",
            "W 21 St & 6 Ave",
            "Broadway & E 22 St",
            "Central Park S & 6 Ave",
        ],
        demographics: true,
    },
    CityProfile {
        stem: "washington",
        stations: &[
            "Columbus Circle / Union Station",
            "Lincoln Memorial",
            "Jefferson Dr & 14th St SW",
            "Massachusetts Ave & Dupont Circle NW",
            "15th & P St NW",
        ],
        demographics: false,
    },
];

#[derive(Debug, PartialEq)]
struct SampleRow {
    start: NaiveDateTime,
    end: NaiveDateTime,
    duration: f64,
    start_station: String,
    end_station: String,
    user_type: String,
    gender: Option<String>,
    birth_year: Option<i64>,
}

fn generate_rows(profile: &CityProfile, n: usize, rng: &mut SimpleRng) -> Result<Vec<SampleRow>> {
    let season_start = NaiveDate::from_ymd_opt(2017, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid season start")?;
    // Busier around commuting hours.
    let hours = [7, 8, 8, 9, 12, 16, 17, 17, 18, 21];

    (0..n)
        .map(|_| {
            let day = rng.below(181) as i64;
            let hour = *rng.pick(&hours);
            let minute = rng.below(60) as i64;
            let start = season_start
                + Duration::days(day)
                + Duration::hours(hour)
                + Duration::minutes(minute);
            let duration = 60.0 + rng.next_f64() * 2400.0;
            let end = start + Duration::milliseconds((duration * 1000.0) as i64);

            let user_type = if rng.next_f64() < 0.8 { "Subscriber" } else { "Customer" };
            let (gender, birth_year) = if profile.demographics && rng.next_f64() < 0.9 {
                let gender = if rng.next_f64() < 0.7 { "Male" } else { "Female" };
                (Some(gender.to_string()), Some(1940 + rng.below(60) as i64))
            } else {
                (None, None)
            };

            Ok(SampleRow {
                start,
                end,
                duration,
                start_station: rng.pick(profile.stations).to_string(),
                end_station: rng.pick(profile.stations).to_string(),
                user_type: user_type.to_string(),
                gender,
                birth_year,
            })
        })
        .collect()
}

const TS: &str = "%Y-%m-%d %H:%M:%S";

fn write_csv(path: &Path, profile: &CityProfile, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for row in rows {
        if profile.demographics {
            writer.serialize(DemographicTrip {
                start_time: row.start.format(TS).to_string(),
                end_time: row.end.format(TS).to_string(),
                trip_duration: row.duration as i64,
                start_station: row.start_station.clone(),
                end_station: row.end_station.clone(),
                user_type: row.user_type.clone(),
                gender: row.gender.clone(),
                birth_year: row.birth_year.map(|y| y as f64),
            })?;
        } else {
            writer.serialize(BasicTrip {
                start_time: row.start.format(TS).to_string(),
                end_time: row.end.format(TS).to_string(),
                trip_duration: (row.duration * 1000.0).round() / 1000.0,
                start_station: row.start_station.clone(),
                end_station: row.end_station.clone(),
                user_type: row.user_type.clone(),
            })?;
        }
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, profile: &CityProfile, rows: &[SampleRow]) -> Result<()> {
    let text = |f: fn(&SampleRow) -> String| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(rows.iter().map(f)))
    };

    let mut fields = vec![
        Field::new("Start Time", DataType::Utf8, false),
        Field::new("End Time", DataType::Utf8, false),
        Field::new("Trip Duration", DataType::Float64, false),
        Field::new("Start Station", DataType::Utf8, false),
        Field::new("End Station", DataType::Utf8, false),
        Field::new("User Type", DataType::Utf8, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        text(|r| r.start.format(TS).to_string()),
        text(|r| r.end.format(TS).to_string()),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.duration))),
        text(|r| r.start_station.clone()),
        text(|r| r.end_station.clone()),
        text(|r| r.user_type.clone()),
    ];
    if profile.demographics {
        fields.push(Field::new("Gender", DataType::Utf8, true));
        fields.push(Field::new("Birth Year", DataType::Int64, true));
        columns.push(Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.gender.as_deref()),
        )));
        columns.push(Arc::new(Int64Array::from_iter(rows.iter().map(|r| r.birth_year))));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    for profile in &CITIES {
        let rows = generate_rows(profile, args.trips, &mut rng)?;
        let ext = if args.parquet { "parquet" } else { "csv" };
        let path = args.out_dir.join(format!("{}.{ext}", profile.stem));

        if args.parquet {
            write_parquet(&path, profile, &rows)?;
        } else {
            write_csv(&path, profile, &rows)?;
        }
        println!("Wrote {} trips to {}", rows.len(), path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(path: &Path) -> Vec<String> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader.headers().unwrap().iter().map(String::from).collect()
    }

    #[test]
    fn same_seed_gives_same_rows() {
        for profile in &CITIES {
            let a = generate_rows(profile, 50, &mut SimpleRng::new(42)).unwrap();
            let b = generate_rows(profile, 50, &mut SimpleRng::new(42)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn demographic_columns_only_for_chicago_and_new_york() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = SimpleRng::new(42);
        let base = [
            "Start Time",
            "End Time",
            "Trip Duration",
            "Start Station",
            "End Station",
            "User Type",
        ];

        for profile in &CITIES {
            let rows = generate_rows(profile, 10, &mut rng).unwrap();
            let path = dir.path().join(format!("{}.csv", profile.stem));
            write_csv(&path, profile, &rows).unwrap();

            let mut expected: Vec<&str> = base.to_vec();
            if profile.stem != "washington" {
                expected.extend(["Gender", "Birth Year"]);
            }
            assert_eq!(headers(&path), expected, "{}", profile.stem);
        }
    }

    #[test]
    fn written_start_times_parse() {
        let dir = tempfile::tempdir().unwrap();
        let profile = &CITIES[0];
        let rows = generate_rows(profile, 25, &mut SimpleRng::new(42)).unwrap();
        let path = dir.path().join("chicago.csv");
        write_csv(&path, profile, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let mut count = 0;
        for record in reader.records() {
            let record = record.unwrap();
            let start = record.get(0).unwrap();
            assert!(
                NaiveDateTime::parse_from_str(start, TS).is_ok(),
                "bad start time {start}"
            );
            count += 1;
        }
        assert_eq!(count, 25);
    }
}
