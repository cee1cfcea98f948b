use std::io::{BufRead, Write};
use std::ops::Range;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::console::Console;
use crate::data::model::{
    TripDataset, BIRTH_YEAR, END_STATION, END_TIME, GENDER, START_STATION, START_TIME,
    TIMESTAMP_FORMAT, TRIP_DURATION, USER_TYPE,
};

/// Rows shown per page.
pub const PAGE_SIZE: usize = 5;

// ---------------------------------------------------------------------------
// Raw data pager
// ---------------------------------------------------------------------------

/// Offer the filtered rows five at a time until the user declines or the
/// rows run out.
pub fn page_raw_data<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    dataset: &TripDataset,
) -> Result<()> {
    let mut wants_more = console.confirm(
        "\nWould you like to take a look at the raw data?\n\
         Type yes to see the first rows of your selected data set or no to proceed to the statistics.",
    )?;
    let mut start = 0;

    while wants_more {
        if start >= dataset.len() {
            writeln!(console.out(), "No more rows to display.")?;
            break;
        }
        let end = (start + PAGE_SIZE).min(dataset.len());
        writeln!(console.out(), "Displaying rows {start} to {}.", end - 1)?;
        writeln!(console.out(), "{}", render_rows(dataset, start..end)?)?;
        start = end;

        wants_more =
            console.confirm("Would you like to see the next five rows of raw data? Enter yes or no.")?;
    }
    Ok(())
}

/// Render a window of trips as a text table. Demographic columns appear only
/// when the dataset carries them.
pub fn render_rows(dataset: &TripDataset, rows: Range<usize>) -> Result<String> {
    let trips = &dataset.trips[rows.clone()];

    let mut fields = vec![
        Field::new("Row", DataType::UInt64, false),
        Field::new(START_TIME, DataType::Utf8, false),
        Field::new(END_TIME, DataType::Utf8, true),
        Field::new(TRIP_DURATION, DataType::Float64, false),
        Field::new(START_STATION, DataType::Utf8, false),
        Field::new(END_STATION, DataType::Utf8, false),
        Field::new(USER_TYPE, DataType::Utf8, true),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from_iter_values(rows.map(|i| i as u64))),
        Arc::new(StringArray::from_iter_values(
            trips.iter().map(|t| t.start_time.format(TIMESTAMP_FORMAT).to_string()),
        )),
        Arc::new(StringArray::from_iter(trips.iter().map(|t| {
            t.end_time.map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        }))),
        Arc::new(Float64Array::from_iter_values(trips.iter().map(|t| t.duration_secs))),
        Arc::new(StringArray::from_iter_values(trips.iter().map(|t| t.start_station.as_str()))),
        Arc::new(StringArray::from_iter_values(trips.iter().map(|t| t.end_station.as_str()))),
        Arc::new(StringArray::from_iter(trips.iter().map(|t| t.user_type.as_deref()))),
    ];

    if dataset.has_gender {
        fields.push(Field::new(GENDER, DataType::Utf8, true));
        columns.push(Arc::new(StringArray::from_iter(
            trips.iter().map(|t| t.gender.as_deref()),
        )));
    }
    if dataset.has_birth_year {
        fields.push(Field::new(BIRTH_YEAR, DataType::Int32, true));
        columns.push(Arc::new(Int32Array::from_iter(trips.iter().map(|t| t.birth_year))));
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .context("building raw data table")?;
    let table = pretty_format_batches(&[batch]).context("formatting raw data table")?;
    Ok(table.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{parse_timestamp, City, Trip, GENDER};
    use std::io::Cursor;

    fn dataset(city: City, n: usize) -> TripDataset {
        let trips = (0..n)
            .map(|i| Trip {
                start_time: parse_timestamp(&format!("2017-02-{:02} 07:00:00", i + 1)).unwrap(),
                end_time: None,
                duration_secs: 100.0 + i as f64,
                start_station: format!("Station {i}"),
                end_station: "Union Station".into(),
                user_type: Some("Subscriber".into()),
                gender: Some("Female".into()),
                birth_year: Some(1980),
            })
            .collect();
        TripDataset::new(city, trips, [GENDER, BIRTH_YEAR])
    }

    fn page(input: &str, ds: &TripDataset) -> String {
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        page_raw_data(&mut console, ds).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn declining_shows_nothing() {
        let out = page("no\n", &dataset(City::Chicago, 12));
        assert!(!out.contains("Displaying rows"));
    }

    #[test]
    fn pages_advance_in_windows_of_five() {
        let out = page("yes\nyes\nno\n", &dataset(City::Chicago, 12));
        assert!(out.contains("Displaying rows 0 to 4."));
        assert!(out.contains("Displaying rows 5 to 9."));
        assert!(!out.contains("Displaying rows 10"));
        assert!(out.contains("Station 9"));
        assert!(!out.contains("Station 10"));
    }

    #[test]
    fn stops_when_rows_run_out() {
        let out = page("yes\ny\nyes\n", &dataset(City::Chicago, 7));
        assert!(out.contains("Displaying rows 5 to 6."));
        assert!(out.contains("No more rows to display."));
    }

    #[test]
    fn demographic_columns_follow_the_dataset() {
        let chicago = dataset(City::Chicago, 2);
        let table = render_rows(&chicago, 0..2).unwrap();
        assert!(table.contains(GENDER));
        assert!(table.contains(BIRTH_YEAR));

        let washington = dataset(City::Washington, 2);
        let table = render_rows(&washington, 0..2).unwrap();
        assert!(table.contains(START_STATION));
        assert!(!table.contains(GENDER));
        assert!(!table.contains(BIRTH_YEAR));
    }
}
