//! Descriptive statistics over a filtered trip table.
//!
//! Each report is computed as a plain value (`compute`) and rendered through
//! `Display`, so the numbers can be checked without capturing console text.
pub mod duration;
pub mod station;
pub mod time;
pub mod user;

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::time::Instant;

use crate::data::model::TripDataset;

pub use duration::DurationStats;
pub use station::StationStats;
pub use time::TimeStats;
pub use user::UserStats;

// ---------------------------------------------------------------------------
// Aggregation helpers
// ---------------------------------------------------------------------------

/// Most frequent value. Ties go to the smallest value.
pub fn mode<T: Ord, I: IntoIterator<Item = T>>(values: I) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for (value, count) in tally(values) {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Occurrences of each value, most frequent first; equal counts keep value
/// order.
pub fn value_counts<T: Ord, I: IntoIterator<Item = T>>(values: I) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = tally(values).into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn tally<T: Ord, I: IntoIterator<Item = T>>(values: I) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Report runner
// ---------------------------------------------------------------------------

const NO_TRIPS: &str = "No trips match the selected filters.";

/// Print one report: heading, the computed result (or a notice when there is
/// nothing to compute over), and how long it took.
pub fn timed<W: Write, T: fmt::Display>(
    out: &mut W,
    heading: &str,
    compute: impl FnOnce() -> Option<T>,
) -> io::Result<()> {
    writeln!(out, "\n{heading}\n")?;
    let started = Instant::now();

    match compute() {
        Some(report) => writeln!(out, "{report}")?,
        None => writeln!(out, "{NO_TRIPS}")?,
    }

    let elapsed = started.elapsed();
    log::debug!("{heading} took {elapsed:?}");
    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{}", "-".repeat(crate::console::SEPARATOR_WIDTH))
}

/// Run all four reports over `dataset`.
pub fn print_all<W: Write>(out: &mut W, dataset: &TripDataset) -> io::Result<()> {
    timed(out, "Calculating The Most Frequent Times of Travel...", || {
        TimeStats::compute(dataset)
    })?;
    timed(out, "Calculating The Most Popular Stations and Trip...", || {
        StationStats::compute(dataset)
    })?;
    timed(out, "Calculating Trip Duration...", || DurationStats::compute(dataset))?;
    timed(out, "Calculating User Stats...", || UserStats::compute(dataset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{parse_timestamp, City, Trip};

    #[test]
    fn mode_picks_most_frequent() {
        assert_eq!(mode([3, 1, 3, 2, 3, 1]), Some(3));
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn mode_ties_resolve_to_smallest() {
        assert_eq!(mode(["b", "a", "b", "a", "c"]), Some("a"));
        assert_eq!(mode([9, 4]), Some(4));
    }

    #[test]
    fn value_counts_sorted_by_frequency() {
        let counts = value_counts(["Customer", "Subscriber", "Subscriber", "Dependent", "Customer", "Subscriber"]);
        assert_eq!(
            counts,
            vec![("Subscriber", 3), ("Customer", 2), ("Dependent", 1)]
        );
    }

    #[test]
    fn all_reports_print_in_order() {
        let trip = Trip {
            start_time: parse_timestamp("2017-04-03 17:45:00").unwrap(),
            end_time: None,
            duration_secs: 3725.0,
            start_station: "Canal St & Adams St".into(),
            end_station: "Clinton St & Madison St".into(),
            user_type: Some("Subscriber".into()),
            gender: Some("Male".into()),
            birth_year: Some(1988),
        };
        let ds = TripDataset::new(City::Chicago, vec![trip], ["Gender", "Birth Year"]);
        let mut out = Vec::new();
        print_all(&mut out, &ds).unwrap();
        let out = String::from_utf8(out).unwrap();

        let positions: Vec<usize> = [
            "Times of Travel",
            "Popular Stations",
            "Trip Duration",
            "User Stats",
        ]
        .iter()
        .map(|h| out.find(h).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(out.matches("This took").count(), 4);
        assert!(out.contains("1 hours, 2 minutes and 5 seconds"));
    }

    #[test]
    fn empty_dataset_prints_notice_for_each_report() {
        let ds = TripDataset::new(City::Washington, Vec::new(), []);
        let mut out = Vec::new();
        print_all(&mut out, &ds).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches(NO_TRIPS).count(), 4);
    }
}
